//! halo-stmt：可组合的 SQL 语句 builder，编译为带参数的 SQL 并通过可插拔的 Runner 执行。
//!
//! 批量 INSERT 会按上限拆分为多次往返，依次执行，并把自增 id 回写到记录中。

pub mod buffer;
pub mod builder;
pub mod cond;
pub mod delete;
pub mod dialect;
pub mod error;
pub mod event;
pub mod flavor;
pub mod insert;
pub mod macros;
pub use crate::macros::*;
pub mod modifiers;
pub mod record;
pub mod runner;
pub mod select;
pub mod session;
#[cfg(test)]
mod session_tests;
#[cfg(test)]
mod testing;
pub mod update;
pub mod value;
pub mod where_clause;

pub use crate::buffer::Buffer;
pub use crate::builder::{Builder, compile};
pub use crate::cond::{
    CmpOp, Cond, and, eq, gt, gte, in_, is_not_null, is_null, like, lt, lte, neq, nested, not_in,
    not_like, or,
};
pub use crate::delete::{DeleteStmt, delete_by_sql, delete_from};
pub use crate::dialect::{Dialect, quote_ident_with};
pub use crate::error::{Error, Result};
pub use crate::event::{
    EVENT_EXEC, EVENT_QUERY, EventReceiver, Kvs, NullEventReceiver, SqlLogLevel,
    TracingEventReceiver,
};
pub use crate::flavor::Flavor;
pub use crate::insert::{InsertStmt, insert_by_sql, insert_into};
pub use crate::modifiers::{Arg, Raw, expr, raw};
pub use crate::record::Record;
pub use crate::runner::{ExecResult, FromRow, Row, Runner};
pub use crate::select::{Order, SelectStmt, select, select_by_sql};
pub use crate::session::{DEFAULT_BATCH_SIZE, Session, SessionConfig};
pub use crate::update::{UpdateStmt, update, update_by_sql};
pub use crate::value::{FromValue, SqlValue};
pub use crate::where_clause::WhereClause;
