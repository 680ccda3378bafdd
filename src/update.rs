//! UpdateStmt：构建 UPDATE 语句。
//!
//! 没有任何有效 WHERE 条件时拒绝编译，避免整表更新。

use crate::buffer::Buffer;
use crate::builder::{Builder, compile};
use crate::cond::Cond;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::modifiers::{Arg, Raw, expr};
use crate::runner::{ExecResult, Runner};
use crate::session::Session;
use crate::value::SqlValue;
use crate::where_clause::{WhereClause, write_keyword};

#[derive(Debug, Clone, Default)]
pub struct UpdateStmt {
    raw: Option<Raw>,
    table: String,
    values: Vec<(String, Arg)>,
    where_clause: WhereClause,
    limit: Option<u64>,
}

pub fn update(table: &str) -> UpdateStmt {
    UpdateStmt {
        table: table.to_string(),
        ..UpdateStmt::default()
    }
}

pub fn update_by_sql(
    query: impl Into<String>,
    values: impl IntoIterator<Item = impl Into<SqlValue>>,
) -> UpdateStmt {
    UpdateStmt {
        raw: Some(expr(query, values)),
        ..UpdateStmt::default()
    }
}

impl UpdateStmt {
    /// `SET column = value`；同一列再次设置时原位替换。
    pub fn set(&mut self, column: &str, value: impl Into<Arg>) -> &mut Self {
        let value = value.into();
        match self.values.iter_mut().find(|(c, _)| c == column) {
            Some((_, v)) => *v = value,
            None => self.values.push((column.to_string(), value)),
        }
        self
    }

    pub fn set_map<K, V>(&mut self, kv: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<Arg>,
    {
        for (k, v) in kv {
            self.set(k.as_ref(), v);
        }
        self
    }

    pub fn where_(&mut self, cond: impl Into<Cond>) -> &mut Self {
        self.where_clause.add(cond);
        self
    }

    /// 带参数的原始条件，例如 `where_expr("id = ?", [1])`。
    pub fn where_expr(
        &mut self,
        query: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> &mut Self {
        self.where_clause.add(expr(query, values));
        self
    }

    pub fn where_clause(&self) -> &WhereClause {
        &self.where_clause
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn num_assignment(&self) -> usize {
        self.values.len()
    }

    pub fn to_sql(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        compile(self, dialect)
    }

    pub async fn exec<R: Runner>(&self, session: &Session<R>) -> Result<ExecResult> {
        session.exec(self).await
    }
}

impl Builder for UpdateStmt {
    fn build(&self, dialect: &dyn Dialect, buf: &mut Buffer) -> Result<()> {
        if let Some(raw) = &self.raw {
            return raw.build(dialect, buf);
        }
        if self.table.is_empty() {
            return Err(Error::TableNotSpecified);
        }
        if self.values.is_empty() {
            return Err(Error::ColumnNotSpecified);
        }
        let Some(conditions) = self.where_clause.compile_conditions(dialect)? else {
            return Err(Error::MissingCondition);
        };

        buf.write_str("UPDATE ");
        buf.write_str(&dialect.quote_ident(&self.table));
        buf.write_str(" SET ");
        for (i, (column, value)) in self.values.iter().enumerate() {
            if i > 0 {
                buf.write_str(", ");
            }
            buf.write_str(&dialect.quote_ident(column));
            buf.write_str(" = ");
            value.build(dialect, buf)?;
        }

        write_keyword(buf, "WHERE", conditions);

        if let Some(limit) = self.limit {
            buf.write_str(" LIMIT ");
            buf.write_str(&limit.to_string());
        }
        Ok(())
    }
}
