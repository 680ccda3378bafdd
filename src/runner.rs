//! Runner：真正把编译后的 SQL 发给后端的执行者（连接或事务）。

use crate::error::{Error, Result};
use crate::value::{FromValue, SqlValue};
use std::future::Future;
use std::sync::Arc;

/// 修改类语句的执行结果。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// 后端生成的自增 id；后端不支持或没有生成时为 `None`。
    pub last_insert_id: Option<i64>,
}

/// 一行查询结果：列名与值按位置对应。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// 按列名取值并转换为 `T`。
    pub fn get<T: FromValue>(&self, column: &str) -> Result<T> {
        let v = self
            .value(column)
            .ok_or_else(|| Error::decode(column, "column not found"))?;
        T::from_value(v).ok_or_else(|| {
            Error::decode(
                column,
                format!("cannot convert {} into {}", v.kind(), std::any::type_name::<T>()),
            )
        })
    }
}

/// 把一行结果映射为调用方的类型。
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(row.clone())
    }
}

/// 执行编译结果的后端抽象。
///
/// 由会话/事务对象实现；本 crate 不管理连接生命周期。
/// 超时与取消：丢弃返回的 future 即取消，`Session` 可额外套上超时。
pub trait Runner: Send + Sync {
    /// 执行修改类语句。
    fn exec(&self, sql: &str, args: &[SqlValue]) -> impl Future<Output = Result<ExecResult>> + Send;

    /// 执行查询并返回全部行。
    fn query(&self, sql: &str, args: &[SqlValue]) -> impl Future<Output = Result<Vec<Row>>> + Send;
}

impl<T: Runner> Runner for &T {
    fn exec(&self, sql: &str, args: &[SqlValue]) -> impl Future<Output = Result<ExecResult>> + Send {
        (**self).exec(sql, args)
    }

    fn query(&self, sql: &str, args: &[SqlValue]) -> impl Future<Output = Result<Vec<Row>>> + Send {
        (**self).query(sql, args)
    }
}

impl<T: Runner> Runner for Arc<T> {
    fn exec(&self, sql: &str, args: &[SqlValue]) -> impl Future<Output = Result<ExecResult>> + Send {
        (**self).exec(sql, args)
    }

    fn query(&self, sql: &str, args: &[SqlValue]) -> impl Future<Output = Result<Vec<Row>>> + Send {
        (**self).query(sql, args)
    }
}
