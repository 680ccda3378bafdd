//! 错误类型：编译期配置错误、策略违规与执行期错误共用一个枚举。

use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("table not specified")]
    TableNotSpecified,

    #[error("column not specified")]
    ColumnNotSpecified,

    #[error("value not specified")]
    ValueNotSpecified,

    /// UPDATE 没有任何 WHERE 条件：拒绝整表更新。
    #[error("update requires a where condition")]
    MissingCondition,

    /// 某一行的值个数与列数不一致；`row` 为从 0 开始的行号。
    #[error("row {row} has {got} values, expected {expected}")]
    ValueCountMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("pair only allows one record to insert")]
    PairWithMultipleRows,

    #[error("not found")]
    NotFound,

    #[error("decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    #[error("query timeout after {0:?}")]
    Timeout(Duration),

    /// Runner（连接/事务）返回的错误，原样透传。
    #[error("runner error: {0}")]
    Runner(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn runner(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Runner(err.into())
    }

    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }
}
