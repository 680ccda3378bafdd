//! 参数修饰：原始 SQL 片段 `Raw` 与值种类 `Arg`。

use crate::buffer::Buffer;
use crate::builder::Builder;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::value::SqlValue;
use time::OffsetDateTime;

/// Raw：调用方写好的 SQL 文本及其参数，原样拼入。
///
/// 模板里的 `?` 个数与参数个数不做校验；不一致时由后端在执行时报错。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Raw {
    pub(crate) query: String,
    pub(crate) values: Vec<SqlValue>,
}

impl Raw {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }
}

impl Builder for Raw {
    fn build(&self, _dialect: &dyn Dialect, buf: &mut Buffer) -> Result<()> {
        buf.write_str(&self.query);
        buf.push_values(self.values.iter().cloned());
        Ok(())
    }
}

/// 不带参数的原始 SQL，例如 `raw("NOW()")`、`raw("hits + 1")`。
pub fn raw(query: impl Into<String>) -> Raw {
    Raw {
        query: query.into(),
        values: Vec::new(),
    }
}

/// 带参数的原始 SQL 模板，例如 `expr("a = ? OR b = ?", args![1, 2])`。
pub fn expr(query: impl Into<String>, values: impl IntoIterator<Item = impl Into<SqlValue>>) -> Raw {
    Raw {
        query: query.into(),
        values: values.into_iter().map(Into::into).collect(),
    }
}

/// 值种类：普通值绑定为占位符，`Raw` 作为 SQL 原样编译。
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(SqlValue),
    Raw(Raw),
}

impl Arg {
    pub(crate) fn is_null(&self) -> bool {
        matches!(self, Self::Value(SqlValue::Null))
    }
}

impl Builder for Arg {
    fn build(&self, dialect: &dyn Dialect, buf: &mut Buffer) -> Result<()> {
        match self {
            Self::Value(v) => {
                buf.write_value(v.clone());
                Ok(())
            }
            Self::Raw(r) => r.build(dialect, buf),
        }
    }
}

impl From<Raw> for Arg {
    fn from(v: Raw) -> Self {
        Self::Raw(v)
    }
}

impl From<SqlValue> for Arg {
    fn from(v: SqlValue) -> Self {
        Self::Value(v)
    }
}

macro_rules! arg_from_value {
    ($($t:ty),+ $(,)?) => {
        $(impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Self::Value(v.into())
            }
        })+
    };
}

arg_from_value!(
    (),
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    &'static str,
    Vec<u8>,
    OffsetDateTime,
);

impl<T> From<Option<T>> for Arg
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        Self::Value(v.into())
    }
}
