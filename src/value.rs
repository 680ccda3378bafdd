//! SQL 参数值类型，以及从结果行取值的 `FromValue`。

use std::borrow::Cow;
use time::OffsetDateTime;

/// SQL 参数值。
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(Cow<'static, str>),
    Bytes(Vec<u8>),
    DateTime(OffsetDateTime),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// 用于错误信息的类型名。
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I64(_) => "i64",
            Self::U64(_) => "u64",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::DateTime(_) => "datetime",
        }
    }
}

impl From<()> for SqlValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! from_signed {
    ($($t:ty),+ $(,)?) => {
        $(impl From<$t> for SqlValue {
            fn from(v: $t) -> Self {
                Self::I64(v as i64)
            }
        })+
    };
}

macro_rules! from_unsigned {
    ($($t:ty),+ $(,)?) => {
        $(impl From<$t> for SqlValue {
            fn from(v: $t) -> Self {
                Self::U64(v as u64)
            }
        })+
    };
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        Self::F64(v as f64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::String(Cow::Owned(v))
    }
}

impl From<&'static str> for SqlValue {
    fn from(v: &'static str) -> Self {
        Self::String(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<OffsetDateTime> for SqlValue {
    fn from(v: OffsetDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// 从结果行里的 `SqlValue` 还原 Rust 值；类型不匹配时返回 `None`。
pub trait FromValue: Sized {
    fn from_value(v: &SqlValue) -> Option<Self>;
}

impl FromValue for SqlValue {
    fn from_value(v: &SqlValue) -> Option<Self> {
        Some(v.clone())
    }
}

impl FromValue for i64 {
    fn from_value(v: &SqlValue) -> Option<Self> {
        match v {
            SqlValue::I64(n) => Some(*n),
            SqlValue::U64(n) => i64::try_from(*n).ok(),
            SqlValue::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    fn from_value(v: &SqlValue) -> Option<Self> {
        i64::from_value(v).and_then(|n| i32::try_from(n).ok())
    }
}

impl FromValue for u64 {
    fn from_value(v: &SqlValue) -> Option<Self> {
        match v {
            SqlValue::U64(n) => Some(*n),
            SqlValue::I64(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(v: &SqlValue) -> Option<Self> {
        match v {
            SqlValue::F64(n) => Some(*n),
            SqlValue::I64(n) => Some(*n as f64),
            SqlValue::U64(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl FromValue for bool {
    fn from_value(v: &SqlValue) -> Option<Self> {
        match v {
            SqlValue::Bool(b) => Some(*b),
            // MySQL/SQLite 用 0/1 表示布尔
            SqlValue::I64(n) => Some(*n != 0),
            SqlValue::U64(n) => Some(*n != 0),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(v: &SqlValue) -> Option<Self> {
        match v {
            SqlValue::String(s) => Some(s.to_string()),
            SqlValue::Bytes(b) => String::from_utf8(b.clone()).ok(),
            _ => None,
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(v: &SqlValue) -> Option<Self> {
        match v {
            SqlValue::Bytes(b) => Some(b.clone()),
            SqlValue::String(s) => Some(s.as_bytes().to_vec()),
            _ => None,
        }
    }
}

impl FromValue for OffsetDateTime {
    fn from_value(v: &SqlValue) -> Option<Self> {
        match v {
            SqlValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(v: &SqlValue) -> Option<Self> {
        match v {
            SqlValue::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FromValue, SqlValue};
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    #[test]
    fn from_option_some() {
        assert_eq!(SqlValue::from(Some(123_i64)), SqlValue::I64(123));
    }

    #[test]
    fn from_option_none() {
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
    }

    #[test]
    fn from_unit_is_null() {
        let v: SqlValue = ().into();
        assert!(v.is_null());
    }

    #[test]
    fn from_string_borrowed_and_owned() {
        let a: SqlValue = "abc".into();
        let b: SqlValue = String::from("abc").into();
        assert_eq!(a, b);
    }

    #[test]
    fn datetime_roundtrips_through_from_value() {
        let dt = datetime!(2024-05-01 12:30 UTC);
        let v = SqlValue::from(dt);
        assert_eq!(time::OffsetDateTime::from_value(&v), Some(dt));
    }

    #[test]
    fn integer_widening_and_narrowing() {
        assert_eq!(i64::from_value(&SqlValue::U64(7)), Some(7));
        assert_eq!(i64::from_value(&SqlValue::U64(u64::MAX)), None);
        assert_eq!(i32::from_value(&SqlValue::I64(i64::MAX)), None);
        assert_eq!(u64::from_value(&SqlValue::I64(-1)), None);
    }

    #[test]
    fn option_maps_null_to_none() {
        assert_eq!(Option::<String>::from_value(&SqlValue::Null), Some(None));
        assert_eq!(
            Option::<String>::from_value(&SqlValue::from("x")),
            Some(Some("x".to_string()))
        );
        assert_eq!(Option::<String>::from_value(&SqlValue::I64(1)), None);
    }

    #[test]
    fn bool_accepts_integer_flags() {
        assert_eq!(bool::from_value(&SqlValue::I64(1)), Some(true));
        assert_eq!(bool::from_value(&SqlValue::I64(0)), Some(false));
        assert_eq!(bool::from_value(&SqlValue::from("true")), None);
    }
}
