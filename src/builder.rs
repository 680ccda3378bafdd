//! Builder：语句、条件与原始片段共用的“把自己编译进 Buffer”能力。

use crate::buffer::Buffer;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::value::SqlValue;
use std::fmt;
use std::sync::Arc;

/// 可嵌套构建 SQL 的统一接口。
///
/// 一个语句可以把条件树、原始片段甚至其它语句当作子 builder 嵌入，
/// 子 builder 返回的第一个错误会中止整个编译。
pub trait Builder: fmt::Debug + Send + Sync {
    fn build(&self, dialect: &dyn Dialect, buf: &mut Buffer) -> Result<()>;
}

impl<T: Builder + ?Sized> Builder for &T {
    fn build(&self, dialect: &dyn Dialect, buf: &mut Buffer) -> Result<()> {
        (**self).build(dialect, buf)
    }
}

impl<T: Builder + ?Sized> Builder for Box<T> {
    fn build(&self, dialect: &dyn Dialect, buf: &mut Buffer) -> Result<()> {
        (**self).build(dialect, buf)
    }
}

impl<T: Builder + ?Sized> Builder for Arc<T> {
    fn build(&self, dialect: &dyn Dialect, buf: &mut Buffer) -> Result<()> {
        (**self).build(dialect, buf)
    }
}

/// 在一次性 Buffer 上编译 `builder`，返回最终 SQL 与参数。
pub fn compile(builder: &dyn Builder, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
    let mut buf = Buffer::new();
    builder.build(dialect, &mut buf)?;
    Ok(buf.finish(dialect))
}
