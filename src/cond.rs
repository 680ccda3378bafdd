//! Cond：WHERE / HAVING 条件表达式树。
//!
//! `and` / `or` 组合任意子条件；比较辅助函数经 [`Dialect`] 引用列名并绑定参数。

use crate::buffer::Buffer;
use crate::builder::Builder;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::modifiers::{Arg, Raw};
use crate::value::SqlValue;
use std::sync::Arc;

/// 比较运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
}

impl CmpOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
        }
    }
}

/// 条件节点。
#[derive(Debug, Clone)]
pub enum Cond {
    /// 调用方提供的模板与参数。
    Expr(Raw),
    And(Vec<Cond>),
    Or(Vec<Cond>),
    Cmp {
        column: String,
        op: CmpOp,
        value: Arg,
    },
    In {
        column: String,
        values: Vec<SqlValue>,
        negated: bool,
    },
    Null {
        column: String,
        negated: bool,
    },
    /// 任意嵌套 builder，例如子查询。
    Builder(Arc<dyn Builder>),
}

impl Cond {
    /// 没有任何有效内容的条件（空白模板、或只含空子节点的 And/Or）。
    ///
    /// 嵌套 builder 是否为空要编译后才知道，这里视为非空；编译时输出空白的子节点会被跳过。
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Expr(raw) => raw.query().trim().is_empty(),
            Self::And(children) | Self::Or(children) => children.iter().all(Cond::is_empty),
            _ => false,
        }
    }
}

impl Builder for Cond {
    fn build(&self, dialect: &dyn Dialect, buf: &mut Buffer) -> Result<()> {
        match self {
            Self::Expr(raw) => raw.build(dialect, buf),
            Self::And(children) => build_group(dialect, buf, " AND ", children),
            Self::Or(children) => build_group(dialect, buf, " OR ", children),
            Self::Cmp { column, op, value } => build_cmp(dialect, buf, column, *op, value),
            Self::In {
                column,
                values,
                negated,
            } => build_in(dialect, buf, column, values, *negated),
            Self::Null { column, negated } => {
                write_column(dialect, buf, column)?;
                buf.write_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
                Ok(())
            }
            Self::Builder(b) => {
                let mut inner = Buffer::new();
                b.build(dialect, &mut inner)?;
                if !inner.is_blank() {
                    buf.write_char('(');
                    buf.append(inner);
                    buf.write_char(')');
                }
                Ok(())
            }
        }
    }
}

pub(crate) fn build_group(
    dialect: &dyn Dialect,
    buf: &mut Buffer,
    sep: &str,
    children: &[Cond],
) -> Result<()> {
    if let Some((part, _)) = compile_group(dialect, sep, children)? {
        buf.append(part);
    }
    Ok(())
}

/// 编译一组子条件；没有输出文本的子节点被跳过。
///
/// 返回的布尔值表示结果能否不加括号直接与其它条件并列：两个及以上子条件时整组已加括号，
/// 调用方原始模板（`Expr`）则不能。多个子条件时，不能并列的子节点各自加括号。
pub(crate) fn compile_group(
    dialect: &dyn Dialect,
    sep: &str,
    children: &[Cond],
) -> Result<Option<(Buffer, bool)>> {
    let mut parts = Vec::with_capacity(children.len());
    for c in children {
        if let Some(part) = compile_cond(dialect, c)? {
            parts.push(part);
        }
    }
    if parts.len() <= 1 {
        return Ok(parts.pop());
    }

    let mut out = Buffer::new();
    out.write_char('(');
    for (i, (part, atomic)) in parts.into_iter().enumerate() {
        if i > 0 {
            out.write_str(sep);
        }
        if atomic {
            out.append(part);
        } else {
            out.write_char('(');
            out.append(part);
            out.write_char(')');
        }
    }
    out.write_char(')');
    Ok(Some((out, true)))
}

fn compile_cond(dialect: &dyn Dialect, cond: &Cond) -> Result<Option<(Buffer, bool)>> {
    match cond {
        Cond::And(children) => compile_group(dialect, " AND ", children),
        Cond::Or(children) => compile_group(dialect, " OR ", children),
        _ => {
            let mut part = Buffer::new();
            cond.build(dialect, &mut part)?;
            if part.is_blank() {
                return Ok(None);
            }
            Ok(Some((part, !matches!(cond, Cond::Expr(_)))))
        }
    }
}

fn write_column(dialect: &dyn Dialect, buf: &mut Buffer, column: &str) -> Result<()> {
    if column.is_empty() {
        return Err(Error::ColumnNotSpecified);
    }
    buf.write_str(&dialect.quote_ident(column));
    Ok(())
}

fn build_cmp(
    dialect: &dyn Dialect,
    buf: &mut Buffer,
    column: &str,
    op: CmpOp,
    value: &Arg,
) -> Result<()> {
    write_column(dialect, buf, column)?;
    match op {
        CmpOp::Eq if value.is_null() => buf.write_str(" IS NULL"),
        CmpOp::NotEq if value.is_null() => buf.write_str(" IS NOT NULL"),
        _ => {
            buf.write_char(' ');
            buf.write_str(op.as_str());
            buf.write_char(' ');
            value.build(dialect, buf)?;
        }
    }
    Ok(())
}

fn build_in(
    dialect: &dyn Dialect,
    buf: &mut Buffer,
    column: &str,
    values: &[SqlValue],
    negated: bool,
) -> Result<()> {
    if column.is_empty() {
        return Err(Error::ColumnNotSpecified);
    }
    if values.is_empty() {
        buf.write_str(if negated { "0 = 0" } else { "0 = 1" });
        return Ok(());
    }
    write_column(dialect, buf, column)?;
    buf.write_str(if negated { " NOT IN (" } else { " IN (" });
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            buf.write_str(", ");
        }
        buf.write_value(v.clone());
    }
    buf.write_char(')');
    Ok(())
}

impl From<Raw> for Cond {
    fn from(v: Raw) -> Self {
        Self::Expr(v)
    }
}

impl From<&str> for Cond {
    fn from(v: &str) -> Self {
        Self::Expr(crate::modifiers::raw(v))
    }
}

impl From<String> for Cond {
    fn from(v: String) -> Self {
        Self::Expr(crate::modifiers::raw(v))
    }
}

/// 把任意 builder（例如子查询）包装成条件节点。
pub fn nested(builder: impl Builder + 'static) -> Cond {
    Cond::Builder(Arc::new(builder))
}

pub fn and(conds: impl IntoIterator<Item = impl Into<Cond>>) -> Cond {
    Cond::And(conds.into_iter().map(Into::into).collect())
}

pub fn or(conds: impl IntoIterator<Item = impl Into<Cond>>) -> Cond {
    Cond::Or(conds.into_iter().map(Into::into).collect())
}

fn cmp(column: &str, op: CmpOp, value: impl Into<Arg>) -> Cond {
    Cond::Cmp {
        column: column.to_string(),
        op,
        value: value.into(),
    }
}

/// `col = ?`；值为 NULL 时生成 `col IS NULL`。
pub fn eq(column: &str, value: impl Into<Arg>) -> Cond {
    cmp(column, CmpOp::Eq, value)
}

/// `col <> ?`；值为 NULL 时生成 `col IS NOT NULL`。
pub fn neq(column: &str, value: impl Into<Arg>) -> Cond {
    cmp(column, CmpOp::NotEq, value)
}

pub fn gt(column: &str, value: impl Into<Arg>) -> Cond {
    cmp(column, CmpOp::Gt, value)
}

pub fn gte(column: &str, value: impl Into<Arg>) -> Cond {
    cmp(column, CmpOp::Gte, value)
}

pub fn lt(column: &str, value: impl Into<Arg>) -> Cond {
    cmp(column, CmpOp::Lt, value)
}

pub fn lte(column: &str, value: impl Into<Arg>) -> Cond {
    cmp(column, CmpOp::Lte, value)
}

pub fn like(column: &str, value: impl Into<Arg>) -> Cond {
    cmp(column, CmpOp::Like, value)
}

pub fn not_like(column: &str, value: impl Into<Arg>) -> Cond {
    cmp(column, CmpOp::NotLike, value)
}

/// `col IN (?, ?, ...)`；空列表生成恒假的 `0 = 1`。
pub fn in_(column: &str, values: impl IntoIterator<Item = impl Into<SqlValue>>) -> Cond {
    Cond::In {
        column: column.to_string(),
        values: values.into_iter().map(Into::into).collect(),
        negated: false,
    }
}

/// `col NOT IN (?, ?, ...)`；空列表生成恒真的 `0 = 0`。
pub fn not_in(column: &str, values: impl IntoIterator<Item = impl Into<SqlValue>>) -> Cond {
    Cond::In {
        column: column.to_string(),
        values: values.into_iter().map(Into::into).collect(),
        negated: true,
    }
}

pub fn is_null(column: &str) -> Cond {
    Cond::Null {
        column: column.to_string(),
        negated: false,
    }
}

pub fn is_not_null(column: &str) -> Cond {
    Cond::Null {
        column: column.to_string(),
        negated: true,
    }
}
