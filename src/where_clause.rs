//! WhereClause：语句持有的条件列表，编译时以 `And(conditions...)` 输出。

use crate::buffer::Buffer;
use crate::builder::Builder;
use crate::cond::{Cond, build_group, compile_group};
use crate::dialect::Dialect;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct WhereClause {
    conds: Vec<Cond>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, cond: impl Into<Cond>) -> &mut Self {
        self.conds.push(cond.into());
        self
    }

    /// 合并另一个 WhereClause 的全部条件（复制，不共享）。
    pub fn add_where_clause(&mut self, other: &WhereClause) -> &mut Self {
        self.conds.extend(other.conds.iter().cloned());
        self
    }

    pub fn conds(&self) -> &[Cond] {
        &self.conds
    }

    /// 没有任何会输出内容的条件（不编译嵌套 builder 的粗略判断）。
    pub fn is_empty(&self) -> bool {
        self.conds.iter().all(Cond::is_empty)
    }

    /// 把全部条件编译到独立的 Buffer；结果为空白时返回 `None`。
    pub(crate) fn compile_conditions(&self, dialect: &dyn Dialect) -> Result<Option<Buffer>> {
        Ok(compile_group(dialect, " AND ", &self.conds)?.map(|(part, _)| part))
    }

    /// 写入 ` <keyword> <conditions>`；没有有效条件时什么也不写。
    pub(crate) fn build_with_keyword(
        &self,
        keyword: &str,
        dialect: &dyn Dialect,
        buf: &mut Buffer,
    ) -> Result<()> {
        if let Some(part) = self.compile_conditions(dialect)? {
            write_keyword(buf, keyword, part);
        }
        Ok(())
    }
}

pub(crate) fn write_keyword(buf: &mut Buffer, keyword: &str, conditions: Buffer) {
    buf.write_char(' ');
    buf.write_str(keyword);
    buf.write_char(' ');
    buf.append(conditions);
}

impl Builder for WhereClause {
    fn build(&self, dialect: &dyn Dialect, buf: &mut Buffer) -> Result<()> {
        build_group(dialect, buf, " AND ", &self.conds)
    }
}
