//! Buffer：一次编译过程中累积 SQL 文本与参数的容器。
//!
//! 编译阶段所有参数都以中性占位符 `?` 写入文本；`finish` 时再按 [`Dialect`]
//! 改写成最终形式（`?`、`$1`、`@p1` ...）。文本中第 N 个占位符始终对应第 N 个参数。

use crate::dialect::Dialect;
use crate::value::SqlValue;

/// 编译阶段使用的中性占位符。
pub const PLACEHOLDER: char = '?';

#[derive(Debug, Default, Clone)]
pub struct Buffer {
    sql: String,
    values: Vec<SqlValue>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    pub fn write_char(&mut self, c: char) {
        self.sql.push(c);
    }

    /// 写入一个占位符并追加对应参数。
    pub fn write_value(&mut self, value: impl Into<SqlValue>) {
        self.sql.push(PLACEHOLDER);
        self.values.push(value.into());
    }

    /// 只追加参数，不写占位符：用于占位符已经出现在模板文本里的场景。
    pub fn push_values(&mut self, values: impl IntoIterator<Item = SqlValue>) {
        self.values.extend(values);
    }

    /// 写入 `sep` 分隔、经 `dialect` 引用的标识符列表。
    pub fn write_idents(&mut self, dialect: &dyn Dialect, names: &[String], sep: &str) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(sep);
            }
            self.sql.push_str(&dialect.quote_ident(name));
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// 文本只含空白。
    pub fn is_blank(&self) -> bool {
        self.sql.trim().is_empty()
    }

    /// 追加另一个 Buffer 的文本与参数，顺序不变。
    pub fn append(&mut self, other: Buffer) {
        self.sql.push_str(&other.sql);
        self.values.extend(other.values);
    }

    /// 结束编译：把中性占位符改写为 `dialect` 的占位符。
    pub fn finish(self, dialect: &dyn Dialect) -> (String, Vec<SqlValue>) {
        (rewrite_placeholders(&self.sql, dialect), self.values)
    }
}

/// 把引号（`'`、`"`、`` ` ``）之外的 `?` 依次替换为 `dialect.placeholder(n)`。
fn rewrite_placeholders(sql: &str, dialect: &dyn Dialect) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut quote: Option<char> = None;
    let mut index = 0usize;

    for c in sql.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                out.push(c);
            }
            None => match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    out.push(c);
                }
                PLACEHOLDER => {
                    index += 1;
                    out.push_str(&dialect.placeholder(index));
                }
                _ => out.push(c),
            },
        }
    }
    out
}

/// 统计引号之外的占位符数量。
#[cfg(test)]
pub(crate) fn count_placeholders(sql: &str) -> usize {
    let mut quote: Option<char> = None;
    let mut n = 0;
    for c in sql.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if matches!(c, '\'' | '"' | '`') => quote = Some(c),
            None if c == PLACEHOLDER => n += 1,
            None => {}
        }
    }
    n
}
