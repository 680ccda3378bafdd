//! Dialect：后端相关的标识符引用与占位符规则。

use std::fmt;

/// 方言契约：编译器只通过这两个方法接触后端语法。
///
/// 实现必须保证 `quote_ident` 对任意输入都是注入安全的（例如把引号字符加倍），
/// 而不是简单地拼接。
pub trait Dialect: fmt::Debug + Send + Sync {
    /// 为标识符加引号。
    fn quote_ident(&self, name: &str) -> String;

    /// 第 `index` 个（从 1 开始）参数的占位符。
    fn placeholder(&self, index: usize) -> String;
}

/// 用 `quote` 包裹 `name`：按 `.` 拆分后逐段引用，段内出现的 `quote` 加倍。
pub fn quote_ident_with(name: &str, quote: char) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for (i, part) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push(quote);
        for c in part.chars() {
            if c == quote {
                out.push(quote);
            }
            out.push(c);
        }
        out.push(quote);
    }
    out
}
