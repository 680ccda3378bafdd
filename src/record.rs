//! Record：把结构体字段按列名暴露给 INSERT，并可选地提供自增 id 的回写位置。
//!
//! 通常用 [`record!`](crate::record!) 宏为普通结构体实现。

use crate::modifiers::Arg;
use crate::value::SqlValue;

pub trait Record {
    /// 记录自身声明的列，按声明顺序。
    fn columns(&self) -> Vec<&'static str>;

    /// 取某一列的值；未知列返回 `None`。
    fn column_value(&self, column: &str) -> Option<Arg>;

    /// 依次取 `columns` 的值，未知列绑定为 NULL。
    fn column_values(&self, columns: &[String]) -> Vec<Arg> {
        columns
            .iter()
            .map(|c| {
                self.column_value(c)
                    .unwrap_or(Arg::Value(SqlValue::Null))
            })
            .collect()
    }

    /// 自增 id 字段；执行成功后写入后端返回的 id。
    fn id_mut(&mut self) -> Option<&mut i64> {
        None
    }
}

/// 为结构体实现 [`Record`]。
///
/// 字段名即列名，`field => "col"` 指定别名；`id = field` 声明自增 id 字段。
///
/// ```
/// use halo_stmt::{Record, record};
///
/// struct User {
///     id: i64,
///     name: String,
///     age: i64,
/// }
///
/// record!(User { name, age => "user_age" }, id = id);
///
/// let user = User { id: 0, name: "alice".into(), age: 30 };
/// assert_eq!(user.columns(), vec!["name", "user_age"]);
/// ```
#[macro_export]
macro_rules! record {
    (@col $field:ident) => {
        stringify!($field)
    };
    (@col $field:ident => $col:literal) => {
        $col
    };
    ($ty:ty { $($field:ident $(=> $col:literal)?),+ $(,)? } $(, id = $id:ident)?) => {
        impl $crate::Record for $ty {
            fn columns(&self) -> Vec<&'static str> {
                vec![$($crate::record!(@col $field $(=> $col)?)),+]
            }

            fn column_value(&self, column: &str) -> Option<$crate::Arg> {
                $(
                    if column == $crate::record!(@col $field $(=> $col)?) {
                        return Some($crate::Arg::from(self.$field.clone()));
                    }
                )+
                None
            }

            $(
                fn id_mut(&mut self) -> Option<&mut i64> {
                    Some(&mut self.$id)
                }
            )?
        }
    };
}
