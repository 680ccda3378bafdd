//! SelectStmt：构建 SELECT 语句并把结果映射为调用方类型。
//!
//! 列按原样输出（可以是表达式或别名），表名经方言引用。

use crate::buffer::Buffer;
use crate::builder::{Builder, compile};
use crate::cond::Cond;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::macros::{IntoStrings, collect_into_strings};
use crate::modifiers::{Raw, expr};
use crate::runner::{FromRow, Row, Runner};
use crate::session::Session;
use crate::value::SqlValue;
use crate::where_clause::WhereClause;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default)]
pub struct SelectStmt {
    raw: Option<Raw>,
    distinct: bool,
    columns: Vec<String>,
    table: Option<String>,
    where_clause: WhereClause,
    group_by: Vec<String>,
    having: WhereClause,
    order_by: Vec<(String, Option<Order>)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

pub fn select<T: IntoStrings>(columns: T) -> SelectStmt {
    SelectStmt {
        columns: collect_into_strings(columns),
        ..SelectStmt::default()
    }
}

pub fn select_by_sql(
    query: impl Into<String>,
    values: impl IntoIterator<Item = impl Into<SqlValue>>,
) -> SelectStmt {
    SelectStmt {
        raw: Some(expr(query, values)),
        ..SelectStmt::default()
    }
}

impl SelectStmt {
    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    pub fn from(&mut self, table: &str) -> &mut Self {
        self.table = Some(table.to_string());
        self
    }

    pub fn where_(&mut self, cond: impl Into<Cond>) -> &mut Self {
        self.where_clause.add(cond);
        self
    }

    pub fn where_expr(
        &mut self,
        query: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> &mut Self {
        self.where_clause.add(expr(query, values));
        self
    }

    pub fn group_by<T: IntoStrings>(&mut self, columns: T) -> &mut Self {
        self.group_by.extend(collect_into_strings(columns));
        self
    }

    pub fn having(&mut self, cond: impl Into<Cond>) -> &mut Self {
        self.having.add(cond);
        self
    }

    /// 按原样追加排序项，例如 `order_by("created_at DESC")`。
    pub fn order_by(&mut self, column: &str) -> &mut Self {
        self.order_by.push((column.to_string(), None));
        self
    }

    pub fn order_asc(&mut self, column: &str) -> &mut Self {
        self.order_by.push((column.to_string(), Some(Order::Asc)));
        self
    }

    pub fn order_desc(&mut self, column: &str) -> &mut Self {
        self.order_by.push((column.to_string(), Some(Order::Desc)));
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// 分页：`page` 从 1 开始。
    pub fn paginate(&mut self, page: u64, per_page: u64) -> &mut Self {
        self.limit(per_page);
        self.offset(page.saturating_sub(1).saturating_mul(per_page))
    }

    pub fn to_sql(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        compile(self, dialect)
    }

    pub async fn load<T: FromRow, R: Runner>(&self, session: &Session<R>) -> Result<Vec<T>> {
        session.query(self).await
    }

    /// 只取第一行；没有结果时返回 [`Error::NotFound`]。
    pub async fn load_one<T: FromRow, R: Runner>(&self, session: &Session<R>) -> Result<T> {
        let (sql, args) = session.to_sql(self)?;
        let rows = session.query_compiled(&sql, &args).await?;
        match rows.first() {
            Some(row) => T::from_row(row),
            None => Err(Error::NotFound),
        }
    }

    pub async fn load_rows<R: Runner>(&self, session: &Session<R>) -> Result<Vec<Row>> {
        let (sql, args) = session.to_sql(self)?;
        session.query_compiled(&sql, &args).await
    }
}

impl Builder for SelectStmt {
    fn build(&self, dialect: &dyn Dialect, buf: &mut Buffer) -> Result<()> {
        if let Some(raw) = &self.raw {
            return raw.build(dialect, buf);
        }
        if self.columns.is_empty() {
            return Err(Error::ColumnNotSpecified);
        }

        buf.write_str("SELECT ");
        if self.distinct {
            buf.write_str("DISTINCT ");
        }
        buf.write_str(&self.columns.join(", "));

        if let Some(table) = &self.table {
            buf.write_str(" FROM ");
            buf.write_str(&dialect.quote_ident(table));
        }

        self.where_clause.build_with_keyword("WHERE", dialect, buf)?;

        if !self.group_by.is_empty() {
            buf.write_str(" GROUP BY ");
            buf.write_str(&self.group_by.join(", "));
        }
        self.having.build_with_keyword("HAVING", dialect, buf)?;

        if !self.order_by.is_empty() {
            buf.write_str(" ORDER BY ");
            for (i, (column, order)) in self.order_by.iter().enumerate() {
                if i > 0 {
                    buf.write_str(", ");
                }
                match order {
                    Some(order) => {
                        buf.write_str(&dialect.quote_ident(column));
                        buf.write_str(match order {
                            Order::Asc => " ASC",
                            Order::Desc => " DESC",
                        });
                    }
                    None => buf.write_str(column),
                }
            }
        }

        if let Some(limit) = self.limit {
            buf.write_str(" LIMIT ");
            buf.write_str(&limit.to_string());
        }
        if let Some(offset) = self.offset {
            buf.write_str(" OFFSET ");
            buf.write_str(&offset.to_string());
        }
        Ok(())
    }
}
