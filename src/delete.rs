//! DeleteStmt：构建 DELETE 语句。

use crate::buffer::Buffer;
use crate::builder::{Builder, compile};
use crate::cond::Cond;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::modifiers::{Raw, expr};
use crate::runner::{ExecResult, Runner};
use crate::session::Session;
use crate::value::SqlValue;
use crate::where_clause::WhereClause;

#[derive(Debug, Clone, Default)]
pub struct DeleteStmt {
    raw: Option<Raw>,
    table: String,
    where_clause: WhereClause,
    limit: Option<u64>,
}

pub fn delete_from(table: &str) -> DeleteStmt {
    DeleteStmt {
        table: table.to_string(),
        ..DeleteStmt::default()
    }
}

pub fn delete_by_sql(
    query: impl Into<String>,
    values: impl IntoIterator<Item = impl Into<SqlValue>>,
) -> DeleteStmt {
    DeleteStmt {
        raw: Some(expr(query, values)),
        ..DeleteStmt::default()
    }
}

impl DeleteStmt {
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

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_sql(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        compile(self, dialect)
    }

    pub async fn exec<R: Runner>(&self, session: &Session<R>) -> Result<ExecResult> {
        session.exec(self).await
    }
}

impl Builder for DeleteStmt {
    fn build(&self, dialect: &dyn Dialect, buf: &mut Buffer) -> Result<()> {
        if let Some(raw) = &self.raw {
            return raw.build(dialect, buf);
        }
        if self.table.is_empty() {
            return Err(Error::TableNotSpecified);
        }

        buf.write_str("DELETE FROM ");
        buf.write_str(&dialect.quote_ident(&self.table));
        self.where_clause.build_with_keyword("WHERE", dialect, buf)?;

        if let Some(limit) = self.limit {
            buf.write_str(" LIMIT ");
            buf.write_str(&limit.to_string());
        }
        Ok(())
    }
}
