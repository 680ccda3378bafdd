//! InsertStmt：构建 INSERT 语句，并按批量上限分批执行。
//!
//! 行数超过上限时，`exec` 每次只编译游标处最多 `batch_size` 行，执行成功后
//! 游标前移，直到全部行执行完或遇到第一个错误。

use crate::buffer::Buffer;
use crate::builder::{Builder, compile};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::macros::{IntoStrings, collect_into_strings};
use crate::modifiers::{Arg, Raw, expr};
use crate::record::Record;
use crate::runner::{ExecResult, FromRow, Runner};
use crate::session::{DEFAULT_BATCH_SIZE, Session};
use crate::value::SqlValue;

#[derive(Debug, Default)]
pub struct InsertStmt<'a> {
    raw: Option<Raw>,
    table: String,
    columns: Vec<String>,
    rows: Vec<Vec<Arg>>,
    /// 下一批待编译的行下标。
    cursor: usize,
    batch_size: usize,
    returning: Vec<String>,
    record_id: Option<&'a mut i64>,
    pair_overflow: bool,
}

pub fn insert_into<'a>(table: &str) -> InsertStmt<'a> {
    InsertStmt {
        table: table.to_string(),
        ..InsertStmt::default()
    }
}

/// 原始 SQL 的 INSERT：编译时原样输出，执行时只执行一次。
pub fn insert_by_sql<'a>(
    query: impl Into<String>,
    values: impl IntoIterator<Item = impl Into<SqlValue>>,
) -> InsertStmt<'a> {
    InsertStmt {
        raw: Some(expr(query, values)),
        ..InsertStmt::default()
    }
}

impl<'a> InsertStmt<'a> {
    pub fn columns<T>(&mut self, columns: T) -> &mut Self
    where
        T: IntoStrings,
    {
        self.columns = collect_into_strings(columns);
        self
    }

    /// 追加一行，顺序需与 `columns` 一致。
    pub fn values(&mut self, values: impl IntoIterator<Item = impl Into<Arg>>) -> &mut Self {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    /// 追加一列及其值；只适用于单行插入，已有多行时编译报错。
    pub fn pair(&mut self, column: &str, value: impl Into<Arg>) -> &mut Self {
        self.columns.push(column.to_string());
        match self.rows.as_mut_slice() {
            [] => self.rows.push(vec![value.into()]),
            [row] => row.push(value.into()),
            _ => self.pair_overflow = true,
        }
        self
    }

    /// 按列名追加一行。
    ///
    /// 未设置 `columns` 时按迭代顺序取键作为列（`HashMap` 的顺序不固定，需要确定顺序时用
    /// `BTreeMap`）；已设置时按列取值，缺失的列绑定为 NULL。
    pub fn map<K, V>(&mut self, kv: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Arg>,
    {
        let entries: Vec<(String, Arg)> = kv.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        if self.columns.is_empty() {
            let (columns, row): (Vec<String>, Vec<Arg>) = entries.into_iter().unzip();
            self.columns = columns;
            self.rows.push(row);
        } else {
            let row = self
                .columns
                .iter()
                .map(|col| {
                    entries
                        .iter()
                        .find(|(k, _)| k == col)
                        .map(|(_, v)| v.clone())
                        .unwrap_or(Arg::Value(SqlValue::Null))
                })
                .collect();
            self.rows.push(row);
        }
        self
    }

    /// 追加一条记录的值，并绑定它的 id 字段：执行成功后写入后端返回的自增 id。
    ///
    /// 多次调用时以最后一条带 id 字段的记录为准。
    pub fn record<R: Record>(&mut self, record: &'a mut R) -> &mut Self {
        self.record_values(&*record);
        if let Some(id) = record.id_mut() {
            self.record_id = Some(id);
        }
        self
    }

    /// 只追加记录的值，不绑定 id。
    pub fn record_values<R: Record + ?Sized>(&mut self, record: &R) -> &mut Self {
        if self.columns.is_empty() {
            self.columns = record.columns().into_iter().map(String::from).collect();
        }
        self.rows.push(record.column_values(&self.columns));
        self
    }

    pub fn returning<T>(&mut self, columns: T) -> &mut Self
    where
        T: IntoStrings,
    {
        self.returning = collect_into_strings(columns);
        self
    }

    /// 每次往返最多插入的行数；0 表示默认的 1000。
    pub fn batch_size(&mut self, batch_size: usize) -> &mut Self {
        self.batch_size = batch_size;
        self
    }

    /// 尚未执行的行数。
    pub fn pending_rows(&self) -> usize {
        self.rows.len().saturating_sub(self.cursor)
    }

    fn effective_batch_size(&self) -> usize {
        if self.batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            self.batch_size
        }
    }

    fn validate(&self) -> Result<()> {
        if self.pair_overflow {
            return Err(Error::PairWithMultipleRows);
        }
        if self.table.is_empty() {
            return Err(Error::TableNotSpecified);
        }
        if self.columns.is_empty() {
            return Err(Error::ColumnNotSpecified);
        }
        let expected = self.columns.len();
        for (row, values) in self.rows.iter().enumerate().skip(self.cursor) {
            if values.len() != expected {
                return Err(Error::ValueCountMismatch {
                    row,
                    expected,
                    got: values.len(),
                });
            }
        }
        Ok(())
    }

    /// 编译游标处的一批行，返回写入的行数；不移动游标。
    fn build_chunk(&self, dialect: &dyn Dialect, buf: &mut Buffer) -> Result<usize> {
        self.validate()?;
        let pending = &self.rows[self.cursor.min(self.rows.len())..];
        if pending.is_empty() {
            return Err(Error::ValueNotSpecified);
        }

        buf.write_str("INSERT INTO ");
        buf.write_str(&dialect.quote_ident(&self.table));
        buf.write_str(" (");
        buf.write_idents(dialect, &self.columns, ",");
        buf.write_str(") VALUES ");

        let chunk = &pending[..pending.len().min(self.effective_batch_size())];
        for (i, row) in chunk.iter().enumerate() {
            if i > 0 {
                buf.write_str(", ");
            }
            buf.write_char('(');
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    buf.write_char(',');
                }
                value.build(dialect, buf)?;
            }
            buf.write_char(')');
        }

        if !self.returning.is_empty() {
            buf.write_str(" RETURNING ");
            buf.write_idents(dialect, &self.returning, ",");
        }
        Ok(chunk.len())
    }

    /// 编译下一批并把游标移过这些行；没有剩余行时返回 `None`。
    ///
    /// 原始 SQL 只产出一次。
    pub fn compile_chunk(&mut self, dialect: &dyn Dialect) -> Result<Option<(String, Vec<SqlValue>)>> {
        if let Some(raw) = self.raw.take() {
            self.cursor = self.rows.len();
            return compile(&raw, dialect).map(Some);
        }
        if self.pending_rows() == 0 {
            return Ok(None);
        }
        let mut buf = Buffer::new();
        let emitted = self.build_chunk(dialect, &mut buf)?;
        self.cursor += emitted;
        Ok(Some(buf.finish(dialect)))
    }

    /// 编译当前这一批（不移动游标）。
    pub fn to_sql(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        compile(self, dialect)
    }

    /// 分批执行全部待插入行，返回最后一次执行的结果。
    ///
    /// 第一批成功后把自增 id 写入绑定的记录。遇到错误立即返回，之后的行保持待执行。
    pub async fn exec<R: Runner>(&mut self, session: &Session<R>) -> Result<ExecResult> {
        if self.raw.is_none() {
            self.validate()?;
        }
        let mut result = ExecResult::default();
        while let Some((sql, args)) = self.compile_chunk(session.dialect())? {
            result = session.exec_compiled(&sql, &args).await?;
            if let Some(slot) = self.record_id.take() {
                if let Some(id) = result.last_insert_id {
                    *slot = id;
                }
            }
        }
        Ok(result)
    }

    /// 分批执行并收集 RETURNING 返回的行。
    pub async fn load<T: FromRow, R: Runner>(&mut self, session: &Session<R>) -> Result<Vec<T>> {
        if self.raw.is_none() {
            self.validate()?;
        }
        let mut out = Vec::new();
        while let Some((sql, args)) = self.compile_chunk(session.dialect())? {
            let rows = session.query_compiled(&sql, &args).await?;
            for row in &rows {
                out.push(T::from_row(row)?);
            }
        }
        Ok(out)
    }
}

impl Builder for InsertStmt<'_> {
    fn build(&self, dialect: &dyn Dialect, buf: &mut Buffer) -> Result<()> {
        if let Some(raw) = &self.raw {
            return raw.build(dialect, buf);
        }
        self.build_chunk(dialect, buf).map(|_| ())
    }
}
