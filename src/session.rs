//! Session：执行上下文，持有 Runner、方言、事件接收者与配置。
//!
//! 语句本身只负责编译；`exec` / `load` 通过 Session 把编译结果交给 Runner，
//! 并在每次往返前后计时、套超时、通知 [`EventReceiver`]。

use crate::builder::{Builder, compile};
use crate::delete::{DeleteStmt, delete_from};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::event::{EVENT_EXEC, EVENT_QUERY, EventReceiver, Kvs, NullEventReceiver};
use crate::insert::{InsertStmt, insert_into};
use crate::macros::IntoStrings;
use crate::runner::{ExecResult, FromRow, Row, Runner};
use crate::select::{SelectStmt, select};
use crate::update::{UpdateStmt, update};
use crate::value::SqlValue;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// 批量插入每次往返的默认行数上限。
pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 单次往返的超时；`None` 表示不限制。
    pub query_timeout: Option<Duration>,
    /// 经由 Session 创建的 INSERT 使用的批量上限。
    pub batch_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            query_timeout: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

pub struct Session<R> {
    runner: R,
    dialect: Arc<dyn Dialect>,
    receiver: Arc<dyn EventReceiver>,
    config: SessionConfig,
}

impl<R: Runner> Session<R> {
    pub fn new(runner: R, dialect: impl Dialect + 'static) -> Self {
        Self {
            runner,
            dialect: Arc::new(dialect),
            receiver: Arc::new(NullEventReceiver),
            config: SessionConfig::default(),
        }
    }

    pub fn with_receiver(mut self, receiver: Arc<dyn EventReceiver>) -> Self {
        self.receiver = receiver;
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// 用本 Session 的方言编译任意 builder。
    pub fn to_sql(&self, builder: &dyn Builder) -> Result<(String, Vec<SqlValue>)> {
        compile(builder, self.dialect())
    }

    /// 创建 INSERT，批量上限取自 [`SessionConfig::batch_size`]。
    pub fn insert_into<'a>(&self, table: &str) -> InsertStmt<'a> {
        let mut stmt = insert_into(table);
        stmt.batch_size(self.config.batch_size);
        stmt
    }

    pub fn update(&self, table: &str) -> UpdateStmt {
        update(table)
    }

    pub fn delete_from(&self, table: &str) -> DeleteStmt {
        delete_from(table)
    }

    pub fn select<T: IntoStrings>(&self, columns: T) -> SelectStmt {
        select(columns)
    }

    /// 编译并执行一次修改类语句。
    pub async fn exec(&self, builder: &dyn Builder) -> Result<ExecResult> {
        let (sql, args) = self.to_sql(builder)?;
        self.exec_compiled(&sql, &args).await
    }

    /// 编译并执行一次查询，把每一行映射为 `T`。
    pub async fn query<T: FromRow>(&self, builder: &dyn Builder) -> Result<Vec<T>> {
        let (sql, args) = self.to_sql(builder)?;
        let rows = self.query_compiled(&sql, &args).await?;
        rows.iter().map(T::from_row).collect()
    }

    pub(crate) async fn exec_compiled(&self, sql: &str, args: &[SqlValue]) -> Result<ExecResult> {
        let span = tracing::debug_span!("halo_stmt.exec", sql, args = args.len());
        let start = Instant::now();
        let result = self
            .with_timeout(self.runner.exec(sql, args))
            .instrument(span)
            .await;
        self.notify(EVENT_EXEC, sql, start.elapsed(), result.as_ref().err());
        result
    }

    pub(crate) async fn query_compiled(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Row>> {
        let span = tracing::debug_span!("halo_stmt.query", sql, args = args.len());
        let start = Instant::now();
        let result = self
            .with_timeout(self.runner.query(sql, args))
            .instrument(span)
            .await;
        self.notify(EVENT_QUERY, sql, start.elapsed(), result.as_ref().err());
        result
    }

    async fn with_timeout<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match self.config.query_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout(limit)),
            },
            None => fut.await,
        }
    }

    fn notify(&self, event: &str, sql: &str, elapsed: Duration, err: Option<&Error>) {
        let mut kvs = Kvs::new();
        kvs.insert("sql", sql.to_string());
        kvs.insert("time", elapsed.as_millis().to_string());
        match err {
            Some(err) => self.receiver.event_err_kv(event, err, &kvs),
            None => self.receiver.timing_kv(event, elapsed, &kvs),
        }
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("runner", &self.runner)
            .field("dialect", &self.dialect)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
