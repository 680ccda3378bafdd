//! 测试用的 Runner 与 EventReceiver。

use crate::error::{Error, Result};
use crate::event::{EventReceiver, Kvs};
use crate::runner::{ExecResult, Row, Runner};
use crate::value::SqlValue;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// 记录每次调用，并按调用顺序分配自增 id（从 1 开始）。
#[derive(Debug, Default)]
pub(crate) struct MockRunner {
    calls: Mutex<Vec<(String, Vec<SqlValue>)>>,
    next_id: AtomicI64,
    /// 第 N 次调用（从 1 开始）返回错误。
    fail_on: Option<usize>,
    rows: Vec<Row>,
    delay: Option<Duration>,
    without_ids: bool,
}

impl MockRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_on(mut self, call: usize) -> Self {
        self.fail_on = Some(call);
        self
    }

    pub(crate) fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn without_ids(mut self) -> Self {
        self.without_ids = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    async fn record(&self, sql: &str, args: &[SqlValue]) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let n = {
            let mut calls = self.calls.lock().map_err(|e| Error::runner(e.to_string()))?;
            calls.push((sql.to_string(), args.to_vec()));
            calls.len()
        };
        if self.fail_on == Some(n) {
            return Err(Error::runner(format!("call {n} failed")));
        }
        Ok(())
    }
}

impl Runner for MockRunner {
    async fn exec(&self, sql: &str, args: &[SqlValue]) -> Result<ExecResult> {
        self.record(sql, args).await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ExecResult {
            rows_affected: 1,
            last_insert_id: (!self.without_ids).then_some(id),
        })
    }

    async fn query(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Row>> {
        self.record(sql, args).await?;
        Ok(self.rows.clone())
    }
}

/// 把收到的事件按 `kind:event` 记录下来。
#[derive(Debug, Default)]
pub(crate) struct RecordingReceiver {
    events: Mutex<Vec<(String, Kvs)>>,
}

impl RecordingReceiver {
    pub(crate) fn events(&self) -> Vec<(String, Kvs)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn push(&self, name: String, kvs: &Kvs) {
        if let Ok(mut events) = self.events.lock() {
            events.push((name, kvs.clone()));
        }
    }
}

impl EventReceiver for RecordingReceiver {
    fn event_err_kv(&self, event_name: &str, _err: &Error, kvs: &Kvs) {
        self.push(format!("error:{event_name}"), kvs);
    }

    fn timing_kv(&self, event_name: &str, _elapsed: Duration, kvs: &Kvs) {
        self.push(format!("timing:{event_name}"), kvs);
    }
}
