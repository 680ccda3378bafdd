//! EventReceiver：执行前后的事件通知（SQL 文本、耗时、错误）。
//!
//! 默认使用什么都不做的 [`NullEventReceiver`]；需要 SQL 日志时把
//! [`TracingEventReceiver`] 交给 `Session`，由它通过 `tracing` 输出。

use crate::error::Error;
use std::collections::BTreeMap;
use std::time::Duration;

/// 事件附带的键值数据，例如 `sql`、`time`（毫秒）。
pub type Kvs = BTreeMap<&'static str, String>;

/// 执行修改类语句的事件名。
pub const EVENT_EXEC: &str = "halo_stmt.exec";
/// 执行查询的事件名。
pub const EVENT_QUERY: &str = "halo_stmt.query";

/// 接收执行事件；所有方法默认不做任何事。
pub trait EventReceiver: Send + Sync {
    fn event(&self, _event_name: &str) {}

    fn event_kv(&self, _event_name: &str, _kvs: &Kvs) {}

    fn event_err(&self, _event_name: &str, _err: &Error) {}

    fn event_err_kv(&self, _event_name: &str, _err: &Error, _kvs: &Kvs) {}

    fn timing(&self, _event_name: &str, _elapsed: Duration) {}

    fn timing_kv(&self, _event_name: &str, _elapsed: Duration, _kvs: &Kvs) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventReceiver;

impl EventReceiver for NullEventReceiver {}

/// SQL 日志级别。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum SqlLogLevel {
    #[default]
    Off,
    /// 只记录失败的语句。
    Errors,
    /// 记录全部语句。
    All,
}

/// 通过 `tracing` 输出 SQL 日志的 receiver。
#[derive(Debug, Clone)]
pub struct TracingEventReceiver {
    pub level: SqlLogLevel,
    /// 日志里 SQL 的最大字节数；`None` 表示不截断。
    pub max_sql_length: Option<usize>,
}

impl Default for TracingEventReceiver {
    fn default() -> Self {
        Self {
            level: SqlLogLevel::All,
            max_sql_length: Some(200),
        }
    }
}

impl TracingEventReceiver {
    pub fn new(level: SqlLogLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    fn sql(&self, kvs: &Kvs) -> String {
        let sql = kvs.get("sql").map(String::as_str).unwrap_or("-");
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }
}

impl EventReceiver for TracingEventReceiver {
    fn event_err_kv(&self, event_name: &str, err: &Error, kvs: &Kvs) {
        if self.level < SqlLogLevel::Errors {
            return;
        }
        let elapsed_ms = kvs.get("time").map(String::as_str).unwrap_or("-");
        tracing::error!(
            target: "halo_stmt.sql",
            event = event_name,
            elapsed_ms,
            error = %err,
            sql = %self.sql(kvs),
            "sql failed"
        );
    }

    fn timing_kv(&self, event_name: &str, elapsed: Duration, kvs: &Kvs) {
        if self.level < SqlLogLevel::All {
            return;
        }
        tracing::info!(
            target: "halo_stmt.sql",
            event = event_name,
            elapsed_ms = elapsed.as_millis() as u64,
            sql = %self.sql(kvs),
            "sql ok"
        );
    }
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
