//! 日志初始化、追踪 ID 与转换计数。
//!
//! 计数器由接入宿主更新；格式化核心本身不持有任何跨调用状态。

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 转换计数快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub payloads_received: u64,
    pub payloads_empty: u64,
    pub records_emitted: u64,
    pub sink_success: u64,
    pub sink_failure: u64,
}

/// 转换计数。
#[derive(Debug, Default)]
pub struct ConversionMetrics {
    payloads_received: AtomicU64,
    payloads_empty: AtomicU64,
    records_emitted: AtomicU64,
    sink_success: AtomicU64,
    sink_failure: AtomicU64,
}

impl ConversionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            payloads_received: self.payloads_received.load(Ordering::Relaxed),
            payloads_empty: self.payloads_empty.load(Ordering::Relaxed),
            records_emitted: self.records_emitted.load(Ordering::Relaxed),
            sink_success: self.sink_success.load(Ordering::Relaxed),
            sink_failure: self.sink_failure.load(Ordering::Relaxed),
        }
    }

    /// 记录收到的报文数。
    pub fn record_payload(&self) {
        self.payloads_received.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录未产出任何记录的报文数（空报文、解析失败、无合法测点）。
    pub fn record_empty_payload(&self) {
        self.payloads_empty.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录产出的记录条数。
    pub fn record_records(&self, count: usize) {
        self.records_emitted.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// 记录 sink 写入成功次数。
    pub fn record_sink_success(&self) {
        self.sink_success.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录 sink 写入失败次数。
    pub fn record_sink_failure(&self) {
        self.sink_failure.fetch_add(1, Ordering::Relaxed);
    }
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 trace_id，用于关联同一报文的日志。
pub fn new_trace_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
