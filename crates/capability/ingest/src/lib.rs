//! 接入宿主：把原始报文交给格式化器，再把记录转交给下游 sink。
//!
//! 宿主持有生命周期、日志与计数；格式化器本身保持无状态。

use async_trait::async_trait;
use domain::{RawEvent, TimeseriesRecord};
use spb_formatter::PayloadFormatter;
use spb_telemetry::{ConversionMetrics, MetricsSnapshot, new_trace_id};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// 接入错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("sink error: {0}")]
    Sink(String),
}

/// RawEvent 处理器。
#[async_trait]
pub trait RawEventHandler: Send + Sync {
    async fn handle(&self, event: RawEvent) -> Result<(), IngestError>;
}

/// 时序记录写入目标。
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn write(&self, records: Vec<TimeseriesRecord>) -> Result<(), IngestError>;
}

/// 内存 sink（用于接线与测试）。
#[derive(Debug, Default)]
pub struct InMemoryRecordSink {
    records: Mutex<Vec<TimeseriesRecord>>,
}

impl InMemoryRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已写入记录的副本（按写入顺序）。
    pub async fn records(&self) -> Vec<TimeseriesRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl RecordSink for InMemoryRecordSink {
    async fn write(&self, records: Vec<TimeseriesRecord>) -> Result<(), IngestError> {
        self.records.lock().await.extend(records);
        Ok(())
    }
}

/// 格式化处理器：RawEvent → PayloadFormatter → RecordSink。
///
/// 测点缺少时间戳时以报文接收时间作为默认时间戳。
pub struct FormatterHandler {
    formatter: Arc<dyn PayloadFormatter>,
    sink: Arc<dyn RecordSink>,
    metrics: Arc<ConversionMetrics>,
}

impl FormatterHandler {
    pub fn new(formatter: Arc<dyn PayloadFormatter>, sink: Arc<dyn RecordSink>) -> Self {
        Self {
            formatter,
            sink,
            metrics: Arc::new(ConversionMetrics::new()),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl RawEventHandler for FormatterHandler {
    async fn handle(&self, event: RawEvent) -> Result<(), IngestError> {
        let trace_id = new_trace_id();
        self.metrics.record_payload();
        debug!(
            target: "spb.ingest",
            trace_id = %trace_id,
            topic = %event.topic,
            formatter = self.formatter.name(),
            payload_size = event.payload.len(),
            received_at_ms = event.received_at_ms,
            "raw_event_received"
        );

        let records = self
            .formatter
            .format_with_default_timestamp(&event.payload, Some(event.received_at_ms));
        if records.is_empty() {
            self.metrics.record_empty_payload();
            warn!(
                target: "spb.ingest",
                trace_id = %trace_id,
                topic = %event.topic,
                "payload_produced_no_records"
            );
            return Ok(());
        }

        let count = records.len();
        self.metrics.record_records(count);
        match self.sink.write(records).await {
            Ok(()) => {
                self.metrics.record_sink_success();
                info!(
                    target: "spb.ingest",
                    trace_id = %trace_id,
                    topic = %event.topic,
                    records = count,
                    "records_written"
                );
                Ok(())
            }
            Err(err) => {
                self.metrics.record_sink_failure();
                warn!(
                    target: "spb.ingest",
                    trace_id = %trace_id,
                    topic = %event.topic,
                    error = %err,
                    "sink_write_failed"
                );
                Err(err)
            }
        }
    }
}
