//! 报文 → 时序记录转换入口

use crate::decoder::decode_payload;
use crate::identity::resolve_device_path;
use crate::types::{RawMetric, now_epoch_ms};
use crate::value::coerce;
use domain::{RecordDraft, RecordError, TimeseriesRecord};
use spb_config::FormatterConfig;
use spb_normalize::normalize_name;
use tracing::{debug, error, warn};

/// 报文格式化器抽象。
///
/// 实现必须是纯函数：不保留跨调用状态，任何失败都只体现为更短（或为空）的
/// 记录列表，诊断信息只走日志。
pub trait PayloadFormatter: Send + Sync {
    /// 格式化器名称
    fn name(&self) -> &'static str;

    /// 转换报文；测点缺少时间戳时依次回退到 `default_timestamp_ms` 和当前时间。
    fn format_with_default_timestamp(
        &self,
        payload: &[u8],
        default_timestamp_ms: Option<i64>,
    ) -> Vec<TimeseriesRecord>;

    /// 转换报文；测点缺少时间戳时使用当前时间。
    fn format(&self, payload: &[u8]) -> Vec<TimeseriesRecord> {
        self.format_with_default_timestamp(payload, None)
    }
}

/// Sparkplug B 报文格式化器
#[derive(Debug, Clone, Default)]
pub struct SparkplugFormatter {
    config: FormatterConfig,
}

impl SparkplugFormatter {
    pub const NAME: &'static str = "CustomizedSparkplugB";

    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    /// 组装并校验单个测点的记录
    fn assemble(
        &self,
        metric: &RawMetric,
        default_timestamp_ms: Option<i64>,
    ) -> Result<TimeseriesRecord, RecordError> {
        let label = metric.label();
        let device = resolve_device_path(label, &metric.properties, &self.config);
        let measurement = normalize_name(metric.name.as_deref());
        let timestamp_ms = resolve_timestamp(metric.timestamp, default_timestamp_ms);
        let value = coerce(label, &metric.value);

        RecordDraft::single(device, measurement, value, timestamp_ms)
            .validate(&self.config.root_prefix)
    }
}

impl PayloadFormatter for SparkplugFormatter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn format_with_default_timestamp(
        &self,
        payload: &[u8],
        default_timestamp_ms: Option<i64>,
    ) -> Vec<TimeseriesRecord> {
        if payload.is_empty() {
            warn!(target: "spb.formatter", "empty_payload");
            return Vec::new();
        }

        let decoded = match decode_payload(payload) {
            Ok(decoded) => decoded,
            Err(err) => {
                error!(
                    target: "spb.formatter",
                    payload_size = payload.len(),
                    error = %err,
                    "payload_decode_failed"
                );
                return Vec::new();
            }
        };

        if decoded.metrics.is_empty() {
            warn!(target: "spb.formatter", seq = ?decoded.seq, "payload_without_metrics");
            return Vec::new();
        }
        debug!(
            target: "spb.formatter",
            seq = ?decoded.seq,
            timestamp = ?decoded.timestamp,
            metrics = decoded.metrics.len(),
            "payload_decoded"
        );

        decoded
            .metrics
            .iter()
            .filter_map(|metric| match self.assemble(metric, default_timestamp_ms) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(
                        target: "spb.formatter",
                        metric = %metric.label(),
                        error = %err,
                        "record_dropped"
                    );
                    None
                }
            })
            .collect()
    }
}

/// 时间戳回退顺序：测点自带（>0）→ 调用方默认值（>0）→ 当前时间。
fn resolve_timestamp(metric_timestamp: Option<u64>, default_timestamp_ms: Option<i64>) -> i64 {
    metric_timestamp
        .and_then(|ts| i64::try_from(ts).ok())
        .filter(|ts| *ts > 0)
        .or(default_timestamp_ms.filter(|ts| *ts > 0))
        .unwrap_or_else(now_epoch_ms)
}
