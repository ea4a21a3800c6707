//! 时序记录及其结构校验。
//!
//! 记录只能通过 [`RecordDraft::validate`] 得到：要么完全合法，要么不存在。

use serde::Serialize;

/// 记录校验失败原因。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("invalid device path: {0}")]
    InvalidDevice(String),
    #[error("invalid measurements or values for device {device}: {measurements} measurements, {values} values")]
    MeasurementMismatch {
        device: String,
        measurements: usize,
        values: usize,
    },
    #[error("invalid timestamp for device {device}: {timestamp_ms}")]
    NonPositiveTimestamp { device: String, timestamp_ms: i64 },
}

/// 尚未校验的记录草稿（组装阶段使用）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub device: String,
    pub measurements: Vec<String>,
    pub values: Vec<String>,
    pub timestamp_ms: i64,
}

impl RecordDraft {
    /// 单测点草稿：一个测点名配一个值。
    pub fn single(
        device: impl Into<String>,
        measurement: impl Into<String>,
        value: impl Into<String>,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            device: device.into(),
            measurements: vec![measurement.into()],
            values: vec![value.into()],
            timestamp_ms,
        }
    }

    /// 按根路径前缀校验草稿，成功后得到不可变记录。
    ///
    /// 规则：
    /// - 设备路径等于 `root_prefix` 或位于其下（`root_prefix.` 开头）
    /// - 测点名与值均非空且数量一致
    /// - 时间戳为正
    pub fn validate(self, root_prefix: &str) -> Result<TimeseriesRecord, RecordError> {
        if !is_under_root(&self.device, root_prefix) {
            return Err(RecordError::InvalidDevice(self.device));
        }
        if self.measurements.is_empty()
            || self.values.is_empty()
            || self.measurements.len() != self.values.len()
        {
            return Err(RecordError::MeasurementMismatch {
                measurements: self.measurements.len(),
                values: self.values.len(),
                device: self.device,
            });
        }
        if self.timestamp_ms <= 0 {
            return Err(RecordError::NonPositiveTimestamp {
                device: self.device,
                timestamp_ms: self.timestamp_ms,
            });
        }
        Ok(TimeseriesRecord {
            device: self.device,
            measurements: self.measurements,
            values: self.values,
            timestamp_ms: self.timestamp_ms,
        })
    }
}

fn is_under_root(device: &str, root_prefix: &str) -> bool {
    if root_prefix.is_empty() {
        return false;
    }
    match device.strip_prefix(root_prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('.') && rest.len() > 1,
        None => false,
    }
}

/// 校验通过的时序记录，供下游时序库写入。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeseriesRecord {
    device: String,
    measurements: Vec<String>,
    values: Vec<String>,
    timestamp_ms: i64,
}

impl TimeseriesRecord {
    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn measurements(&self) -> &[String] {
        &self.measurements
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// 第一个（也是唯一的）测点名。
    pub fn measurement(&self) -> &str {
        &self.measurements[0]
    }

    /// 第一个（也是唯一的）值。
    pub fn value(&self) -> &str {
        &self.values[0]
    }
}
