//! 解码后的中间类型定义

use crate::value::MetricValue;

/// 解码后的报文
///
/// 报文级时间戳与序号只用于诊断日志。
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPayload {
    pub timestamp: Option<u64>,
    pub seq: Option<u64>,
    pub metrics: Vec<RawMetric>,
}

/// 解码后的单个测点，仅在一次转换调用内存在
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetric {
    /// 测点名（可能缺失或为空）
    pub name: Option<String>,
    /// 按声明类型解出的值
    pub value: MetricValue,
    /// 测点自带时间戳（毫秒，可能缺失或为 0）
    pub timestamp: Option<u64>,
    /// 按原始顺序保留的属性
    pub properties: Vec<MetricProperty>,
}

impl RawMetric {
    /// 日志中使用的测点名
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// 测点属性
#[derive(Debug, Clone, PartialEq)]
pub struct MetricProperty {
    pub key: String,
    pub value: PropertyData,
}

/// 属性值：只区分文本与非文本
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyData {
    /// 声明为文本类型；值缺失、is_null 或槽位不是字符串时为 `None`
    Text(Option<String>),
    /// 非文本类型，携带原始类型码
    NonText(u32),
}

/// 把线上文本字节转为 `String`，非法 UTF-8 序列替换为 U+FFFD
pub(crate) fn lossy_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// 获取当前时间戳（毫秒）
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
