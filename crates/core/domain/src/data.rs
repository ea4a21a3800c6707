/// 接入层收到的原始报文。
///
/// `topic` 只作为日志上下文透传，不参与解析。
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub topic: String,
    pub payload: Vec<u8>,
    pub received_at_ms: i64,
}

impl RawEvent {
    pub fn new(topic: impl Into<String>, payload: Vec<u8>, received_at_ms: i64) -> Self {
        Self {
            topic: topic.into(),
            payload,
            received_at_ms,
        }
    }
}
