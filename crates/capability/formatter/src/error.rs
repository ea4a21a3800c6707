//! 转换错误类型定义

use crate::datatype::DataType;

/// 报文级错误（整个报文不可用）
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// protobuf 结构解析失败
    #[error("sparkplug payload decode error: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// 测点值读取错误
///
/// 不会导致测点被丢弃，只会让值退化为 `"null"`。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// 值槽位与声明类型不符
    #[error("{datatype} metric carries a {slot} value")]
    SlotMismatch {
        datatype: DataType,
        slot: &'static str,
    },

    /// 整数超出声明类型的表示范围
    #[error("value {value} out of range for {datatype}")]
    OutOfRange { datatype: DataType, value: i128 },
}
