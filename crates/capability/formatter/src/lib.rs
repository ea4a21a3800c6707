//! # Sparkplug B 报文格式化模块
//!
//! 把 Sparkplug B（protobuf）报文转换为扁平的时序记录，每条记录包含：
//! - **设备路径**：固定根前缀 + 属性中的 group / edge / device
//! - **测点名**：规整后的单个名称
//! - **值**：按声明类型字符串化后的单个值
//! - **时间戳**：毫秒，必为正
//!
//! ## 处理流程
//!
//! ```text
//! bytes
//!   │
//!   ▼
//! decoder（protobuf → RawMetric 列表）
//!   │
//!   ├── identity（属性 → 设备路径）
//!   ├── value（声明类型 → 字符串）
//!   └── spb_normalize（测点名规整）
//!   │
//!   ▼
//! RecordDraft::validate → TimeseriesRecord 列表
//! ```
//!
//! 转换是无状态的同步纯函数：报文无法解析、没有测点或全部记录校验失败时，
//! 结果都只是空列表，原因只出现在 `spb.formatter` 日志中。
//!
//! ```rust,ignore
//! let formatter = SparkplugFormatter::new(FormatterConfig::from_env()?);
//! for record in formatter.format(&bytes) {
//!     sink.write(record);
//! }
//! ```

mod datatype;
mod decoder;
mod error;
mod formatter;
mod identity;
pub mod proto;
mod types;
mod value;

pub use datatype::DataType;
pub use error::ValueError;
pub use formatter::{PayloadFormatter, SparkplugFormatter};
pub use identity::{IDENTITY_ALIASES, IdentitySlot, resolve_device_path};
pub use types::*;
pub use value::{MetricValue, coerce};
