//! 测点值的读取与字符串化
//!
//! 读取阶段按声明类型把 protobuf 值槽位解成 [`MetricValue`]，类型码与值不会
//! 出现不一致；字符串化阶段对 [`MetricValue`] 做穷举匹配，规则固定：
//!
//! | 类型 | 输出 |
//! |---|---|
//! | Unknown / Double / Float | 6 位小数 |
//! | 有符号整数 | 十进制整数 |
//! | 无符号整数、DateTime | 十进制整数（按数值本身输出） |
//! | Boolean | `true` / `false` |
//! | String / Text | 值规整（空白折叠为 `_`） |
//! | 其他类型码 | 按 Double 回退，并记录告警 |

use crate::datatype::DataType;
use crate::error::ValueError;
use crate::proto::metric::Value as WireValue;
use crate::types::lossy_text;
use spb_normalize::{NULL_TOKEN, normalize_value};
use tracing::warn;

/// 按声明类型解出的测点值
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    DateTime(u64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    Text(String),
    /// 不支持的类型码；若携带 double 槽位则以其作为回退值
    Unrecognized { datatype: u32, fallback: Option<f64> },
    /// 值缺失、显式 is_null 或无法按声明类型读取
    Null,
}

impl MetricValue {
    /// 按声明类型读取值槽位。
    ///
    /// 整数类型同时接受 int 与 long 槽位：int 槽位是 32 位补码，long 槽位是
    /// 64 位补码，有符号类型按补码还原，无符号类型按数值本身读取。
    pub fn read(
        datatype: DataType,
        is_null: bool,
        slot: Option<&WireValue>,
    ) -> Result<Self, ValueError> {
        if is_null {
            return Ok(Self::Null);
        }
        let Some(slot) = slot else {
            return Ok(Self::Null);
        };

        let value = match datatype {
            DataType::Unknown | DataType::Double => match slot {
                WireValue::DoubleValue(v) => Self::Double(*v),
                other => return Err(mismatch(datatype, other)),
            },
            DataType::Float => match slot {
                WireValue::FloatValue(v) => Self::Float(*v),
                other => return Err(mismatch(datatype, other)),
            },
            DataType::Int8 => Self::Int8(narrow(datatype, signed(datatype, slot)?)?),
            DataType::Int16 => Self::Int16(narrow(datatype, signed(datatype, slot)?)?),
            DataType::Int32 => Self::Int32(narrow(datatype, signed(datatype, slot)?)?),
            DataType::Int64 => Self::Int64(signed(datatype, slot)?),
            DataType::UInt8 => Self::UInt8(narrow(datatype, unsigned(datatype, slot)?)?),
            DataType::UInt16 => Self::UInt16(narrow(datatype, unsigned(datatype, slot)?)?),
            DataType::UInt32 => Self::UInt32(narrow(datatype, unsigned(datatype, slot)?)?),
            DataType::UInt64 => Self::UInt64(unsigned(datatype, slot)?),
            DataType::DateTime => Self::DateTime(unsigned(datatype, slot)?),
            DataType::Boolean => match slot {
                WireValue::BooleanValue(v) => Self::Boolean(*v),
                other => return Err(mismatch(datatype, other)),
            },
            DataType::String | DataType::Text => match slot {
                WireValue::StringValue(v) if datatype == DataType::String => {
                    Self::String(lossy_text(v))
                }
                WireValue::StringValue(v) => Self::Text(lossy_text(v)),
                other => return Err(mismatch(datatype, other)),
            },
            DataType::Other(code) => Self::Unrecognized {
                datatype: code,
                fallback: match slot {
                    WireValue::DoubleValue(v) => Some(*v),
                    _ => None,
                },
            },
        };
        Ok(value)
    }
}

/// 把测点值转为下游写入用的字符串。
///
/// `metric` 只用于诊断日志。
pub fn coerce(metric: &str, value: &MetricValue) -> String {
    match value {
        MetricValue::Int8(v) => v.to_string(),
        MetricValue::Int16(v) => v.to_string(),
        MetricValue::Int32(v) => v.to_string(),
        MetricValue::Int64(v) => v.to_string(),
        MetricValue::UInt8(v) => v.to_string(),
        MetricValue::UInt16(v) => v.to_string(),
        MetricValue::UInt32(v) => v.to_string(),
        MetricValue::UInt64(v) | MetricValue::DateTime(v) => v.to_string(),
        MetricValue::Float(v) => fixed_six(f64::from(*v)),
        MetricValue::Double(v) => fixed_six(*v),
        MetricValue::Boolean(v) => v.to_string(),
        MetricValue::String(v) | MetricValue::Text(v) => normalize_value(Some(v)),
        MetricValue::Unrecognized { datatype, fallback } => {
            warn!(
                target: "spb.formatter",
                metric = %metric,
                datatype = *datatype,
                "unexpected_datatype_defaulting_to_double"
            );
            match fallback {
                Some(v) => fixed_six(*v),
                None => NULL_TOKEN.to_string(),
            }
        }
        MetricValue::Null => NULL_TOKEN.to_string(),
    }
}

/// 保留 6 位小数。
///
/// 以最短往返十进制表示为准做四舍五入（0.5 进位），而不是按二进制精确值
/// 取偶：`0.0078125` → `0.007813`。Float 先扩展为 f64 再格式化。
fn fixed_six(value: f64) -> String {
    const SCALE: usize = 6;
    if !value.is_finite() {
        return value.to_string();
    }

    // f64 的 Display 输出最短往返表示，且不使用指数形式
    let repr = value.to_string();
    let (negative, unsigned) = match repr.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, repr.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut digits: Vec<u8> = int_part.bytes().collect();
    digits.extend(frac_part.bytes().chain(std::iter::repeat(b'0')).take(SCALE));
    let round_up = frac_part.as_bytes().get(SCALE).is_some_and(|d| *d >= b'5');
    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - SCALE;
    let mut out = String::with_capacity(digits.len() + 2);
    if negative {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|d| char::from(*d)));
    out.push('.');
    out.extend(digits[split..].iter().map(|d| char::from(*d)));
    out
}

fn signed(datatype: DataType, slot: &WireValue) -> Result<i64, ValueError> {
    match slot {
        WireValue::IntValue(raw) => Ok(i64::from(*raw as i32)),
        WireValue::LongValue(raw) => Ok(*raw as i64),
        other => Err(mismatch(datatype, other)),
    }
}

fn unsigned(datatype: DataType, slot: &WireValue) -> Result<u64, ValueError> {
    match slot {
        WireValue::IntValue(raw) => Ok(u64::from(*raw)),
        WireValue::LongValue(raw) => Ok(*raw),
        other => Err(mismatch(datatype, other)),
    }
}

fn narrow<S, T>(datatype: DataType, value: S) -> Result<T, ValueError>
where
    S: Copy + Into<i128>,
    T: TryFrom<S>,
{
    T::try_from(value).map_err(|_| ValueError::OutOfRange {
        datatype,
        value: value.into(),
    })
}

fn mismatch(datatype: DataType, slot: &WireValue) -> ValueError {
    let slot = match slot {
        WireValue::IntValue(_) => "int",
        WireValue::LongValue(_) => "long",
        WireValue::FloatValue(_) => "float",
        WireValue::DoubleValue(_) => "double",
        WireValue::BooleanValue(_) => "boolean",
        WireValue::StringValue(_) => "string",
        WireValue::BytesValue(_) => "bytes",
    };
    ValueError::SlotMismatch { datatype, slot }
}
