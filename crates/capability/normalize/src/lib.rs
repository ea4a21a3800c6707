//! 测点名与字符串值的文本规整。
//!
//! 纯函数、无外部状态；对同一输入总是给出同一输出，且重复规整结果不变。

use regex::Regex;
use std::sync::LazyLock;

/// 空值统一输出的占位符。
pub const NULL_TOKEN: &str = "null";

/// 表示“无测点名”的哨兵名称。
pub const NULL_METRIC_NAME: &str = "NullMetric";

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("invalid regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid regex"));

/// 规整测点名或身份属性值。
///
/// - 缺失、空串、纯空白、哨兵名称 → `"null"`
/// - 其余：去首尾空白 → 驼峰边界插入 `_` → 空白折叠为 `_` → 全部小写
///
/// ```
/// assert_eq!(spb_normalize::normalize_name(Some("DeviceHealth")), "device_health");
/// assert_eq!(spb_normalize::normalize_name(Some("Coils Block_1")), "coils_block_1");
/// ```
pub fn normalize_name(input: Option<&str>) -> String {
    let Some(trimmed) = non_blank(input) else {
        return NULL_TOKEN.to_string();
    };
    if input == Some(NULL_METRIC_NAME) {
        return NULL_TOKEN.to_string();
    }
    let split = CAMEL_BOUNDARY.replace_all(trimmed, "${1}_${2}");
    WHITESPACE_RUN.replace_all(&split, "_").to_lowercase()
}

/// 规整字符串类型的测点值。
///
/// 与测点名共用空值与空白策略，但保留大小写，也不拆分驼峰。
pub fn normalize_value(input: Option<&str>) -> String {
    match non_blank(input) {
        Some(trimmed) => WHITESPACE_RUN.replace_all(trimmed, "_").into_owned(),
        None => NULL_TOKEN.to_string(),
    }
}

fn non_blank(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|value| !value.is_empty())
}
