//! 转换器运行配置加载。

use std::env;

/// 所有设备路径的固定根前缀。
pub const DEFAULT_ROOT_PREFIX: &str = "root.mqtt.sparkplugb";

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 转换器配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    /// 设备路径根前缀
    pub root_prefix: String,
    /// 身份属性不完整时使用的设备路径
    pub default_device: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            root_prefix: DEFAULT_ROOT_PREFIX.to_string(),
            default_device: DEFAULT_ROOT_PREFIX.to_string(),
        }
    }
}

impl FormatterConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let root_prefix =
            read_optional("SPB_ROOT_PREFIX").unwrap_or_else(|| DEFAULT_ROOT_PREFIX.to_string());
        let default_device =
            read_optional("SPB_DEFAULT_DEVICE").unwrap_or_else(|| root_prefix.clone());

        let config = Self {
            root_prefix,
            default_device,
        };
        config.validate()?;
        Ok(config)
    }

    /// 校验根前缀与默认设备路径的形状。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let root = self.root_prefix.as_str();
        if !is_path(root) || !(root == "root" || root.starts_with("root.")) {
            return Err(ConfigError::Invalid(
                "SPB_ROOT_PREFIX".to_string(),
                self.root_prefix.clone(),
            ));
        }

        let device = self.default_device.as_str();
        let nested = device
            .strip_prefix(root)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'));
        if !is_path(device) || !nested {
            return Err(ConfigError::Invalid(
                "SPB_DEFAULT_DEVICE".to_string(),
                self.default_device.clone(),
            ));
        }
        Ok(())
    }
}

/// 路径段非空且不含空白。
fn is_path(value: &str) -> bool {
    !value.is_empty()
        && !value.chars().any(char::is_whitespace)
        && value.split('.').all(|segment| !segment.is_empty())
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
