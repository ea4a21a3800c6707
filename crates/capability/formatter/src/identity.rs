//! 设备身份解析
//!
//! 从测点属性中取出 group / edge-node / device 三段身份，拼成
//! `<root>.<group>.<edge>.<device>`；任何一段缺失时使用默认设备路径。

use crate::types::{MetricProperty, PropertyData};
use spb_config::FormatterConfig;
use spb_normalize::normalize_name;
use tracing::debug;

/// 身份槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySlot {
    Group,
    EdgeNode,
    Device,
}

/// 槽位 → 可接受的属性键（规范名在前，历史名在后）
pub const IDENTITY_ALIASES: &[(IdentitySlot, &[&str])] = &[
    (IdentitySlot::Group, &["group", "GroupID"]),
    (IdentitySlot::EdgeNode, &["edge", "EdgeNodeID"]),
    (IdentitySlot::Device, &["device", "AgentID"]),
];

impl IdentitySlot {
    /// 根据属性键查找槽位
    pub fn for_key(key: &str) -> Option<Self> {
        IDENTITY_ALIASES
            .iter()
            .find(|(_, keys)| keys.contains(&key))
            .map(|(slot, _)| *slot)
    }
}

#[derive(Debug, Default)]
struct DeviceIdentity {
    group: Option<String>,
    edge_node: Option<String>,
    device: Option<String>,
}

impl DeviceIdentity {
    fn assign(&mut self, slot: IdentitySlot, value: String) {
        let target = match slot {
            IdentitySlot::Group => &mut self.group,
            IdentitySlot::EdgeNode => &mut self.edge_node,
            IdentitySlot::Device => &mut self.device,
        };
        *target = Some(value);
    }

    fn path(&self, root_prefix: &str) -> Option<String> {
        match (&self.group, &self.edge_node, &self.device) {
            (Some(group), Some(edge), Some(device)) => {
                Some(format!("{root_prefix}.{group}.{edge}.{device}"))
            }
            _ => None,
        }
    }
}

/// 解析测点的设备路径。
///
/// 只看文本类型的属性；同一槽位出现多次时按属性顺序后者覆盖前者。
/// 槽位值经过 [`normalize_name`]，空值会被记为 `"null"` 但仍算已解析。
pub fn resolve_device_path(
    metric: &str,
    properties: &[MetricProperty],
    config: &FormatterConfig,
) -> String {
    let mut identity = DeviceIdentity::default();
    for property in properties {
        let PropertyData::Text(text) = &property.value else {
            continue;
        };
        if let Some(slot) = IdentitySlot::for_key(&property.key) {
            identity.assign(slot, normalize_name(text.as_deref()));
        }
    }

    match identity.path(&config.root_prefix) {
        Some(path) => {
            debug!(
                target: "spb.formatter",
                metric = %metric,
                device = %path,
                "device_path_resolved"
            );
            path
        }
        None => {
            debug!(
                target: "spb.formatter",
                metric = %metric,
                device = %config.default_device,
                "device_identity_incomplete_using_default"
            );
            config.default_device.clone()
        }
    }
}
