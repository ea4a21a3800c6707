//! Sparkplug B 报文解码
//!
//! 把 protobuf 字节解成 [`DecodedPayload`]。值读取失败只影响该测点的值
//! （退化为 [`MetricValue::Null`]），不会让整个报文失败。

use crate::datatype::DataType;
use crate::error::FormatError;
use crate::proto::{self, property_value};
use crate::types::{DecodedPayload, MetricProperty, PropertyData, RawMetric, lossy_text};
use crate::value::MetricValue;
use prost::Message;
use tracing::warn;

/// 解码报文字节。空输入得到空测点列表。
pub fn decode_payload(bytes: &[u8]) -> Result<DecodedPayload, FormatError> {
    if bytes.is_empty() {
        return Ok(DecodedPayload {
            timestamp: None,
            seq: None,
            metrics: Vec::new(),
        });
    }

    let payload = proto::Payload::decode(bytes)?;
    Ok(DecodedPayload {
        timestamp: payload.timestamp,
        seq: payload.seq,
        metrics: payload.metrics.into_iter().map(raw_metric).collect(),
    })
}

fn raw_metric(metric: proto::Metric) -> RawMetric {
    let name = metric.name.as_deref().map(lossy_text);
    let datatype = DataType::from_code(metric.datatype.unwrap_or_default());
    let value = match MetricValue::read(
        datatype,
        metric.is_null.unwrap_or(false),
        metric.value.as_ref(),
    ) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                target: "spb.formatter",
                metric = name.as_deref().unwrap_or(""),
                error = %err,
                "metric_value_unreadable"
            );
            MetricValue::Null
        }
    };

    RawMetric {
        name,
        value,
        timestamp: metric.timestamp,
        properties: metric.properties.map(properties).unwrap_or_default(),
    }
}

/// 按下标配对 keys 与 values，较短的一侧结束即停止。
fn properties(set: proto::PropertySet) -> Vec<MetricProperty> {
    set.keys
        .into_iter()
        .zip(set.values)
        .map(|(key, value)| MetricProperty {
            key: lossy_text(&key),
            value: property_data(value),
        })
        .collect()
}

fn property_data(value: proto::PropertyValue) -> PropertyData {
    let datatype = DataType::from_code(value.r#type.unwrap_or_default());
    if !datatype.is_text() {
        return PropertyData::NonText(datatype.code());
    }
    if value.is_null.unwrap_or(false) {
        return PropertyData::Text(None);
    }
    match value.value {
        Some(property_value::Value::StringValue(text)) => {
            PropertyData::Text(Some(lossy_text(&text)))
        }
        _ => PropertyData::Text(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::metric;

    #[test]
    fn empty_bytes_decode_to_no_metrics() {
        let decoded = decode_payload(&[]).unwrap();
        assert!(decoded.metrics.is_empty());
    }

    #[test]
    fn malformed_bytes_fail() {
        assert!(decode_payload(&[1, 2, 3]).is_err());
        assert!(decode_payload(&[1]).is_err());
    }

    #[test]
    fn property_lists_pair_by_position() {
        let set = proto::PropertySet {
            keys: vec!["group".into(), "edge".into(), "device".into()],
            values: vec![
                proto::PropertyValue {
                    r#type: Some(12),
                    is_null: None,
                    value: Some(property_value::Value::StringValue("g".into())),
                },
                proto::PropertyValue {
                    r#type: Some(3),
                    is_null: None,
                    value: Some(property_value::Value::IntValue(7)),
                },
            ],
        };
        let props = properties(set);
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].value, PropertyData::Text(Some("g".into())));
        assert_eq!(props[1].value, PropertyData::NonText(3));
    }

    #[test]
    fn invalid_utf8_text_is_replaced_not_rejected() {
        let payload = proto::Payload {
            timestamp: Some(1),
            metrics: vec![proto::Metric {
                name: Some(b"Temp \xb0C".to_vec()),
                datatype: Some(12),
                value: Some(metric::Value::StringValue(b"\xff ok".to_vec())),
                properties: Some(proto::PropertySet {
                    keys: vec![b"gr\xffoup".to_vec()],
                    values: vec![proto::PropertyValue {
                        r#type: Some(12),
                        is_null: None,
                        value: Some(property_value::Value::StringValue(b"line\xfe".to_vec())),
                    }],
                }),
                ..Default::default()
            }],
            seq: None,
            uuid: Some(vec![0xff, 0xfe]),
            body: None,
        };
        let decoded = decode_payload(&payload.encode_to_vec()).unwrap();
        let metric = &decoded.metrics[0];
        assert_eq!(metric.label(), "Temp \u{fffd}C");
        assert_eq!(metric.value, MetricValue::String("\u{fffd} ok".into()));
        assert_eq!(metric.properties[0].key, "gr\u{fffd}oup");
        assert_eq!(
            metric.properties[0].value,
            PropertyData::Text(Some("line\u{fffd}".into()))
        );
    }

    #[test]
    fn unreadable_value_becomes_null() {
        let payload = proto::Payload {
            timestamp: Some(1),
            metrics: vec![proto::Metric {
                name: Some("Flag".into()),
                datatype: Some(11),
                value: Some(metric::Value::StringValue("yes".into())),
                ..Default::default()
            }],
            seq: Some(0),
            uuid: None,
            body: None,
        };
        let decoded = decode_payload(&payload.encode_to_vec()).unwrap();
        assert_eq!(decoded.seq, Some(0));
        assert_eq!(decoded.metrics[0].value, MetricValue::Null);
        assert_eq!(decoded.metrics[0].label(), "Flag");
    }
}
