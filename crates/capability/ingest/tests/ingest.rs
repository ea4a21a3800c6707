use async_trait::async_trait;
use domain::{RawEvent, TimeseriesRecord};
use prost::Message;
use spb_formatter::SparkplugFormatter;
use spb_formatter::proto::{Metric, Payload, metric};
use spb_ingest::{FormatterHandler, InMemoryRecordSink, IngestError, RawEventHandler, RecordSink};
use std::sync::Arc;

#[derive(Default)]
struct FailingSink;

#[async_trait]
impl RecordSink for FailingSink {
    async fn write(&self, _records: Vec<TimeseriesRecord>) -> Result<(), IngestError> {
        Err(IngestError::Sink("forced failure".to_string()))
    }
}

fn status_payload(timestamp: Option<u64>) -> Vec<u8> {
    Payload {
        timestamp: Some(1),
        metrics: vec![
            Metric {
                name: Some("Status".into()),
                timestamp,
                datatype: Some(11),
                value: Some(metric::Value::BooleanValue(true)),
                ..Default::default()
            },
            Metric {
                name: Some("Line Speed".into()),
                timestamp,
                datatype: Some(10),
                value: Some(metric::Value::DoubleValue(1.25)),
                ..Default::default()
            },
        ],
        seq: Some(3),
        uuid: None,
        body: None,
    }
    .encode_to_vec()
}

fn handler(sink: Arc<dyn RecordSink>) -> FormatterHandler {
    FormatterHandler::new(Arc::new(SparkplugFormatter::default()), sink)
}

#[tokio::test]
async fn records_reach_sink_in_order() {
    let sink = Arc::new(InMemoryRecordSink::new());
    let handler = handler(sink.clone());

    handler
        .handle(RawEvent::new("spBv1.0/G/DDATA/E/D", status_payload(Some(99)), 1_000))
        .await
        .expect("handled");

    let records = sink.records().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].measurement(), "status");
    assert_eq!(records[0].value(), "true");
    assert_eq!(records[1].measurement(), "line_speed");
    assert_eq!(records[1].value(), "1.250000");
    assert!(records.iter().all(|record| record.timestamp_ms() == 99));

    let snapshot = handler.metrics();
    assert_eq!(snapshot.payloads_received, 1);
    assert_eq!(snapshot.records_emitted, 2);
    assert_eq!(snapshot.sink_success, 1);
}

#[tokio::test]
async fn received_at_is_default_timestamp() {
    let sink = Arc::new(InMemoryRecordSink::new());
    let handler = handler(sink.clone());

    handler
        .handle(RawEvent::new("t", status_payload(None), 1_000))
        .await
        .expect("handled");

    let records = sink.records().await;
    assert!(records.iter().all(|record| record.timestamp_ms() == 1_000));
}

#[tokio::test]
async fn malformed_payload_is_counted_not_failed() {
    let sink = Arc::new(InMemoryRecordSink::new());
    let handler = handler(sink.clone());

    handler
        .handle(RawEvent::new("t", vec![1, 2, 3], 1_000))
        .await
        .expect("malformed payload is not an error");
    handler
        .handle(RawEvent::new("t", Vec::new(), 1_000))
        .await
        .expect("empty payload is not an error");

    assert!(sink.records().await.is_empty());
    let snapshot = handler.metrics();
    assert_eq!(snapshot.payloads_received, 2);
    assert_eq!(snapshot.payloads_empty, 2);
    assert_eq!(snapshot.sink_success, 0);
}

#[tokio::test]
async fn sink_failure_is_propagated() {
    let handler = handler(Arc::new(FailingSink));

    let err = handler
        .handle(RawEvent::new("t", status_payload(Some(5)), 1_000))
        .await
        .expect_err("sink failure");
    assert_eq!(err.to_string(), "sink error: forced failure");
    assert_eq!(handler.metrics().sink_failure, 1);
}
