use domain::{RecordDraft, RecordError};

const ROOT: &str = "root.mqtt.sparkplugb";

#[test]
fn valid_draft_becomes_record() {
    let record = RecordDraft::single("root.mqtt.sparkplugb.g.e.d", "temperature", "23.500000", 42)
        .validate(ROOT)
        .expect("valid");

    assert_eq!(record.device(), "root.mqtt.sparkplugb.g.e.d");
    assert_eq!(record.measurements(), ["temperature".to_string()]);
    assert_eq!(record.values(), ["23.500000".to_string()]);
    assert_eq!(record.measurement(), "temperature");
    assert_eq!(record.value(), "23.500000");
    assert_eq!(record.timestamp_ms(), 42);
}

#[test]
fn root_itself_is_a_valid_device() {
    let record = RecordDraft::single(ROOT, "status", "true", 1).validate(ROOT);
    assert!(record.is_ok());
}

#[test]
fn device_outside_root_is_rejected() {
    let err = RecordDraft::single("root.other", "status", "true", 1)
        .validate(ROOT)
        .expect_err("outside root");
    assert_eq!(err, RecordError::InvalidDevice("root.other".to_string()));

    // 仅字符串前缀相同不算位于根路径下
    let err = RecordDraft::single("root.mqtt.sparkplugbx", "status", "true", 1)
        .validate(ROOT)
        .expect_err("sibling prefix");
    assert!(matches!(err, RecordError::InvalidDevice(_)));

    let err = RecordDraft::single("root.mqtt.sparkplugb.", "status", "true", 1)
        .validate(ROOT)
        .expect_err("dangling separator");
    assert!(matches!(err, RecordError::InvalidDevice(_)));
}

#[test]
fn mismatched_measurements_are_rejected() {
    let draft = RecordDraft {
        device: ROOT.to_string(),
        measurements: vec!["a".to_string(), "b".to_string()],
        values: vec!["1".to_string()],
        timestamp_ms: 1,
    };
    let err = draft.validate(ROOT).expect_err("mismatch");
    assert_eq!(
        err.to_string(),
        "invalid measurements or values for device root.mqtt.sparkplugb: 2 measurements, 1 values"
    );

    let empty = RecordDraft {
        device: ROOT.to_string(),
        measurements: Vec::new(),
        values: Vec::new(),
        timestamp_ms: 1,
    };
    assert!(matches!(
        empty.validate(ROOT),
        Err(RecordError::MeasurementMismatch { .. })
    ));
}

#[test]
fn non_positive_timestamp_is_rejected() {
    for ts in [0, -1] {
        let err = RecordDraft::single(ROOT, "status", "true", ts)
            .validate(ROOT)
            .expect_err("timestamp");
        assert!(matches!(err, RecordError::NonPositiveTimestamp { .. }));
    }
}

#[test]
fn record_serializes_for_downstream() {
    let record = RecordDraft::single(ROOT, "status", "true", 7)
        .validate(ROOT)
        .expect("valid");
    let json = serde_json::to_value(&record).expect("json");
    assert_eq!(json["device"], "root.mqtt.sparkplugb");
    assert_eq!(json["measurements"][0], "status");
    assert_eq!(json["values"][0], "true");
    assert_eq!(json["timestamp_ms"], 7);
}
