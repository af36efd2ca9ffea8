use scout_core::{
    CreditsChangeKind, JobStatus, ServerEvent, StreamStatus,
};

#[test]
fn job_update_with_all_fields() {
    let data = r#"{
        "job_id": "J1",
        "job_type": "channel_discovery_batch",
        "status": "running",
        "progress": 40,
        "message": "Scanning niche",
        "timestamp": "2026-08-29T12:00:00Z"
    }"#;

    let ev = ServerEvent::parse("job_update", data).expect("should parse");
    let ServerEvent::JobUpdate(u) = ev else {
        panic!("wrong category");
    };
    assert_eq!(u.job_id, "J1");
    assert_eq!(u.status, JobStatus::Running);
    assert_eq!(u.progress, Some(40));
    assert!(u.error.is_none());
}

#[test]
fn job_update_tolerates_missing_optional_fields() {
    let ev = ServerEvent::parse("job_update", r#"{"job_id":"J2"}"#).expect("should parse");
    let ServerEvent::JobUpdate(u) = ev else {
        panic!("wrong category");
    };
    assert_eq!(u.job_id, "J2");
    assert_eq!(u.status, JobStatus::Pending);
    assert!(u.progress.is_none());
    assert!(u.timestamp.is_none());
}

#[test]
fn job_update_without_identifier_is_rejected() {
    assert!(ServerEvent::parse("job_update", r#"{"status":"running"}"#).is_none());
}

#[test]
fn credits_update_unknown_type_degrades_to_other() {
    let ev = ServerEvent::parse(
        "credits_updated",
        r#"{"type":"refund","amount":25,"new_balance":100,"message":"refund issued"}"#,
    )
    .expect("should parse");
    let ServerEvent::CreditsUpdated(c) = ev else {
        panic!("wrong category");
    };
    assert_eq!(c.kind, CreditsChangeKind::Other);
    assert_eq!(c.amount, 25);
}

#[test]
fn credits_update_usage_carries_signed_amount() {
    let ev = ServerEvent::parse(
        "credits_updated",
        r#"{"type":"usage","amount":-25,"new_balance":475,"message":"discovery run"}"#,
    )
    .expect("should parse");
    let ServerEvent::CreditsUpdated(c) = ev else {
        panic!("wrong category");
    };
    assert_eq!(c.kind, CreditsChangeKind::Usage);
    assert_eq!(c.amount, -25);
    assert_eq!(c.new_balance, 475);
}

#[test]
fn connection_status_parses() {
    let ev = ServerEvent::parse(
        "connection_status",
        r#"{"status":"connected","user_id":"u-9","timestamp":"2026-08-29T12:00:00Z"}"#,
    )
    .expect("should parse");
    let ServerEvent::ConnectionStatus(s) = ev else {
        panic!("wrong category");
    };
    assert_eq!(s.status, StreamStatus::Connected);
    assert_eq!(s.user_id.as_deref(), Some("u-9"));
}

#[test]
fn discovery_results_defaults_empty_fields() {
    let ev = ServerEvent::parse("discovery_results", r#"{"channel_count":40}"#)
        .expect("should parse");
    let ServerEvent::DiscoveryResults(d) = ev else {
        panic!("wrong category");
    };
    assert_eq!(d.channel_count, 40);
    assert!(d.job_id.is_none());
    assert!(d.discovery_method.is_empty());
}

#[test]
fn unknown_event_names_are_dropped() {
    assert!(ServerEvent::parse("heartbeat", "{}").is_none());
}

#[test]
fn error_events_keep_their_raw_payload() {
    let ev = ServerEvent::parse("error", r#"{"code":500,"detail":"boom"}"#).expect("should parse");
    let ServerEvent::Error(v) = ev else {
        panic!("wrong category");
    };
    assert_eq!(v["code"], 500);
}

#[test]
fn error_events_with_unparseable_payload_degrade_to_null() {
    let ev = ServerEvent::parse("error", "not json").expect("should parse");
    assert_eq!(ev, ServerEvent::Error(serde_json::Value::Null));
}
