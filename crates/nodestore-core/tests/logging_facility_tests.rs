#![allow(clippy::unwrap_used, clippy::expect_used)]

use nodestore_core::errors::{ExError, ExErrorKind, StoreError};
use nodestore_core::logging_facility::test_capture::init_test_capture;
use nodestore_core::{log_op_end, log_op_error, log_op_start};
use nodestore_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND,
    FIELD_STORE_KIND,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, store_kind = "docstore");

    let events = capture.events();
    let start_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert_eq!(start_events.len(), 1, "Should have exactly one start event");
    assert_eq!(start_events[0].field(FIELD_STORE_KIND), Some("docstore"));
    assert!(start_events[0].component.is_some());
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");

    let end_event = end_events[0];
    assert_eq!(end_event.field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = StoreError::DocumentNotFound {
        node_id: "n1".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events();
    let error_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1, "Should have exactly one error event");

    let error_event = error_events[0];
    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
    assert_eq!(error_event.field(FIELD_ERR_KIND), Some("NotFound"));
}

#[test]
fn test_log_op_error_accepts_ex_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = ExError::new(ExErrorKind::Schema).with_message("checksum mismatch");
    log_op_error!(op_name, err, duration_ms = 1, store_kind = "indexstore");

    let count = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name)
            && e.field(FIELD_ERR_CODE) == Some("ERR_SCHEMA")
            && e.field(FIELD_STORE_KIND) == Some("indexstore")
    });
    assert_eq!(count, 1);
}

#[test]
fn test_boundary_ownership_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_ownership_unique_5";

    log_op_start!(op_name, op_id = "op-5");
    log_op_end!(op_name, duration_ms = 42, op_id = "op-5");

    let events = capture.events_for_op_id("op-5");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[1].event.as_deref(), Some(EVENT_END));
}
