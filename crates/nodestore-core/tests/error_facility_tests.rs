use nodestore_core::errors::{ExError, ExErrorKind, StoreError};
use nodestore_core::DocumentStore;
use nodestore_core_types::OperationId;

#[test]
fn test_document_not_found_verifiable_by_kind() {
    let err = StoreError::DocumentNotFound {
        node_id: "unknown".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    assert_eq!(ex_err.entity_id(), Some("unknown"));
    assert!(ex_err.is_not_found());
}

#[test]
fn test_reserved_key_is_invalid_input() {
    let err = StoreError::ReservedKey {
        key: "ref_doc_info".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(ex_err.code(), "ERR_INVALID_INPUT");
    assert_eq!(ex_err.entity_id(), Some("ref_doc_info"));
    assert!(!ex_err.is_not_found());
}

#[test]
fn test_error_kind_code_mapping() {
    // Test that each kind has a stable, unique code
    let kinds = vec![
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::Schema, "ERR_SCHEMA"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_ambiguous_index_struct_message() {
    let ex_err: ExError = StoreError::AmbiguousIndexStruct { count: 3 }.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidInput);
    assert!(ex_err.message().contains("3 index structs"));
}

#[test]
fn test_context_builders_accumulate() {
    let op_id = OperationId::from_string("op-1".to_string());
    let err = ExError::new(ExErrorKind::Persistence)
        .with_op("write_docstore")
        .with_path("/var/data/docstore.sqlite")
        .with_op_id(op_id.clone())
        .with_message("database is locked");

    assert_eq!(err.op(), Some("write_docstore"));
    assert_eq!(
        err.path().map(|p| p.to_string_lossy().into_owned()),
        Some("/var/data/docstore.sqlite".to_string())
    );
    assert_eq!(err.op_id(), Some(&op_id));
    assert_eq!(
        err.to_string(),
        "[ERR_PERSISTENCE] in operation 'write_docstore': database is locked (path: /var/data/docstore.sqlite)"
    );
}

#[test]
fn test_store_operation_errors_convert() {
    let mut store = DocumentStore::new();

    let err: ExError = store.delete_document("missing").unwrap_err().into();
    assert_eq!(err.kind(), ExErrorKind::NotFound);

    let err: ExError = store
        .set_metadata("documents", serde_json::json!({}))
        .unwrap_err()
        .into();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}
