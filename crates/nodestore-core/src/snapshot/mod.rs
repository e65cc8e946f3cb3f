//! Snapshot value types.
//!
//! A snapshot is the complete state of one store at one instant. Snapshots
//! are immutable values: the in-memory stores export one, the SQLite layer
//! writes it whole, and hydration builds a fresh store from one that was read
//! back.
//!
//! ## Shapes
//!
//! - [`DocStoreSnapshot`]: `{documents: {..}, ref_doc_info: {..}, ..extra}`
//! - [`IndexStoreSnapshot`]: a flat `{index_id: struct}` mapping
//!
//! Both use `BTreeMap` so iteration and encoding order are deterministic.

pub mod docstore;
pub mod indexstore;

pub use docstore::{DocStoreSnapshot, DOCUMENTS_KEY, REF_DOC_INFO_KEY};
pub use indexstore::IndexStoreSnapshot;
