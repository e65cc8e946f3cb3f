pub mod document_store;
pub mod index_store;
pub mod snapshot_capable;

pub use document_store::DocumentStore;
pub use index_store::IndexStore;
pub use snapshot_capable::SnapshotCapable;
