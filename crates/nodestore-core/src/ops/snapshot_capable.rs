/// A store whose entire state can be exported as a snapshot and rebuilt from one.
///
/// Persistence adapters hold any implementer by composition; they never
/// inspect the store's internals, only the snapshot it hands over.
pub trait SnapshotCapable {
    /// The value type describing this store's full state
    type Snapshot;

    /// Export the complete current state
    fn export_snapshot(&self) -> Self::Snapshot;

    /// Build a fresh instance whose state is exactly `snapshot`
    fn from_snapshot(snapshot: Self::Snapshot) -> Self;
}
