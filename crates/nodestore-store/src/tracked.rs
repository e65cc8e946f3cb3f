//! Start/end bookkeeping shared by every store read and write

use crate::errors::Result;
use crate::tables::StoreKind;
use nodestore_core::{log_op_end, log_op_error, log_op_start};
use nodestore_core_types::OperationId;
use std::path::Path;
use std::time::Instant;

/// Run one store operation under a fresh operation id
///
/// `f` returns the value plus the number of rows it touched. Emits one start
/// event and exactly one end or end_error event. Errors leave with the
/// operation id and database path attached.
pub(crate) fn run_tracked<T>(
    op: &'static str,
    kind: StoreKind,
    path: &Path,
    f: impl FnOnce() -> Result<(T, usize)>,
) -> Result<T> {
    let op_id = OperationId::new();
    let started = Instant::now();

    log_op_start!(
        op,
        op_id = %op_id,
        store_kind = kind.as_str(),
        db_path = %path.display()
    );

    match f() {
        Ok((value, rows)) => {
            log_op_end!(
                op,
                duration_ms = elapsed_ms(started),
                op_id = %op_id,
                store_kind = kind.as_str(),
                rows = rows as u64
            );
            Ok(value)
        }
        Err(err) => {
            let err = err.with_op_id(op_id.clone()).with_path(path);
            log_op_error!(
                op,
                err.clone(),
                duration_ms = elapsed_ms(started),
                op_id = %op_id,
                store_kind = kind.as_str()
            );
            Err(err)
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
