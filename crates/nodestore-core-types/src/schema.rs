//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.
//! `tracing` macros take field names as literals, so emitters spell them out;
//! anything reading events back (the test capture, log assertions) uses these.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_OP_ID: &str = "op_id";

// Store identifiers
pub const FIELD_STORE_KIND: &str = "store_kind";
pub const FIELD_DB_PATH: &str = "db_path";

// Row counts
pub const FIELD_ROWS: &str = "rows";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
