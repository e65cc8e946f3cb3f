//! Schema manager
//!
//! Provides:
//! - Embedded SQL migrations per store kind
//! - Idempotent application, safe before every read and write
//! - Checksums recorded in `schema_version`, so a file whose schema was
//!   created by a different build is rejected instead of misread

mod checksums;
mod embedded;
mod runner;

pub use embedded::{migrations_for, Migration};
pub use runner::{applied_migrations, apply_migrations};
