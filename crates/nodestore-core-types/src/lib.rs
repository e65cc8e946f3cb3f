//! Core types shared across NodeStore facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: OperationId, tying the log events and errors of
//!   one hydrate/persist call together
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::OperationId;
