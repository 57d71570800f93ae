//! briefhub-core
//!
//! Pure domain types: the chart catalog and its URL conventions.
//! No network or PDF dependency. This is the shared vocabulary of briefhub.

pub mod catalog;
pub mod error;
