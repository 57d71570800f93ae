//! briefhub-fetch
//!
//! Chart retrieval over HTTP. Thin wrapper around `reqwest`.

pub mod charts;
pub mod client;
pub mod error;

pub use charts::{fetch_chart, fetch_charts, FetchOptions, FetchedChart};
