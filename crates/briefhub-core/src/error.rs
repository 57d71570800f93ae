use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("chart list is empty")]
    EmptyChartList,

    #[error("invalid chart URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
