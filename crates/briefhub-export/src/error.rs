use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("not a PNG image")]
    NotPng,

    #[error("PNG decoding failed: {0}")]
    Decode(String),

    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("document has no pages")]
    EmptyDocument,

    #[error("document is {size} bytes, over the {limit}-byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("unknown page layout: {0}")]
    UnknownLayout(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Decode(e.to_string())
    }
}

impl From<lopdf::Error> for ExportError {
    fn from(e: lopdf::Error) -> Self {
        ExportError::Pdf(e.to_string())
    }
}
