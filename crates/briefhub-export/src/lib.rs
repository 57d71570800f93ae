//! briefhub-export
//!
//! PDF assembly from chart PNGs: decoding, page layout, serialization.

pub mod error;
pub mod layout;
pub mod pdf;
pub mod raster;
