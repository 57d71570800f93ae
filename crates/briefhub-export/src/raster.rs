//! PNG decoding into PDF-ready samples.
//!
//! A decoded chart becomes 8-bit DeviceRGB or DeviceGray samples plus an
//! optional 8-bit soft mask. The mask is only kept when some pixel is not
//! fully opaque.

use image::{DynamicImage, ImageFormat};

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Rgb,
    Gray,
}

impl ColorSpace {
    pub fn pdf_name(self) -> &'static [u8] {
        match self {
            ColorSpace::Rgb => b"DeviceRGB",
            ColorSpace::Gray => b"DeviceGray",
        }
    }

    pub fn components(self) -> usize {
        match self {
            ColorSpace::Rgb => 3,
            ColorSpace::Gray => 1,
        }
    }
}

/// Uncompressed 8-bit samples of one image.
#[derive(Debug, Clone)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub samples: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

/// Decode PNG bytes. Anything without a PNG signature is rejected before
/// decoding is attempted.
pub fn decode_png(bytes: &[u8]) -> Result<Raster, ExportError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => {}
        _ => return Err(ExportError::NotPng),
    }

    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyImage { width, height });
    }

    Ok(split_channels(decoded))
}

fn split_channels(decoded: DynamicImage) -> Raster {
    let (width, height) = (decoded.width(), decoded.height());
    let color = decoded.color();
    let gray = !color.has_color();

    if !color.has_alpha() {
        let (color_space, samples) = if gray {
            (ColorSpace::Gray, decoded.into_luma8().into_raw())
        } else {
            (ColorSpace::Rgb, decoded.into_rgb8().into_raw())
        };
        return Raster {
            width,
            height,
            color_space,
            samples,
            alpha: None,
        };
    }

    let (color_space, interleaved) = if gray {
        (ColorSpace::Gray, decoded.into_luma_alpha8().into_raw())
    } else {
        (ColorSpace::Rgb, decoded.into_rgba8().into_raw())
    };

    let stride = color_space.components() + 1;
    let pixels = interleaved.len() / stride;
    let mut samples = Vec::with_capacity(pixels * color_space.components());
    let mut alpha = Vec::with_capacity(pixels);
    for px in interleaved.chunks_exact(stride) {
        let (color, a) = px.split_at(stride - 1);
        samples.extend_from_slice(color);
        alpha.push(a[0]);
    }

    let opaque = alpha.iter().all(|&a| a == u8::MAX);
    Raster {
        width,
        height,
        color_space,
        samples,
        alpha: (!opaque).then_some(alpha),
    }
}
