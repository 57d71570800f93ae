//! Page geometry for a chart image.

use std::fmt;
use std::str::FromStr;

use crate::error::ExportError;

/// A4 portrait canvas at 300 dpi, in pixels.
pub const A4_CANVAS_PX: (u32, u32) = (2481, 3508);

/// PDF points per pixel at 300 dpi.
const POINTS_PER_PX_300DPI: f32 = 72.0 / 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageLayout {
    /// Page sized to the image's pixels, image drawn full-page.
    #[default]
    Native,
    /// Image shrunk to fit an A4 canvas and centered on white.
    A4,
}

impl FromStr for PageLayout {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(PageLayout::Native),
            "a4" => Ok(PageLayout::A4),
            other => Err(ExportError::UnknownLayout(other.to_string())),
        }
    }
}

impl fmt::Display for PageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLayout::Native => f.write_str("native"),
            PageLayout::A4 => f.write_str("a4"),
        }
    }
}

/// Where an image lands on its page, in PDF user space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub placement: Placement,
    /// Paint the page white before drawing the image.
    pub background: bool,
}

impl PageLayout {
    pub fn geometry(self, image_width: u32, image_height: u32) -> PageGeometry {
        match self {
            PageLayout::Native => {
                let (w, h) = (image_width as f32, image_height as f32);
                PageGeometry {
                    width: w,
                    height: h,
                    placement: Placement {
                        x: 0.0,
                        y: 0.0,
                        width: w,
                        height: h,
                    },
                    background: false,
                }
            }
            PageLayout::A4 => a4_geometry(image_width, image_height),
        }
    }
}

fn a4_geometry(image_width: u32, image_height: u32) -> PageGeometry {
    let (canvas_w, canvas_h) = A4_CANVAS_PX;
    let (fit_w, fit_h) = shrink_to_fit(image_width, image_height, canvas_w, canvas_h);

    // Offsets are computed top-left in pixel space, then flipped for PDF.
    let left = (canvas_w - fit_w) / 2;
    let top = (canvas_h - fit_h) / 2;
    let bottom = canvas_h - top - fit_h;

    let pt = |px: u32| px as f32 * POINTS_PER_PX_300DPI;
    PageGeometry {
        width: pt(canvas_w),
        height: pt(canvas_h),
        placement: Placement {
            x: pt(left),
            y: pt(bottom),
            width: pt(fit_w),
            height: pt(fit_h),
        },
        background: true,
    }
}

/// Largest size within `max_w` x `max_h` keeping the aspect ratio.
/// Never enlarges, never returns a zero side.
fn shrink_to_fit(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width <= max_w && height <= max_h {
        return (width, height);
    }

    let scale = f64::min(
        f64::from(max_w) / f64::from(width),
        f64::from(max_h) / f64::from(height),
    );
    let fit = |side: u32, max: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max);
    (fit(width, max_w), fit(height, max_h))
}
