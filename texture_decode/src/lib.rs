//! Decode ETC1 and ASTC compressed textures to uncompressed RGBA8.
//!
//! Textures are stored as a single 2D surface of compressed blocks in row-major order.
//! Surfaces do not need to have dimensions that are multiples of the block dimensions.
//! Blocks on the right and bottom edges are clipped to the surface dimensions.
//!
//! ```rust no_run
//! # fn main() -> Result<(), texture_decode::SurfaceError> {
//! # let data = vec![0u8; 32];
//! let surface = texture_decode::Surface {
//!     width: 8,
//!     height: 8,
//!     image_format: texture_decode::ImageFormat::Astc8x8RgbaUnorm,
//!     data: &data,
//! };
//! let rgba8 = surface.decode_rgba8()?;
//! # Ok(())
//! # }
//! ```
//!
//! ASTC blocks that use reserved or invalid encodings decode to magenta
//! instead of failing the entire surface.
mod block;
mod decode;
mod error;
mod rgba;
mod surface;

pub use error::*;
pub use surface::{Surface, SurfaceBgra8, SurfaceRgba32Float, SurfaceRgba8};

/// Compressed texture formats supported for decoding.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "strum",
    derive(strum::EnumString, strum::Display, strum::EnumIter)
)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ImageFormat {
    Etc1RgbUnorm,
    Astc4x4RgbaUnorm,
    Astc5x5RgbaUnorm,
    Astc6x6RgbaUnorm,
    Astc8x8RgbaUnorm,
    Astc10x10RgbaUnorm,
    Astc12x12RgbaUnorm,
}

impl ImageFormat {
    /// The dimensions in pixels of a single compressed block.
    pub fn block_dimensions(&self) -> (u32, u32) {
        match self {
            ImageFormat::Etc1RgbUnorm => (4, 4),
            ImageFormat::Astc4x4RgbaUnorm => (4, 4),
            ImageFormat::Astc5x5RgbaUnorm => (5, 5),
            ImageFormat::Astc6x6RgbaUnorm => (6, 6),
            ImageFormat::Astc8x8RgbaUnorm => (8, 8),
            ImageFormat::Astc10x10RgbaUnorm => (10, 10),
            ImageFormat::Astc12x12RgbaUnorm => (12, 12),
        }
    }

    /// The size in bytes of a single compressed block.
    pub fn block_size_in_bytes(&self) -> usize {
        match self {
            ImageFormat::Etc1RgbUnorm => 8,
            _ => 16,
        }
    }

    /// The ASTC format with square blocks of `block_size` x `block_size` pixels
    /// or `None` if the block size is not supported.
    pub fn astc(block_size: u32) -> Option<Self> {
        match block_size {
            4 => Some(ImageFormat::Astc4x4RgbaUnorm),
            5 => Some(ImageFormat::Astc5x5RgbaUnorm),
            6 => Some(ImageFormat::Astc6x6RgbaUnorm),
            8 => Some(ImageFormat::Astc8x8RgbaUnorm),
            10 => Some(ImageFormat::Astc10x10RgbaUnorm),
            12 => Some(ImageFormat::Astc12x12RgbaUnorm),
            _ => None,
        }
    }
}

/// Decodes ETC1 data for a surface of `width` x `height` pixels to RGBA8.
pub fn decode_etc1(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, SurfaceError> {
    Surface {
        width,
        height,
        image_format: ImageFormat::Etc1RgbUnorm,
        data,
    }
    .decode_rgba8()
    .map(|surface| surface.data)
}

/// Decodes ASTC data with square blocks of `block_size` x `block_size` pixels
/// for a surface of `width` x `height` pixels to RGBA8.
pub fn decode_astc(
    data: &[u8],
    width: u32,
    height: u32,
    block_size: u32,
) -> Result<Vec<u8>, SurfaceError> {
    let image_format =
        ImageFormat::astc(block_size).ok_or(SurfaceError::UnsupportedBlockSize { block_size })?;

    Surface {
        width,
        height,
        image_format,
        data,
    }
    .decode_rgba8()
    .map(|surface| surface.data)
}

/// Decodes `surface` to an RGBA8 image.
#[cfg(feature = "image")]
pub fn image_from_surface<T: AsRef<[u8]>>(
    surface: &Surface<T>,
) -> Result<image::RgbaImage, CreateImageError> {
    surface.decode_rgba8()?.to_image()
}

/// Replaces the alpha channel of `rgb` with the red channel of `alpha`.
///
/// Textures often store alpha in a separate RGB texture with a different resolution,
/// so `alpha` is resized to the dimensions of `rgb` first.
#[cfg(feature = "image")]
pub fn merge_alpha(rgb: &mut image::RgbaImage, alpha: &image::RgbaImage) {
    let resized;
    let alpha = if alpha.dimensions() != rgb.dimensions() {
        resized = image::imageops::resize(
            alpha,
            rgb.width(),
            rgb.height(),
            image::imageops::FilterType::CatmullRom,
        );
        &resized
    } else {
        alpha
    };

    for (pixel, alpha_pixel) in rgb.pixels_mut().zip(alpha.pixels()) {
        pixel[3] = alpha_pixel[0];
    }
}

/// The size in bytes of the compressed data for a surface
/// or `None` if the size would overflow.
fn surface_size(
    width: usize,
    height: usize,
    block_width: usize,
    block_height: usize,
    block_size_in_bytes: usize,
) -> Option<usize> {
    width
        .div_ceil(block_width)
        .checked_mul(height.div_ceil(block_height))?
        .checked_mul(block_size_in_bytes)
}
