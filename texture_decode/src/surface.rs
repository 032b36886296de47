use crate::{surface_size, ImageFormat, SurfaceError};

/// A compressed surface with an image format known at runtime.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Surface<T> {
    /// The width of the surface in pixels.
    pub width: u32,
    /// The height of the surface in pixels.
    pub height: u32,
    /// The format of the bytes in [data](#structfield.data).
    pub image_format: ImageFormat,
    /// The compressed blocks in row-major order without additional padding.
    ///
    /// Blocks on the right and bottom edges may extend past the surface dimensions.
    pub data: T,
}

impl<T: AsRef<[u8]>> Surface<T> {
    /// Checks the dimensions and data length and returns the expected data size in bytes.
    pub(crate) fn validate(&self) -> Result<usize, SurfaceError> {
        if self.width == 0 || self.height == 0 {
            return Err(SurfaceError::ZeroSizedSurface {
                width: self.width,
                height: self.height,
            });
        }

        let overflow = SurfaceError::PixelCountWouldOverflow {
            width: self.width,
            height: self.height,
        };

        // The decoded RGBA data is larger than the compressed data.
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or(overflow)?;

        let (block_width, block_height) = self.image_format.block_dimensions();
        let expected = surface_size(
            self.width as usize,
            self.height as usize,
            block_width as usize,
            block_height as usize,
            self.image_format.block_size_in_bytes(),
        )
        .ok_or(SurfaceError::PixelCountWouldOverflow {
            width: self.width,
            height: self.height,
        })?;

        let actual = self.data.as_ref().len();
        if actual < expected {
            return Err(SurfaceError::NotEnoughData { expected, actual });
        }

        Ok(expected)
    }
}

/// An uncompressed RGBA8 surface with 4 bytes per pixel.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceRgba8<T> {
    /// The width of the surface in pixels.
    pub width: u32,
    /// The height of the surface in pixels.
    pub height: u32,
    /// The pixels in row-major order from top to bottom.
    pub data: T,
}

#[cfg(feature = "image")]
impl SurfaceRgba8<Vec<u8>> {
    /// Converts the surface to an image without copying the data.
    pub fn to_image(self) -> Result<image::RgbaImage, crate::CreateImageError> {
        let data_length = self.data.len();
        image::RgbaImage::from_raw(self.width, self.height, self.data).ok_or(
            crate::CreateImageError::InvalidSurfaceDimensions {
                width: self.width,
                height: self.height,
                data_length,
            },
        )
    }
}

/// An uncompressed BGRA8 surface with 4 bytes per pixel.
///
/// This matches the byte order of many platform image APIs.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceBgra8<T> {
    /// The width of the surface in pixels.
    pub width: u32,
    /// The height of the surface in pixels.
    pub height: u32,
    /// The pixels in row-major order from top to bottom.
    pub data: T,
}

/// An uncompressed RGBA surface with 4 floats per pixel in the range `0.0` to `1.0`.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceRgba32Float<T> {
    /// The width of the surface in pixels.
    pub width: u32,
    /// The height of the surface in pixels.
    pub height: u32,
    /// The pixels in row-major order from top to bottom.
    pub data: T,
}
