use tracing::trace_span;

use crate::{
    block::rgba8_from_blocks,
    error::SurfaceError,
    rgba::{rgbaf32_from_rgba8, ChannelOrder},
    Surface, SurfaceBgra8, SurfaceRgba32Float, SurfaceRgba8,
};

impl<T: AsRef<[u8]>> Surface<T> {
    /// Decode all blocks from `surface` to RGBA8.
    pub fn decode_rgba8(&self) -> Result<SurfaceRgba8<Vec<u8>>, SurfaceError> {
        let data = decode_surface(self, ChannelOrder::Rgba)?;

        Ok(SurfaceRgba8 {
            width: self.width,
            height: self.height,
            data,
        })
    }

    /// Decode all blocks from `surface` to BGRA8.
    pub fn decode_bgra8(&self) -> Result<SurfaceBgra8<Vec<u8>>, SurfaceError> {
        let data = decode_surface(self, ChannelOrder::Bgra)?;

        Ok(SurfaceBgra8 {
            width: self.width,
            height: self.height,
            data,
        })
    }

    /// Decode all blocks from `surface` to RGBAF32.
    ///
    /// Values are normalized to the range `0.0` to `1.0`.
    pub fn decode_rgbaf32(&self) -> Result<SurfaceRgba32Float<Vec<f32>>, SurfaceError> {
        let rgba8 = decode_surface(self, ChannelOrder::Rgba)?;

        Ok(SurfaceRgba32Float {
            width: self.width,
            height: self.height,
            data: rgbaf32_from_rgba8(&rgba8),
        })
    }
}

fn decode_surface<T: AsRef<[u8]>>(
    surface: &Surface<T>,
    channel_order: ChannelOrder,
) -> Result<Vec<u8>, SurfaceError> {
    surface.validate()?;

    let _span = trace_span!(
        "decode_surface",
        width = surface.width,
        height = surface.height,
        format = ?surface.image_format
    )
    .entered();

    rgba8_from_blocks(
        surface.width,
        surface.height,
        surface.data.as_ref(),
        surface.image_format,
        channel_order,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageFormat;

    #[test]
    fn decode_surface_zero_size() {
        let result = Surface {
            width: 0,
            height: 0,
            image_format: ImageFormat::Astc4x4RgbaUnorm,
            data: &[0u8; 0],
        }
        .decode_rgba8();

        assert!(matches!(
            result,
            Err(SurfaceError::ZeroSizedSurface {
                width: 0,
                height: 0,
            })
        ));
    }

    #[test]
    fn decode_surface_dimensions_overflow() {
        let result = Surface {
            width: u32::MAX,
            height: u32::MAX,
            image_format: ImageFormat::Etc1RgbUnorm,
            data: &[0u8; 0],
        }
        .decode_rgba8();

        assert!(matches!(
            result,
            Err(SurfaceError::PixelCountWouldOverflow {
                width: u32::MAX,
                height: u32::MAX,
            })
        ));
    }

    #[test]
    fn decode_surface_not_enough_data() {
        let result = Surface {
            width: 8,
            height: 8,
            image_format: ImageFormat::Etc1RgbUnorm,
            data: &[0u8; 31],
        }
        .decode_bgra8();

        assert!(matches!(
            result,
            Err(SurfaceError::NotEnoughData {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn decode_surface_etc1_bgra8() {
        // Red and blue match for the all zero block.
        let surface = Surface {
            width: 4,
            height: 4,
            image_format: ImageFormat::Etc1RgbUnorm,
            data: &[0u8; 8],
        }
        .decode_bgra8()
        .unwrap();

        assert_eq!(4, surface.width);
        assert_eq!([2u8, 2, 2, 255].repeat(16), surface.data);
    }

    #[test]
    fn decode_surface_astc_rgbaf32() {
        let surface = Surface {
            width: 3,
            height: 2,
            image_format: ImageFormat::Astc4x4RgbaUnorm,
            data: &[0u8; 16],
        }
        .decode_rgbaf32()
        .unwrap();

        assert_eq!((3, 2), (surface.width, surface.height));
        assert_eq!([1.0f32, 0.0, 1.0, 1.0].repeat(6), surface.data);
    }
}
