use crate::{rgba::ChannelOrder, ImageFormat, SurfaceError};

mod decode;
use decode::decode_blocks;

/// The largest block width or height of any supported format.
pub const MAX_BLOCK_DIMENSION: usize = 12;

pub const CHANNELS: usize = 4;

/// The decoded pixels of a single block in row-major order.
/// Only the top left block width x block height pixels are written.
pub type Tile = [[[u8; CHANNELS]; MAX_BLOCK_DIMENSION]; MAX_BLOCK_DIMENSION];

pub struct Etc1;
pub struct Astc<const W: usize, const H: usize>;

/// Decompress the blocks in `data` to the uncompressed RGBA8 or BGRA8 format.
pub(crate) fn rgba8_from_blocks(
    width: u32,
    height: u32,
    data: &[u8],
    image_format: ImageFormat,
    channel_order: ChannelOrder,
) -> Result<Vec<u8>, SurfaceError> {
    use ImageFormat as F;
    match image_format {
        F::Etc1RgbUnorm => decode_blocks::<Etc1>(width, height, data, channel_order),
        F::Astc4x4RgbaUnorm => decode_blocks::<Astc<4, 4>>(width, height, data, channel_order),
        F::Astc5x5RgbaUnorm => decode_blocks::<Astc<5, 5>>(width, height, data, channel_order),
        F::Astc6x6RgbaUnorm => decode_blocks::<Astc<6, 6>>(width, height, data, channel_order),
        F::Astc8x8RgbaUnorm => decode_blocks::<Astc<8, 8>>(width, height, data, channel_order),
        F::Astc10x10RgbaUnorm => {
            decode_blocks::<Astc<10, 10>>(width, height, data, channel_order)
        }
        F::Astc12x12RgbaUnorm => {
            decode_blocks::<Astc<12, 12>>(width, height, data, channel_order)
        }
    }
}
