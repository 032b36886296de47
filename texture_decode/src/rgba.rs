use crate::block::Tile;

/// The order of the color channels in decoded pixels.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum ChannelOrder {
    Rgba,
    Bgra,
}

impl ChannelOrder {
    // Only the top left block_width x block_height pixels are converted.
    pub(crate) fn swizzle_tile(self, tile: &mut Tile, block_width: usize, block_height: usize) {
        if self == ChannelOrder::Bgra {
            for row in tile.iter_mut().take(block_height) {
                for pixel in row.iter_mut().take(block_width) {
                    pixel.swap(0, 2);
                }
            }
        }
    }
}

pub(crate) fn rgbaf32_from_rgba8(data: &[u8]) -> Vec<f32> {
    data.iter().map(|u| *u as f32 / 255.0).collect()
}
