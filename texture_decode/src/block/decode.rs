use tracing::debug;

use crate::{rgba::ChannelOrder, SurfaceError};

use super::{Astc, Etc1, Tile, CHANNELS, MAX_BLOCK_DIMENSION};

pub trait BlockDecode {
    type CompressedBlock: ReadBlock;

    const BLOCK_WIDTH: usize;
    const BLOCK_HEIGHT: usize;

    // Pixels are written to the top left of the tile in row-major order.
    // Returns false if the block was invalid and decoded to an error color.
    fn decompress_block(block: &Self::CompressedBlock, tile: &mut Tile) -> bool;
}

// Allows block types to read and copy buffer data to enforce alignment.
pub trait ReadBlock: Sized {
    const SIZE_IN_BYTES: usize;

    fn read_block(data: &[u8], offset: usize) -> Option<Self>;
}

impl ReadBlock for [u8; 8] {
    const SIZE_IN_BYTES: usize = 8;

    fn read_block(data: &[u8], offset: usize) -> Option<Self> {
        data.get(offset..offset + 8)?.try_into().ok()
    }
}

impl ReadBlock for [u8; 16] {
    const SIZE_IN_BYTES: usize = 16;

    fn read_block(data: &[u8], offset: usize) -> Option<Self> {
        data.get(offset..offset + 16)?.try_into().ok()
    }
}

impl BlockDecode for Etc1 {
    type CompressedBlock = [u8; 8];

    const BLOCK_WIDTH: usize = 4;
    const BLOCK_HEIGHT: usize = 4;

    fn decompress_block(block: &[u8; 8], tile: &mut Tile) -> bool {
        blockdec_rs::etc1(
            block,
            bytemuck::cast_slice_mut(&mut tile[..]),
            MAX_BLOCK_DIMENSION * CHANNELS,
        );
        true
    }
}

impl<const W: usize, const H: usize> BlockDecode for Astc<W, H> {
    type CompressedBlock = [u8; 16];

    const BLOCK_WIDTH: usize = W;
    const BLOCK_HEIGHT: usize = H;

    fn decompress_block(block: &[u8; 16], tile: &mut Tile) -> bool {
        blockdec_rs::astc(
            block,
            bytemuck::cast_slice_mut(&mut tile[..]),
            MAX_BLOCK_DIMENSION * CHANNELS,
            W,
            H,
        )
    }
}

/// Decompress the bytes in `data` to 4 channels per pixel in the given `channel_order`.
///
/// The data length should already be validated for the surface dimensions.
pub(crate) fn decode_blocks<F: BlockDecode>(
    width: u32,
    height: u32,
    data: &[u8],
    channel_order: ChannelOrder,
) -> Result<Vec<u8>, SurfaceError> {
    let width = width as usize;
    let height = height as usize;

    let mut rgba = vec![0u8; width * height * CHANNELS];

    let mut error_blocks = 0;
    let mut tile = [[[0u8; CHANNELS]; MAX_BLOCK_DIMENSION]; MAX_BLOCK_DIMENSION];

    // Blocks are in row-major order.
    let mut block_start = 0;
    for y in (0..height).step_by(F::BLOCK_HEIGHT) {
        for x in (0..width).step_by(F::BLOCK_WIDTH) {
            // Use a special type to enforce alignment.
            let block = F::CompressedBlock::read_block(data, block_start).ok_or(
                SurfaceError::NotEnoughData {
                    expected: block_start + F::CompressedBlock::SIZE_IN_BYTES,
                    actual: data.len(),
                },
            )?;

            if !F::decompress_block(&block, &mut tile) {
                error_blocks += 1;
            }

            channel_order.swizzle_tile(&mut tile, F::BLOCK_WIDTH, F::BLOCK_HEIGHT);

            put_rgba_block(
                &mut rgba,
                &tile,
                x,
                y,
                width,
                height,
                F::BLOCK_WIDTH,
                F::BLOCK_HEIGHT,
            );

            block_start += F::CompressedBlock::SIZE_IN_BYTES;
        }
    }

    if error_blocks > 0 {
        debug!(
            error_blocks,
            total_blocks = block_start / F::CompressedBlock::SIZE_IN_BYTES,
            "decoded invalid blocks with the error color"
        );
    }

    Ok(rgba)
}

#[allow(clippy::too_many_arguments)]
fn put_rgba_block(
    surface: &mut [u8],
    pixels: &Tile,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    block_width: usize,
    block_height: usize,
) {
    // Place the decompressed block into the decompressed surface.
    // The edges won't always have full blocks.
    let elements_per_row = CHANNELS * block_width.min(width - x);

    for (row, row_pixels) in pixels.iter().enumerate().take(block_height.min(height - y)) {
        // Convert pixel coordinates to byte coordinates.
        let surface_index = ((y + row) * width + x) * CHANNELS;
        surface[surface_index..surface_index + elements_per_row]
            .copy_from_slice(&bytemuck::cast_slice(&row_pixels[..])[..elements_per_row]);
    }
}
