#![no_std]
//! Safe, no_std, pure Rust decoders for ETC1 and ASTC compressed blocks.
//!
//! Each function decodes a single block into RGBA8 pixels.
//! The `destination_pitch` is the number of bytes between rows of the output,
//! so blocks can be decoded directly into a larger image or a separate tile.
mod astc;
mod etc1;

/// Decodes an 8-byte ETC1 block into 4x4 RGBA8 pixels with an alpha of 255.
///
/// # Panics
/// Panics if `decompressed_block` is too small for 4 rows of `destination_pitch` bytes.
pub fn etc1(compressed_block: &[u8; 8], decompressed_block: &mut [u8], destination_pitch: usize) {
    etc1::etc1_block(compressed_block, decompressed_block, destination_pitch)
}

/// Decodes a 16-byte LDR or HDR ASTC block with a footprint of
/// `block_width` x `block_height` pixels into RGBA8 pixels.
///
/// Returns `false` if the block uses a reserved or invalid encoding.
/// Invalid blocks decode to the error color magenta (255, 0, 255, 255).
///
/// # Panics
/// Panics if either block dimension is outside the range `4..=12`
/// or if `decompressed_block` is too small for the footprint.
pub fn astc(
    compressed_block: &[u8; 16],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
    block_width: usize,
    block_height: usize,
) -> bool {
    assert!((4..=12).contains(&block_width) && (4..=12).contains(&block_height));
    astc::astc_block(
        compressed_block,
        decompressed_block,
        destination_pitch,
        block_width,
        block_height,
    )
}
