//! ASTC block decoding for 2D footprints from 4x4 up to 12x12.
mod bits;
mod color;
mod endpoints;
mod params;
mod partition;
mod weights;

use bits::BlockBits;
use color::{select_color, select_color_hdr};
use endpoints::decode_endpoints;
use params::{decode_block_params, BlockKind};
use partition::select_partitions;
use weights::decode_weights;

/// The pixel count of the largest supported footprint.
pub(crate) const MAX_BLOCK_PIXELS: usize = 12 * 12;

const ERROR_COLOR: [u8; 4] = [255, 0, 255, 255];

pub(crate) fn astc_block(
    compressed_block: &[u8; 16],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
    block_width: usize,
    block_height: usize,
) -> bool {
    let bits = BlockBits::new(compressed_block);

    let params = match decode_block_params(compressed_block, &bits, block_width, block_height) {
        BlockKind::Normal(params) => params,
        BlockKind::ConstantColor(color) => {
            fill_block(
                decompressed_block,
                destination_pitch,
                block_width,
                block_height,
                color,
            );
            return true;
        }
        BlockKind::Error => {
            fill_block(
                decompressed_block,
                destination_pitch,
                block_width,
                block_height,
                ERROR_COLOR,
            );
            return false;
        }
    };

    let endpoints = decode_endpoints(&bits, &params);

    let mut weights = [[0u8; 2]; MAX_BLOCK_PIXELS];
    decode_weights(&bits, &params, block_width, block_height, &mut weights);

    let mut partitions = [0u8; MAX_BLOCK_PIXELS];
    if params.partition_count > 1 {
        select_partitions(
            &bits,
            params.partition_count,
            block_width,
            block_height,
            &mut partitions,
        );
    }

    for y in 0..block_height {
        for x in 0..block_width {
            let i = y * block_width + x;
            let partition = partitions[i] as usize;
            let mode = params.endpoint_modes[partition];
            let [e0, e1] = endpoints[partition];

            let mut color = [0u8; 4];
            for (c, value) in color.iter_mut().enumerate() {
                let plane = if params.dual_plane && params.plane_selector == c {
                    1
                } else {
                    0
                };
                let weight = weights[i][plane] as i32;

                let is_hdr = if c < 3 {
                    mode.is_hdr_color()
                } else {
                    mode.is_hdr_alpha()
                };
                *value = if is_hdr {
                    select_color_hdr(e0[c], e1[c], weight)
                } else {
                    select_color(e0[c], e1[c], weight)
                };
            }

            let start = y * destination_pitch + x * 4;
            decompressed_block[start..start + 4].copy_from_slice(&color);
        }
    }

    true
}

fn fill_block(
    decompressed_block: &mut [u8],
    destination_pitch: usize,
    block_width: usize,
    block_height: usize,
    color: [u8; 4],
) {
    for y in 0..block_height {
        for x in 0..block_width {
            let start = y * destination_pitch + x * 4;
            decompressed_block[start..start + 4].copy_from_slice(&color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Packs (offset, length, value) fields into a block.
    fn block(fields: impl IntoIterator<Item = (u32, u32, u128)>) -> [u8; 16] {
        let value = fields.into_iter().fold(0u128, |acc, (offset, len, value)| {
            acc | (value & ((1u128 << len) - 1)) << offset
        });
        value.to_le_bytes()
    }

    // Weights are stored from the most significant bit with reversed bit order.
    fn weight_field(index: u32, len: u32, value: u128) -> (u32, u32, u128) {
        let reversed = value.reverse_bits() >> (128 - len);
        (128 - len * (index + 1), len, reversed)
    }

    fn decode(
        compressed: &[u8; 16],
        width: usize,
        height: usize,
    ) -> (bool, [[u8; 4]; MAX_BLOCK_PIXELS]) {
        let mut decompressed = [0u8; MAX_BLOCK_PIXELS * 4];
        let result = astc_block(compressed, &mut decompressed, width * 4, width, height);

        let mut pixels = [[0u8; 4]; MAX_BLOCK_PIXELS];
        for (pixel, chunk) in pixels.iter_mut().zip(decompressed.chunks_exact(4)) {
            pixel.copy_from_slice(chunk);
        }
        (result, pixels)
    }

    fn single_partition_rgb(weight: u128) -> [u8; 16] {
        // 4x4 grid with 3-bit weights and RGB direct endpoints from black to white.
        let endpoints = [0, 255, 0, 255, 0, 255]
            .into_iter()
            .enumerate()
            .map(|(i, v)| (17 + 8 * i as u32, 8, v));
        let weights = (0..16).map(|i| weight_field(i, 3, weight));
        block(
            [(0, 11, 0x053), (13, 4, 8)]
                .into_iter()
                .chain(endpoints)
                .chain(weights),
        )
    }

    #[test]
    fn single_partition_grey() {
        let (result, pixels) = decode(&single_partition_rgb(4), 4, 4);
        assert!(result);
        assert_eq!([[147, 147, 147, 255]; 16], pixels[..16]);
    }

    #[test]
    fn single_partition_endpoints() {
        let (_, pixels) = decode(&single_partition_rgb(0), 4, 4);
        assert_eq!([[0, 0, 0, 255]; 16], pixels[..16]);

        let (_, pixels) = decode(&single_partition_rgb(7), 4, 4);
        assert_eq!([[255, 255, 255, 255]; 16], pixels[..16]);
    }

    #[test]
    fn single_partition_monotonic() {
        let mut previous = 0;
        for w in 0..8 {
            let (_, pixels) = decode(&single_partition_rgb(w), 4, 4);
            assert!(pixels[5][0] >= previous);
            previous = pixels[5][0];
        }
    }

    #[test]
    fn single_partition_upsampled() {
        // The same 4x4 grid stretched over larger footprints.
        for (width, height) in [(5, 5), (6, 6), (8, 8), (10, 10), (12, 12), (8, 5)] {
            let (result, pixels) = decode(&single_partition_rgb(4), width, height);
            assert!(result);
            assert!(pixels[..width * height]
                .iter()
                .all(|p| *p == [147, 147, 147, 255]));
        }
    }

    #[test]
    fn dual_plane_hdr_luma_small_grid() {
        // 3x2 dual plane grid with 4-bit weights and HDR luma endpoints.
        // Interior pixels blend all four grid taps.
        let compressed = [
            142, 103, 182, 151, 44, 151, 131, 236, 193, 40, 115, 190, 51, 22, 249, 12,
        ];
        let (result, pixels) = decode(&compressed, 4, 4);
        assert!(result);
        assert_eq!(
            [
                [15, 14, 14, 255],
                [16, 17, 17, 255],
                [16, 18, 18, 255],
                [16, 16, 16, 255],
                [16, 15, 15, 255],
                [16, 17, 17, 255],
                [16, 18, 18, 255],
                [16, 17, 17, 255],
                [17, 16, 16, 255],
                [16, 17, 17, 255],
                [16, 18, 18, 255],
                [17, 17, 17, 255],
                [17, 17, 17, 255],
                [16, 18, 18, 255],
                [16, 18, 18, 255],
                [17, 18, 18, 255],
            ],
            pixels[..16]
        );
    }

    #[test]
    fn two_partitions() {
        // 4x2 grid with zero 3-bit weights and a shared RGB direct mode.
        let seed = 0x2A5;
        // Partition 0 is red and partition 1 is green.
        let endpoints = [63, 63, 0, 0, 0, 0, 0, 0, 63, 63, 0, 0]
            .into_iter()
            .enumerate()
            .map(|(i, v)| (29 + 6 * i as u32, 6, v));
        let compressed = block(
            [(0, 11, 0x013), (11, 2, 1), (13, 10, seed), (25, 4, 8)]
                .into_iter()
                .chain(endpoints),
        );

        let (result, pixels) = decode(&compressed, 4, 4);
        assert!(result);

        let mut partitions = [0u8; MAX_BLOCK_PIXELS];
        select_partitions(&BlockBits::new(&compressed), 2, 4, 4, &mut partitions);
        for (pixel, partition) in pixels[..16].iter().zip(partitions) {
            if partition == 0 {
                assert_eq!([255, 0, 0, 255], *pixel);
            } else {
                assert_eq!([0, 255, 0, 255], *pixel);
            }
        }
    }

    #[test]
    fn dual_plane_alpha() {
        // 4x2 grid with 2-bit weights, RGBA direct endpoints, and alpha in the second plane.
        let endpoints = [10, 10, 20, 20, 30, 30, 0, 255]
            .into_iter()
            .enumerate()
            .map(|(i, v)| (17 + 8 * i as u32, 8, v));
        // Weights alternate between the two planes.
        let weights = (0..16).map(|i| weight_field(i, 2, if i % 2 == 1 { 3 } else { 0 }));
        let compressed = block(
            [(0, 11, 0x402), (13, 4, 12), (94, 2, 3)]
                .into_iter()
                .chain(endpoints)
                .chain(weights),
        );

        let (result, pixels) = decode(&compressed, 4, 4);
        assert!(result);
        assert_eq!([[10, 20, 30, 255]; 16], pixels[..16]);
    }

    #[test]
    fn dual_plane_with_four_partitions_is_error() {
        let compressed = block([(0, 11, 0x402), (11, 2, 3)]);
        let (result, pixels) = decode(&compressed, 4, 4);
        assert!(!result);
        assert_eq!([ERROR_COLOR; 16], pixels[..16]);
    }

    #[test]
    fn grid_wider_than_footprint_is_error() {
        // 12x2 grid.
        let compressed = block([(0, 11, 0x01C)]);
        let (result, pixels) = decode(&compressed, 4, 4);
        assert!(!result);
        assert_eq!([ERROR_COLOR; 16], pixels[..16]);
    }

    #[test]
    fn reserved_block_is_error() {
        for (width, height) in [(4, 4), (5, 5), (6, 6), (8, 8), (10, 10), (12, 12)] {
            let (result, pixels) = decode(&[0u8; 16], width, height);
            assert!(!result);
            assert!(pixels[..width * height].iter().all(|p| *p == ERROR_COLOR));
        }
    }

    #[test]
    fn constant_color() {
        let mut compressed = [0xFFu8; 16];
        compressed[0] = 0xFC;
        compressed[1] = 0xFD;
        for (width, height) in [(4, 4), (6, 6), (12, 12)] {
            let (result, pixels) = decode(&compressed, width, height);
            assert!(result);
            assert!(pixels[..width * height]
                .iter()
                .all(|p| *p == [255, 255, 255, 255]));
        }
    }

    #[test]
    fn destination_pitch() {
        // Pixels outside the footprint are left unchanged.
        let mut decompressed = [0u8; 8 * 4 * 4];
        astc_block(&single_partition_rgb(7), &mut decompressed, 8 * 4, 4, 4);
        for row in decompressed.chunks_exact(8 * 4) {
            assert_eq!([255u8; 16], row[..16]);
            assert_eq!([0u8; 16], row[16..]);
        }
    }
}
