// Intensity modifiers for each table codeword.
// The second value is used for the larger magnitude modifiers.
const MODIFIER_TABLE: [[i16; 2]; 8] = [
    [2, 8],
    [5, 17],
    [9, 29],
    [13, 42],
    [18, 60],
    [24, 80],
    [33, 106],
    [47, 183],
];

// The subblock for each pixel in column-major order.
const SUBBLOCK_TABLE: [[usize; 16]; 2] = [
    // Two 2x4 subblocks side by side.
    [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1],
    // Two 4x2 subblocks stacked vertically.
    [0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1],
];

pub(crate) fn etc1_block(
    compressed_block: &[u8; 8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    let codewords = [compressed_block[3] >> 5, (compressed_block[3] >> 2) & 7];
    let differential = compressed_block[3] & 2 != 0;
    let flip = (compressed_block[3] & 1) as usize;

    let mut base_colors = [[0u8; 3]; 2];
    for c in 0..3 {
        let [c0, c1] = if differential {
            differential_colors(compressed_block[c])
        } else {
            individual_colors(compressed_block[c])
        };
        base_colors[0][c] = c0;
        base_colors[1][c] = c1;
    }

    // Pixel index bits are stored as a least significant bit plane and a sign plane.
    let lsb = u16::from_be_bytes([compressed_block[6], compressed_block[7]]);
    let msb = u16::from_be_bytes([compressed_block[4], compressed_block[5]]);

    for i in 0..16 {
        let subblock = SUBBLOCK_TABLE[flip][i];
        let codeword = codewords[subblock] as usize;

        let modifier = MODIFIER_TABLE[codeword][((lsb >> i) & 1) as usize];
        let modifier = if (msb >> i) & 1 != 0 {
            -modifier
        } else {
            modifier
        };

        let [r, g, b] = base_colors[subblock].map(|c| (c as i16 + modifier).clamp(0, 255) as u8);

        // Pixels are indexed in column-major order.
        let (x, y) = (i / 4, i % 4);
        let start = y * destination_pitch + x * 4;
        decompressed_block[start..start + 4].copy_from_slice(&[r, g, b, 255u8]);
    }
}

// 5-bit base color and a signed 3-bit offset for the second subblock.
fn differential_colors(value: u8) -> [u8; 2] {
    let c0 = value & 0xF8;
    let c1 = c0
        .wrapping_add((value << 3) & 0x18)
        .wrapping_sub((value << 3) & 0x20);
    [c0 | c0 >> 5, c1 | c1 >> 5]
}

// Two independent 4-bit base colors.
fn individual_colors(value: u8) -> [u8; 2] {
    [(value & 0xF0) | value >> 4, (value & 0x0F) | value << 4]
}
