//! Block mode decoding and the bit budget split between endpoints and weights.
use super::bits::{BlockBits, IseRange};
use super::endpoints::ColorEndpointMode;

/// The most weights stored in a block including both planes.
pub(crate) const MAX_WEIGHT_COUNT: usize = 64;

/// The most endpoint values stored in a block.
pub(crate) const MAX_ENDPOINT_VALUES: usize = 18;

// Indexed by the 4-bit weight range with the high precision bit as bit 3.
const WEIGHT_RANGES: [Option<IseRange>; 16] = [
    None,
    None,
    Some(IseRange::Bits(1)),
    Some(IseRange::Trits(0)),
    Some(IseRange::Bits(2)),
    Some(IseRange::Quints(0)),
    Some(IseRange::Trits(1)),
    Some(IseRange::Bits(3)),
    None,
    None,
    Some(IseRange::Quints(1)),
    Some(IseRange::Trits(2)),
    Some(IseRange::Bits(4)),
    Some(IseRange::Quints(2)),
    Some(IseRange::Trits(3)),
    Some(IseRange::Bits(5)),
];

// Endpoint ranges from highest to lowest precision.
const ENDPOINT_RANGES: [IseRange; 19] = [
    IseRange::Bits(8),
    IseRange::Trits(6),
    IseRange::Quints(5),
    IseRange::Bits(7),
    IseRange::Trits(5),
    IseRange::Quints(4),
    IseRange::Bits(6),
    IseRange::Trits(4),
    IseRange::Quints(3),
    IseRange::Bits(5),
    IseRange::Trits(3),
    IseRange::Quints(2),
    IseRange::Bits(4),
    IseRange::Trits(2),
    IseRange::Quints(1),
    IseRange::Bits(3),
    IseRange::Trits(1),
    IseRange::Bits(2),
    IseRange::Bits(1),
];

/// The parameters needed to decode the endpoints and weights of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockParams {
    pub grid_width: usize,
    pub grid_height: usize,
    pub dual_plane: bool,
    /// The channel using the second weight plane.
    pub plane_selector: usize,
    pub weight_range: IseRange,
    /// The number of stored weights including both planes.
    pub weight_count: usize,
    pub partition_count: usize,
    pub endpoint_modes: [ColorEndpointMode; 4],
    pub endpoint_value_count: usize,
    pub endpoint_range: IseRange,
    /// The first bit of the endpoint values.
    pub endpoint_start: i32,
}

impl BlockParams {
    pub fn plane_count(&self) -> usize {
        if self.dual_plane {
            2
        } else {
            1
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKind {
    Normal(BlockParams),
    /// A void-extent block with a single RGBA8 color.
    ConstantColor([u8; 4]),
    /// A reserved or invalid encoding.
    Error,
}

/// Decodes the block mode for a `block_width` x `block_height` footprint.
pub(crate) fn decode_block_params(
    block: &[u8; 16],
    bits: &BlockBits,
    block_width: usize,
    block_height: usize,
) -> BlockKind {
    let mode = bits.bits(0, 11) as u32;

    if mode & 0x1FF == 0x1FC {
        // Each channel is a UNORM16 value, so use the high byte.
        // Bit 9 selects HDR void extents, which store the values shifted by a byte.
        let color = if mode & 0x200 != 0 {
            [block[8], block[10], block[12], block[14]]
        } else {
            [block[9], block[11], block[13], block[15]]
        };
        return BlockKind::ConstantColor(color);
    }

    // Reserved block modes.
    if mode & 0xF == 0 || (mode & 0x3 == 0 && mode & 0x1C0 == 0x1C0) {
        return BlockKind::Error;
    }

    let Some((grid_width, grid_height, dual_plane, weight_range)) = decode_weight_grid(mode) else {
        return BlockKind::Error;
    };

    if grid_width > block_width || grid_height > block_height {
        return BlockKind::Error;
    }

    let plane_count = if dual_plane { 2 } else { 1 };
    let weight_count = grid_width * grid_height * plane_count;
    if weight_count > MAX_WEIGHT_COUNT {
        return BlockKind::Error;
    }

    let weight_bits = weight_range.bit_count(weight_count as u32) as i32;
    if !(24..=96).contains(&weight_bits) {
        return BlockKind::Error;
    }

    let partition_count = bits.bits(11, 2) as usize + 1;
    if partition_count == 4 && dual_plane {
        return BlockKind::Error;
    }

    let (endpoint_modes, mut config_bits, extra_mode_bits) =
        decode_endpoint_modes(bits, partition_count, weight_bits);

    let mut plane_selector = 0;
    if dual_plane {
        // The selector is stored just below any extra endpoint mode bits.
        plane_selector = bits.bits(128 - weight_bits - extra_mode_bits - 2, 2) as usize;
        config_bits += 2;
    }

    let endpoint_value_count: usize = endpoint_modes[..partition_count]
        .iter()
        .map(|m| m.value_count())
        .sum();
    if endpoint_value_count > MAX_ENDPOINT_VALUES {
        return BlockKind::Error;
    }

    let remaining_bits = 128 - config_bits - weight_bits;
    let Some(endpoint_range) = endpoint_range(endpoint_value_count, remaining_bits) else {
        return BlockKind::Error;
    };

    BlockKind::Normal(BlockParams {
        grid_width,
        grid_height,
        dual_plane,
        plane_selector,
        weight_range,
        weight_count,
        partition_count,
        endpoint_modes,
        endpoint_value_count,
        endpoint_range,
        endpoint_start: if partition_count == 1 { 17 } else { 29 },
    })
}

// Returns the grid dimensions, dual plane flag, and weight range.
fn decode_weight_grid(mode: u32) -> Option<(usize, usize, bool, IseRange)> {
    let a = ((mode >> 5) & 3) as usize;
    let b = ((mode >> 7) & 3) as usize;
    let mut dual_plane = mode & 0x400 != 0;
    let mut range = (mode >> 4) & 1 | ((mode >> 9) & 1) << 3;

    let (width, height) = if mode & 3 != 0 {
        range |= (mode & 3) << 1;
        match (mode >> 2) & 3 {
            0 => (b + 4, a + 2),
            1 => (b + 8, a + 2),
            2 => (a + 2, b + 8),
            _ if mode & 0x100 != 0 => ((b & 1) + 2, a + 2),
            _ => (a + 2, (b & 1) + 6),
        }
    } else {
        range |= ((mode >> 2) & 3) << 1;
        match (mode >> 7) & 3 {
            0 => (12, a + 2),
            1 => (a + 2, 12),
            2 => {
                // This layout uses bits 9 and 10 for the height.
                dual_plane = false;
                range &= 7;
                (a + 6, ((mode >> 9) & 3) as usize + 6)
            }
            _ if mode & 0x20 != 0 => (10, 6),
            _ => (6, 10),
        }
    };

    WEIGHT_RANGES[range as usize].map(|r| (width, height, dual_plane, r))
}

// Returns the modes, the config bits before the endpoints,
// and the number of extra mode bits stored below the weights.
fn decode_endpoint_modes(
    bits: &BlockBits,
    partition_count: usize,
    weight_bits: i32,
) -> ([ColorEndpointMode; 4], i32, i32) {
    let mut modes = [ColorEndpointMode::LumaDirect; 4];

    if partition_count == 1 {
        modes[0] = ColorEndpointMode::from_bits(bits.bits(13, 4) as u32);
        return (modes, 17, 0);
    }

    let cem_base = bits.bits(23, 2) as u32;
    if cem_base == 0 {
        // All partitions share the same mode.
        let mode = ColorEndpointMode::from_bits(bits.bits(25, 4) as u32);
        modes[..partition_count].fill(mode);
        return (modes, 29, 0);
    }

    // Each partition selects one of two mode classes and a 2-bit mode within the class.
    let mut raw = [0u32; 4];
    for (i, m) in raw.iter_mut().take(partition_count).enumerate() {
        *m = (bits.bit(25 + i as i32) + cem_base - 1) << 2;
    }

    let extra = 128 - weight_bits;
    match partition_count {
        2 => {
            raw[0] |= bits.bits(27, 2) as u32;
            raw[1] |= bits.bits(extra - 2, 2) as u32;
        }
        3 => {
            raw[0] |= bits.bit(28) | bits.bit(extra - 5) << 1;
            raw[1] |= bits.bits(extra - 4, 2) as u32;
            raw[2] |= bits.bits(extra - 2, 2) as u32;
        }
        _ => {
            for (i, m) in raw.iter_mut().enumerate() {
                *m |= bits.bits(extra - 8 + 2 * i as i32, 2) as u32;
            }
        }
    }

    for (mode, m) in modes.iter_mut().zip(raw).take(partition_count) {
        *mode = ColorEndpointMode::from_bits(m);
    }

    let partition_count = partition_count as i32;
    (modes, 25 + 3 * partition_count, 3 * partition_count - 4)
}

// Finds the highest precision range that fits in the available bits.
fn endpoint_range(value_count: usize, available_bits: i32) -> Option<IseRange> {
    ENDPOINT_RANGES
        .into_iter()
        .find(|r| r.bit_count(value_count as u32) as i32 <= available_bits)
}
