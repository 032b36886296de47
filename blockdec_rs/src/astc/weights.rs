//! Weight grid unquantization and bilinear upsampling to the block footprint.
use super::bits::{decode_ise, BlockBits, Direction, IseRange, IseValue};
use super::params::{BlockParams, MAX_WEIGHT_COUNT};
use super::MAX_BLOCK_PIXELS;

/// Decodes the interpolation weights in `0..=64` for each pixel and plane.
pub(crate) fn decode_weights(
    bits: &BlockBits,
    params: &BlockParams,
    block_width: usize,
    block_height: usize,
    weights: &mut [[u8; 2]; MAX_BLOCK_PIXELS],
) {
    // Weights are stored starting from the most significant bit.
    let mut values = [IseValue::default(); MAX_WEIGHT_COUNT];
    let values = &mut values[..params.weight_count];
    decode_ise(bits, params.weight_range, 128, Direction::Reverse, values);

    let mut grid = [0u8; MAX_WEIGHT_COUNT];
    for (g, v) in grid.iter_mut().zip(values.iter()) {
        *g = unquantize_weight(*v, params.weight_range);
    }

    upsample_weights(
        &grid[..params.weight_count],
        params.grid_width,
        params.grid_height,
        params.plane_count(),
        block_width,
        block_height,
        weights,
    );
}

/// Unquantizes a weight value to the range `0..=64`.
pub(crate) fn unquantize_weight(value: IseValue, range: IseRange) -> u8 {
    let bits = value.bits;
    let nonbits = value.nonbits;

    let unquantized = match range {
        IseRange::Bits(n) => match n {
            1 => {
                if bits != 0 {
                    63
                } else {
                    0
                }
            }
            2 => bits << 4 | bits << 2 | bits,
            3 => bits << 3 | bits,
            4 => bits << 2 | bits >> 2,
            _ => bits << 1 | bits >> 4,
        },
        // Values are already evenly spaced in the range.
        IseRange::Trits(0) => return (nonbits * 32) as u8,
        IseRange::Quints(0) => return (nonbits * 16) as u8,
        IseRange::Trits(n) => {
            let t = match n {
                1 => nonbits * 50,
                2 => nonbits * 23 + if bits & 2 != 0 { 0b1000101 } else { 0 },
                _ => nonbits * 11 + ((bits << 4 | bits >> 1) & 0b1100011),
            };
            transfer_precision(t, bits)
        }
        IseRange::Quints(n) => {
            let t = match n {
                1 => nonbits * 28,
                _ => nonbits * 13 + if bits & 2 != 0 { 0b1000010 } else { 0 },
            };
            transfer_precision(t, bits)
        }
    };

    // Expand the range 0..=63 to 0..=64.
    if unquantized > 32 {
        unquantized as u8 + 1
    } else {
        unquantized as u8
    }
}

fn transfer_precision(t: u32, bits: u32) -> u32 {
    let a = (bits & 1) * 0x7F;
    (a & 0x20) | (t ^ a) >> 2
}

fn upsample_weights(
    grid: &[u8],
    grid_width: usize,
    grid_height: usize,
    plane_count: usize,
    block_width: usize,
    block_height: usize,
    weights: &mut [[u8; 2]; MAX_BLOCK_PIXELS],
) {
    // Fixed point scale factors from block to grid coordinates.
    let ds = (1024 + block_width / 2) / (block_width - 1);
    let dt = (1024 + block_height / 2) / (block_height - 1);

    for t in 0..block_height {
        for s in 0..block_width {
            let gs = (ds * s * (grid_width - 1) + 32) >> 6;
            let gt = (dt * t * (grid_height - 1) + 32) >> 6;
            let fs = gs & 0xF;
            let ft = gt & 0xF;
            let v = (gs >> 4) + (gt >> 4) * grid_width;

            let w11 = (fs * ft + 8) >> 4;
            let w10 = ft - w11;
            let w01 = fs - w11;
            let w00 = 16 + w11 - fs - ft;

            for p in 0..plane_count {
                // Taps past the edge of the grid always have a weight of zero.
                let tap = |i: usize| grid.get(i * plane_count + p).copied().unwrap_or(0) as usize;
                let weight = (tap(v) * w00
                    + tap(v + 1) * w01
                    + tap(v + grid_width) * w10
                    + tap(v + grid_width + 1) * w11
                    + 8)
                    >> 4;
                weights[t * block_width + s][p] = weight as u8;
            }
        }
    }
}
