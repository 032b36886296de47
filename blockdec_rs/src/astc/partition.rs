//! Hash based assignment of pixels to partitions.
use super::bits::BlockBits;
use super::MAX_BLOCK_PIXELS;

/// Assigns each pixel of the footprint to one of `partition_count` partitions.
pub(crate) fn select_partitions(
    bits: &BlockBits,
    partition_count: usize,
    block_width: usize,
    block_height: usize,
    partitions: &mut [u8; MAX_BLOCK_PIXELS],
) {
    let seed = bits.bits(13, 10) as u32 | (partition_count as u32 - 1) << 10;
    let rnum = hash52(seed);

    let mut seeds = [0u32; 8];
    for (i, s) in seeds.iter_mut().enumerate() {
        let s4 = (rnum >> (4 * i)) & 0xF;
        *s = s4 * s4;
    }

    let sh1 = if seed & 2 != 0 { 4 } else { 5 };
    let sh2 = if partition_count == 3 { 6 } else { 5 };
    let (even_shift, odd_shift) = if seed & 1 != 0 { (sh1, sh2) } else { (sh2, sh1) };
    for (i, s) in seeds.iter_mut().enumerate() {
        *s >>= if i % 2 == 0 { even_shift } else { odd_shift };
    }

    // Small blocks sample the pattern at double resolution.
    let scale = if block_width * block_height < 31 { 2 } else { 1 };

    for y in 0..block_height {
        for x in 0..block_width {
            partitions[y * block_width + x] = partition_of(
                &seeds,
                rnum,
                partition_count,
                (x * scale) as u32,
                (y * scale) as u32,
            );
        }
    }
}

fn partition_of(seeds: &[u32; 8], rnum: u32, partition_count: usize, x: u32, y: u32) -> u8 {
    let score = |i: usize, shift: u32| {
        seeds[2 * i]
            .wrapping_mul(x)
            .wrapping_add(seeds[2 * i + 1].wrapping_mul(y))
            .wrapping_add(rnum >> shift)
            & 0x3F
    };

    let a = score(0, 14);
    let b = score(1, 10);
    let c = if partition_count >= 3 { score(2, 6) } else { 0 };
    let d = if partition_count >= 4 { score(3, 2) } else { 0 };

    // Ties go to the lowest partition.
    if a >= b && a >= c && a >= d {
        0
    } else if b >= c && b >= d {
        1
    } else if c >= d {
        2
    } else {
        3
    }
}

fn hash52(seed: u32) -> u32 {
    let mut p = seed;
    p ^= p >> 15;
    p = p.wrapping_sub(p << 17);
    p = p.wrapping_add(p << 7);
    p = p.wrapping_add(p << 4);
    p ^= p >> 5;
    p = p.wrapping_add(p << 16);
    p ^= p >> 7;
    p ^= p >> 3;
    p ^= p << 6;
    p ^= p >> 17;
    p
}
