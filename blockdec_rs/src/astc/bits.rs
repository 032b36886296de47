//! Bit extraction and Integer Sequence Encoding (ISE) for 128-bit ASTC blocks.

/// Each byte with its bit order reversed.
pub(crate) static BIT_REVERSE_TABLE: [u8; 256] = bit_reverse_table();

/// The five trits packed into each 8-bit trit group value.
pub(crate) static TRITS_TABLE: [[u8; 256]; 5] = trits_table();

/// The three quints packed into each 7-bit quint group value.
pub(crate) static QUINTS_TABLE: [[u8; 128]; 3] = quints_table();

const fn bit_reverse_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8).reverse_bits();
        i += 1;
    }
    table
}

const fn bit(x: usize, i: u32) -> usize {
    (x >> i) & 1
}

const fn trits_table() -> [[u8; 256]; 5] {
    let mut table = [[0u8; 256]; 5];
    let mut t = 0;
    while t < 256 {
        let c;
        let t3;
        let t4;
        if (t >> 2) & 7 == 7 {
            c = ((t >> 5) & 7) << 2 | (t & 3);
            t3 = 2;
            t4 = 2;
        } else {
            c = t & 0x1F;
            if (t >> 5) & 3 == 3 {
                t3 = bit(t, 7);
                t4 = 2;
            } else {
                t3 = (t >> 5) & 3;
                t4 = bit(t, 7);
            }
        }

        let t0;
        let t1;
        let t2;
        if c & 3 == 3 {
            t0 = bit(c, 3) << 1 | (bit(c, 2) & !bit(c, 3) & 1);
            t1 = bit(c, 4);
            t2 = 2;
        } else if (c >> 2) & 3 == 3 {
            t0 = c & 3;
            t1 = 2;
            t2 = 2;
        } else {
            t0 = bit(c, 1) << 1 | (bit(c, 0) & !bit(c, 1) & 1);
            t1 = (c >> 2) & 3;
            t2 = bit(c, 4);
        }

        table[0][t] = t0 as u8;
        table[1][t] = t1 as u8;
        table[2][t] = t2 as u8;
        table[3][t] = t3 as u8;
        table[4][t] = t4 as u8;
        t += 1;
    }
    table
}

const fn quints_table() -> [[u8; 128]; 3] {
    let mut table = [[0u8; 128]; 3];
    let mut q = 0;
    while q < 128 {
        let q0;
        let q1;
        let q2;
        if (q >> 1) & 3 == 3 && (q >> 5) & 3 == 0 {
            q0 = 4;
            q1 = 4;
            q2 = bit(q, 0) << 2 | (bit(q, 4) & !bit(q, 0) & 1) << 1 | (bit(q, 3) & !bit(q, 0) & 1);
        } else {
            let c;
            if (q >> 1) & 3 == 3 {
                c = ((q >> 3) & 3) << 3 | (3 - ((q >> 5) & 3)) << 1 | bit(q, 0);
                q2 = 4;
            } else {
                c = q & 0x1F;
                q2 = (q >> 5) & 3;
            }

            if c & 7 == 5 {
                q0 = (c >> 3) & 3;
                q1 = 4;
            } else {
                q0 = c & 7;
                q1 = (c >> 3) & 3;
            }
        }

        table[0][q] = q0 as u8;
        table[1][q] = q1 as u8;
        table[2][q] = q2 as u8;
        q += 1;
    }
    table
}

/// A 128-bit block stored as little endian halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockBits {
    low: u64,
    high: u64,
}

impl BlockBits {
    pub fn new(block: &[u8; 16]) -> Self {
        let value = u128::from_le_bytes(*block);
        Self {
            low: value as u64,
            high: (value >> 64) as u64,
        }
    }

    /// Reads `len` bits starting at bit `offset`.
    ///
    /// Bits outside the block read as zero, so negative offsets are valid.
    pub fn bits(&self, offset: i32, len: u32) -> u64 {
        if len == 0 || offset >= 128 || offset <= -64 {
            return 0;
        }

        let mask = if len >= 64 { u64::MAX } else { (1 << len) - 1 };
        let value = if offset >= 64 {
            self.high >> (offset - 64)
        } else if offset <= 0 {
            self.low << -offset
        } else if offset + len as i32 <= 64 {
            self.low >> offset
        } else {
            self.low >> offset | self.high << (64 - offset)
        };
        value & mask
    }

    pub fn bit(&self, offset: i32) -> u32 {
        self.bits(offset, 1) as u32
    }
}

/// Reverses the order of the low `len` bits of `value`.
pub(crate) fn reverse_bits(value: u64, len: u32) -> u64 {
    if len == 0 {
        return 0;
    }

    let reversed = value
        .to_le_bytes()
        .iter()
        .fold(0u64, |acc, b| acc << 8 | BIT_REVERSE_TABLE[*b as usize] as u64);
    reversed >> (64 - len)
}

/// A quantization level for an integer sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IseRange {
    /// Values with only the given number of bits.
    Bits(u32),
    /// A trit (0..3) in the most significant digit followed by the given number of bits.
    Trits(u32),
    /// A quint (0..5) in the most significant digit followed by the given number of bits.
    Quints(u32),
}

impl IseRange {
    /// The number of bits used to store `count` values.
    pub const fn bit_count(self, count: u32) -> u32 {
        match self {
            IseRange::Bits(b) => count * b,
            IseRange::Trits(b) => count * b + (count * 8 + 4) / 5,
            IseRange::Quints(b) => count * b + (count * 7 + 2) / 3,
        }
    }
}

/// A decoded sequence value split into the trit or quint digit and the low bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct IseValue {
    pub bits: u32,
    pub nonbits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Read towards the most significant bit starting at the offset.
    Forward,
    /// Read towards the least significant bit ending at the offset with reversed bit order.
    Reverse,
}

/// Decodes `values.len()` values from `block` starting at bit `start`.
pub(crate) fn decode_ise(
    block: &BlockBits,
    range: IseRange,
    start: i32,
    direction: Direction,
    values: &mut [IseValue],
) {
    match range {
        IseRange::Bits(b) => {
            for (i, value) in values.iter_mut().enumerate() {
                let bits = read_field(block, start, i as u32 * b, b, direction);
                *value = IseValue {
                    bits: bits as u32,
                    nonbits: 0,
                };
            }
        }
        IseRange::Trits(b) => decode_trits(block, b, start, direction, values),
        IseRange::Quints(b) => decode_quints(block, b, start, direction, values),
    }
}

fn read_field(block: &BlockBits, start: i32, offset: u32, len: u32, direction: Direction) -> u64 {
    match direction {
        Direction::Forward => block.bits(start + offset as i32, len),
        Direction::Reverse => reverse_bits(block.bits(start - (offset + len) as i32, len), len),
    }
}

fn decode_trits(
    block: &BlockBits,
    b: u32,
    start: i32,
    direction: Direction,
    values: &mut [IseValue],
) {
    const BIT_OFFSETS: [u32; 5] = [0, 2, 4, 5, 7];

    let mask = (1u64 << b) - 1;
    let group_size = 8 + 5 * b;
    for (group, chunk) in values.chunks_mut(5).enumerate() {
        // A trailing partial group only stores the bits for its values.
        let len = (group_size * chunk.len() as u32 + 4) / 5;
        let d = read_field(block, start, group as u32 * group_size, len, direction);

        let t = (d >> b & 0x3)
            | (d >> (2 * b) & 0xC)
            | (d >> (3 * b) & 0x10)
            | (d >> (4 * b) & 0x60)
            | (d >> (5 * b) & 0x80);

        for (j, value) in chunk.iter_mut().enumerate() {
            *value = IseValue {
                bits: (d >> (BIT_OFFSETS[j] + b * j as u32) & mask) as u32,
                nonbits: TRITS_TABLE[j][t as usize] as u32,
            };
        }
    }
}

fn decode_quints(
    block: &BlockBits,
    b: u32,
    start: i32,
    direction: Direction,
    values: &mut [IseValue],
) {
    const BIT_OFFSETS: [u32; 3] = [0, 3, 5];

    let mask = (1u64 << b) - 1;
    let group_size = 7 + 3 * b;
    for (group, chunk) in values.chunks_mut(3).enumerate() {
        let len = (group_size * chunk.len() as u32 + 2) / 3;
        let d = read_field(block, start, group as u32 * group_size, len, direction);

        let q = (d >> b & 0x7) | (d >> (2 * b) & 0x18) | (d >> (3 * b) & 0x60);

        for (j, value) in chunk.iter_mut().enumerate() {
            *value = IseValue {
                bits: (d >> (BIT_OFFSETS[j] + b * j as u32) & mask) as u32,
                nonbits: QUINTS_TABLE[j][q as usize] as u32,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_from_u128(value: u128) -> BlockBits {
        BlockBits::new(&value.to_le_bytes())
    }

    #[test]
    fn bits_within_low_half() {
        let block = block_from_u128(0b1011_0000);
        assert_eq!(0b1011, block.bits(4, 4));
        assert_eq!(0, block.bits(4, 0));
    }

    #[test]
    fn bits_across_halves() {
        let block = block_from_u128(0b111 << 62);
        assert_eq!(0b111, block.bits(62, 3));
        assert_eq!(0b1, block.bits(64, 1));
        assert_eq!(0b111 << 2, block.bits(60, 5));
    }

    #[test]
    fn bits_high_half() {
        let block = block_from_u128(0xAB << 120);
        assert_eq!(0xAB, block.bits(120, 8));
        assert_eq!(0xA, block.bits(124, 8));
        assert_eq!(0, block.bits(128, 8));
    }

    #[test]
    fn bits_negative_offset() {
        // Bits below the block read as zero.
        let block = block_from_u128(0b11);
        assert_eq!(0b1100, block.bits(-2, 4));
        assert_eq!(0, block.bits(-64, 8));
    }

    #[test]
    fn bits_full_width() {
        let block = block_from_u128(u128::MAX);
        assert_eq!(u64::MAX, block.bits(0, 64));
        assert_eq!(u64::MAX, block.bits(32, 64));
    }

    #[test]
    fn reverse_bits_lengths() {
        assert_eq!(0b001, reverse_bits(0b100, 3));
        assert_eq!(0b1101, reverse_bits(0b1011, 4));
        assert_eq!(1 << 63, reverse_bits(1, 64));
        assert_eq!(0, reverse_bits(0xFF, 0));
    }

    #[test]
    fn bit_reverse_table_values() {
        assert_eq!(0x80, BIT_REVERSE_TABLE[0x01]);
        assert_eq!(0x0F, BIT_REVERSE_TABLE[0xF0]);
        assert_eq!(0xA5, BIT_REVERSE_TABLE[0xA5]);
    }

    #[test]
    fn trits_table_simple_encodings() {
        // Trit values 0..=2 with all other trits zero encode directly.
        assert_eq!([0, 0, 0, 0, 0], TRITS_TABLE.map(|t| t[0]));
        assert_eq!([1, 0, 0, 0, 0], TRITS_TABLE.map(|t| t[1]));
        assert_eq!([2, 0, 0, 0, 0], TRITS_TABLE.map(|t| t[2]));
        assert_eq!([2, 2, 2, 2, 2], TRITS_TABLE.map(|t| t[0x7E]));
    }

    #[test]
    fn trits_table_range() {
        for t in 0..256 {
            for j in 0..5 {
                assert!(TRITS_TABLE[j][t] < 3);
            }
        }
    }

    #[test]
    fn quints_table_simple_encodings() {
        assert_eq!([0, 0, 0], QUINTS_TABLE.map(|q| q[0]));
        assert_eq!([4, 0, 0], QUINTS_TABLE.map(|q| q[4]));
        assert_eq!([0, 4, 0], QUINTS_TABLE.map(|q| q[5]));
        assert_eq!([0, 0, 1], QUINTS_TABLE.map(|q| q[0x20]));
        assert_eq!([4, 4, 4], QUINTS_TABLE.map(|q| q[7]));
    }

    #[test]
    fn quints_table_covers_all_combinations() {
        let mut seen = [[[false; 5]; 5]; 5];
        for q in 0..128 {
            let [q0, q1, q2] = QUINTS_TABLE.map(|t| t[q] as usize);
            seen[q0][q1][q2] = true;
        }
        assert!(seen.iter().flatten().flatten().all(|s| *s));
    }

    #[test]
    fn bit_count_ranges() {
        assert_eq!(48, IseRange::Bits(3).bit_count(16));
        // 5 trits take 8 bits.
        assert_eq!(8, IseRange::Trits(0).bit_count(5));
        assert_eq!(16, IseRange::Trits(1).bit_count(6));
        // 3 quints take 7 bits.
        assert_eq!(7, IseRange::Quints(0).bit_count(3));
        assert_eq!(9, IseRange::Quints(2).bit_count(2));
    }

    #[test]
    fn decode_bits_forward() {
        let block = block_from_u128(0b11_10_01 << 17);
        let mut values = [IseValue::default(); 3];
        decode_ise(&block, IseRange::Bits(2), 17, Direction::Forward, &mut values);
        assert_eq!([1, 2, 3], values.map(|v| v.bits));
    }

    #[test]
    fn decode_bits_reverse() {
        // The first value occupies the highest bits with reversed bit order.
        let block = block_from_u128(0b100_110 << 122);
        let mut values = [IseValue::default(); 2];
        decode_ise(&block, IseRange::Bits(3), 128, Direction::Reverse, &mut values);
        assert_eq!([0b001, 0b011], values.map(|v| v.bits));
    }

    #[test]
    fn decode_trits_forward() {
        // T = 0b00000010 encodes trits [2, 0, 0, 0, 0] with one bit per value.
        // Layout: m0 T0 T1 m1 T2 T3 m2 T4 m3 T5 T6 m4 T7
        let t_bits = [0, 1, 0, 0, 0, 0, 0, 0];
        let m = [1, 0, 1, 0, 1];
        let positions = [
            (m[0], 0),
            (t_bits[0], 1),
            (t_bits[1], 2),
            (m[1], 3),
            (t_bits[2], 4),
            (t_bits[3], 5),
            (m[2], 6),
            (t_bits[4], 7),
            (m[3], 8),
            (t_bits[5], 9),
            (t_bits[6], 10),
            (m[4], 11),
            (t_bits[7], 12),
        ];
        let value = positions
            .iter()
            .fold(0u128, |acc, (b, i)| acc | (*b as u128) << i);

        let block = block_from_u128(value);
        let mut values = [IseValue::default(); 5];
        decode_ise(&block, IseRange::Trits(1), 0, Direction::Forward, &mut values);
        assert_eq!([1, 0, 1, 0, 1], values.map(|v| v.bits));
        assert_eq!([2, 0, 0, 0, 0], values.map(|v| v.nonbits));
    }

    #[test]
    fn decode_quints_partial_group() {
        // Q = 0b0000101 encodes [0, 4, 0] with no additional bits.
        let block = block_from_u128(0b101);
        let mut values = [IseValue::default(); 2];
        decode_ise(&block, IseRange::Quints(0), 0, Direction::Forward, &mut values);
        assert_eq!([0, 4], values.map(|v| v.nonbits));
    }
}
