//! Color endpoint unquantization and reconstruction for the 16 endpoint modes.
use super::bits::{decode_ise, BlockBits, Direction, IseRange, IseValue};
use super::params::{BlockParams, MAX_ENDPOINT_VALUES};

/// The two RGBA endpoints of a partition.
///
/// LDR channels are in the range `0..=255`.
/// HDR channels are 12-bit values in the range `0..=0xFFF`.
pub(crate) type Endpoints = [[i32; 4]; 2];

// HDR alpha of 1.0 for modes without an alpha channel.
const HDR_ALPHA_ONE: i32 = 0x780;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorEndpointMode {
    LumaDirect,
    LumaBaseOffset,
    HdrLumaLargeRange,
    HdrLumaSmallRange,
    LumaAlphaDirect,
    LumaAlphaBaseOffset,
    RgbBaseScale,
    HdrRgbBaseScale,
    RgbDirect,
    RgbBaseOffset,
    RgbBaseScaleAlpha,
    HdrRgb,
    RgbaDirect,
    RgbaBaseOffset,
    HdrRgbLdrAlpha,
    HdrRgba,
}

impl ColorEndpointMode {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0xF {
            0 => Self::LumaDirect,
            1 => Self::LumaBaseOffset,
            2 => Self::HdrLumaLargeRange,
            3 => Self::HdrLumaSmallRange,
            4 => Self::LumaAlphaDirect,
            5 => Self::LumaAlphaBaseOffset,
            6 => Self::RgbBaseScale,
            7 => Self::HdrRgbBaseScale,
            8 => Self::RgbDirect,
            9 => Self::RgbBaseOffset,
            10 => Self::RgbBaseScaleAlpha,
            11 => Self::HdrRgb,
            12 => Self::RgbaDirect,
            13 => Self::RgbaBaseOffset,
            14 => Self::HdrRgbLdrAlpha,
            _ => Self::HdrRgba,
        }
    }

    /// The number of quantized values stored for this mode.
    pub fn value_count(self) -> usize {
        ((self as usize >> 1) & 6) + 2
    }

    /// `true` if the RGB channels use HDR interpolation.
    pub fn is_hdr_color(self) -> bool {
        matches!(
            self,
            Self::HdrLumaLargeRange
                | Self::HdrLumaSmallRange
                | Self::HdrRgbBaseScale
                | Self::HdrRgb
                | Self::HdrRgbLdrAlpha
                | Self::HdrRgba
        )
    }

    /// `true` if the alpha channel uses HDR interpolation.
    pub fn is_hdr_alpha(self) -> bool {
        matches!(
            self,
            Self::HdrLumaLargeRange
                | Self::HdrLumaSmallRange
                | Self::HdrRgbBaseScale
                | Self::HdrRgb
                | Self::HdrRgba
        )
    }

    /// Reconstructs the endpoints from the unquantized values `v`.
    pub fn decode(self, v: [i32; 8]) -> Endpoints {
        match self {
            Self::LumaDirect => [
                [v[0], v[0], v[0], 255],
                [v[1], v[1], v[1], 255],
            ],
            Self::LumaBaseOffset => {
                let l0 = (v[0] >> 2) | (v[1] & 0xC0);
                let l1 = (l0 + (v[1] & 0x3F)).min(255);
                [[l0, l0, l0, 255], [l1, l1, l1, 255]]
            }
            Self::HdrLumaLargeRange => {
                let (y0, y1) = if v[1] >= v[0] {
                    (v[0] << 4, v[1] << 4)
                } else {
                    ((v[1] << 4) + 8, (v[0] << 4) - 8)
                };
                [
                    [y0, y0, y0, HDR_ALPHA_ONE],
                    [y1, y1, y1, HDR_ALPHA_ONE],
                ]
            }
            Self::HdrLumaSmallRange => {
                let (y0, d) = if v[0] & 0x80 != 0 {
                    ((v[1] & 0xE0) << 4 | (v[0] & 0x7F) << 2, (v[1] & 0x1F) << 2)
                } else {
                    ((v[1] & 0xF0) << 4 | (v[0] & 0x7F) << 1, (v[1] & 0x0F) << 1)
                };
                let y1 = clamp_hdr(y0 + d);
                [
                    [y0, y0, y0, HDR_ALPHA_ONE],
                    [y1, y1, y1, HDR_ALPHA_ONE],
                ]
            }
            Self::LumaAlphaDirect => [
                [v[0], v[0], v[0], v[2]],
                [v[1], v[1], v[1], v[3]],
            ],
            Self::LumaAlphaBaseOffset => {
                let mut v = v;
                (v[1], v[0]) = bit_transfer_signed(v[1], v[0]);
                (v[3], v[2]) = bit_transfer_signed(v[3], v[2]);
                let l1 = v[0] + v[1];
                clamp_ldr([
                    [v[0], v[0], v[0], v[2]],
                    [l1, l1, l1, v[2] + v[3]],
                ])
            }
            Self::RgbBaseScale => [
                [
                    (v[0] * v[3]) >> 8,
                    (v[1] * v[3]) >> 8,
                    (v[2] * v[3]) >> 8,
                    255,
                ],
                [v[0], v[1], v[2], 255],
            ],
            Self::HdrRgbBaseScale => hdr_rgb_base_scale(v),
            Self::RgbDirect => rgba_direct([v[0], v[2], v[4], 255], [v[1], v[3], v[5], 255]),
            Self::RgbBaseOffset => {
                let mut v = v;
                for i in [0, 2, 4] {
                    (v[i + 1], v[i]) = bit_transfer_signed(v[i + 1], v[i]);
                }
                rgba_base_offset([v[0], v[2], v[4], 255], [v[1], v[3], v[5], 0])
            }
            Self::RgbBaseScaleAlpha => [
                [
                    (v[0] * v[3]) >> 8,
                    (v[1] * v[3]) >> 8,
                    (v[2] * v[3]) >> 8,
                    v[4],
                ],
                [v[0], v[1], v[2], v[5]],
            ],
            Self::HdrRgb => hdr_rgb(v, HDR_ALPHA_ONE, HDR_ALPHA_ONE),
            Self::RgbaDirect => rgba_direct([v[0], v[2], v[4], v[6]], [v[1], v[3], v[5], v[7]]),
            Self::RgbaBaseOffset => {
                let mut v = v;
                for i in [0, 2, 4, 6] {
                    (v[i + 1], v[i]) = bit_transfer_signed(v[i + 1], v[i]);
                }
                rgba_base_offset([v[0], v[2], v[4], v[6]], [v[1], v[3], v[5], v[7]])
            }
            // Alpha is interpolated as LDR.
            Self::HdrRgbLdrAlpha => hdr_rgb(v, v[6], v[7]),
            Self::HdrRgba => hdr_rgba(v),
        }
    }
}

/// Decodes and reconstructs the endpoints for each partition.
pub(crate) fn decode_endpoints(bits: &BlockBits, params: &BlockParams) -> [Endpoints; 4] {
    let mut values = [IseValue::default(); MAX_ENDPOINT_VALUES];
    let values = &mut values[..params.endpoint_value_count];
    decode_ise(
        bits,
        params.endpoint_range,
        params.endpoint_start,
        Direction::Forward,
        values,
    );

    let mut unquantized = [0i32; MAX_ENDPOINT_VALUES];
    for (u, v) in unquantized.iter_mut().zip(values.iter()) {
        *u = unquantize_endpoint(*v, params.endpoint_range);
    }

    let mut endpoints = [[[0; 4]; 2]; 4];
    let mut offset = 0;
    for (e, mode) in endpoints
        .iter_mut()
        .zip(params.endpoint_modes)
        .take(params.partition_count)
    {
        let count = mode.value_count();
        let mut v = [0; 8];
        v[..count].copy_from_slice(&unquantized[offset..offset + count]);
        *e = mode.decode(v);
        offset += count;
    }
    endpoints
}

/// Unquantizes an endpoint value to 8 bits.
pub(crate) fn unquantize_endpoint(value: IseValue, range: IseRange) -> i32 {
    let bits = value.bits as i32;
    let nonbits = value.nonbits as i32;

    match range {
        IseRange::Bits(n) => match n {
            1 => bits * 0xFF,
            2 => bits * 0x55,
            3 => bits << 5 | bits << 2 | bits >> 1,
            4 => bits << 4 | bits,
            5 => bits << 3 | bits >> 2,
            6 => bits << 2 | bits >> 4,
            7 => bits << 1 | bits >> 6,
            _ => bits,
        },
        IseRange::Trits(n) => {
            let x = bits >> 1;
            let (b, c) = match n {
                1 => (0, 204),
                2 => (0b100010110 * x, 93),
                3 => (x << 7 | x << 2 | x, 44),
                4 => (x << 6 | x, 22),
                5 => (x << 5 | x >> 2, 11),
                _ => (x << 4 | x >> 4, 5),
            };
            transfer_precision(nonbits * c + b, bits)
        }
        IseRange::Quints(n) => {
            let x = bits >> 1;
            let (b, c) = match n {
                1 => (0, 113),
                2 => (0b100001100 * x, 54),
                3 => (x << 7 | x << 1 | x >> 1, 26),
                4 => (x << 6 | x >> 1, 13),
                _ => (x << 5 | x >> 3, 6),
            };
            transfer_precision(nonbits * c + b, bits)
        }
    }
}

// The lowest bit of the value flips the unquantized result.
fn transfer_precision(t: i32, bits: i32) -> i32 {
    let a = (bits & 1) * 0x1FF;
    (a & 0x80) | (t ^ a) >> 2
}

// Moves the high bit of a into b and sign extends the remaining 6 bits of a.
fn bit_transfer_signed(a: i32, b: i32) -> (i32, i32) {
    let b = (b >> 1) | (a & 0x80);
    let a = (a >> 1) & 0x3F;
    let a = if a & 0x20 != 0 { a - 0x40 } else { a };
    (a, b)
}

// Averages red and green towards blue.
fn blue_contract([r, g, b, a]: [i32; 4]) -> [i32; 4] {
    [(r + b) >> 1, (g + b) >> 1, b, a]
}

fn rgba_direct(e0: [i32; 4], e1: [i32; 4]) -> Endpoints {
    if e0[0] + e0[1] + e0[2] > e1[0] + e1[1] + e1[2] {
        [blue_contract(e1), blue_contract(e0)]
    } else {
        [e0, e1]
    }
}

fn rgba_base_offset(base: [i32; 4], offset: [i32; 4]) -> Endpoints {
    let mut e1 = base;
    for c in 0..4 {
        e1[c] += offset[c];
    }

    if offset[0] + offset[1] + offset[2] < 0 {
        clamp_ldr([blue_contract(e1), blue_contract(base)])
    } else {
        clamp_ldr([base, e1])
    }
}

fn clamp_ldr(e: Endpoints) -> Endpoints {
    e.map(|c| c.map(|v| v.clamp(0, 255)))
}

fn clamp_hdr(v: i32) -> i32 {
    v.clamp(0, 0xFFF)
}

fn sign_extend(value: i32, bits: u32) -> i32 {
    let shift = 32 - bits;
    (value << shift) >> shift
}

fn hdr_rgb_base_scale(v: [i32; 8]) -> Endpoints {
    let mode_value = (v[2] >> 4 & 0x8) | (v[1] >> 5 & 0x4) | (v[0] >> 6);
    let (major, mode) = if mode_value & 0xC != 0xC {
        (mode_value >> 2, mode_value & 3)
    } else if mode_value != 0xF {
        (mode_value & 3, 4)
    } else {
        (0, 5)
    };

    // The base color and scale with the extra bits for each submode.
    let mut c = [v[0] & 0x3F, v[1] & 0x1F, v[2] & 0x1F, v[3] & 0x1F];
    let shift = match mode {
        0 => {
            c[3] |= v[3] & 0x60;
            c[0] |= v[3] >> 1 & 0x40;
            c[0] |= v[2] << 1 & 0x80;
            c[0] |= v[1] << 3 & 0x300;
            c[0] |= v[2] << 5 & 0x400;
            1
        }
        1 => {
            c[1] |= v[1] & 0x20;
            c[2] |= v[2] & 0x20;
            c[0] |= v[3] >> 1 & 0x40;
            c[0] |= v[2] << 1 & 0x80;
            c[0] |= v[1] << 2 & 0x100;
            c[0] |= v[3] << 4 & 0x600;
            1
        }
        2 => {
            c[3] |= v[3] & 0xE0;
            c[0] |= v[2] << 1 & 0xC0;
            c[0] |= v[1] << 3 & 0x300;
            2
        }
        3 => {
            c[1] |= v[1] & 0x20;
            c[2] |= v[2] & 0x20;
            c[3] |= v[3] & 0x60;
            c[0] |= v[3] >> 1 & 0x40;
            c[0] |= v[2] << 1 & 0x80;
            c[0] |= v[1] << 2 & 0x100;
            3
        }
        4 => {
            c[1] |= v[1] & 0x60;
            c[2] |= v[2] & 0x60;
            c[3] |= v[3] & 0x20;
            c[0] |= v[3] >> 1 & 0x40;
            c[0] |= v[3] << 1 & 0x80;
            4
        }
        _ => {
            c[1] |= v[1] & 0x60;
            c[2] |= v[2] & 0x60;
            c[3] |= v[3] & 0x60;
            c[0] |= v[3] >> 1 & 0x40;
            5
        }
    };

    let mut c = c.map(|x| x << shift);
    if mode != 5 {
        c[1] = c[0] - c[1];
        c[2] = c[0] - c[2];
    }

    let e1 = swap_major([c[0], c[1], c[2]], major);
    let e0 = e1.map(|x| x - c[3]);
    let [r0, g0, b0] = e0.map(clamp_hdr);
    let [r1, g1, b1] = e1.map(clamp_hdr);
    [
        [r0, g0, b0, HDR_ALPHA_ONE],
        [r1, g1, b1, HDR_ALPHA_ONE],
    ]
}

fn hdr_rgb(v: [i32; 8], alpha0: i32, alpha1: i32) -> Endpoints {
    let major = (v[4] >> 7) | (v[5] >> 6 & 2);
    if major == 3 {
        // Direct values without offsets.
        return [
            [v[0] << 4, v[2] << 4, v[4] << 5 & 0xFE0, alpha0],
            [v[1] << 4, v[3] << 4, v[5] << 5 & 0xFE0, alpha1],
        ];
    }

    let mode = (v[1] >> 7) | (v[2] >> 6 & 2) | (v[3] >> 5 & 4);
    let mut va = v[0] | (v[1] << 2 & 0x100);
    let mut vb0 = v[2] & 0x3F;
    let mut vb1 = v[3] & 0x3F;
    let mut vc = v[1] & 0x3F;

    let (vd0, vd1) = match mode {
        0 | 2 => (sign_extend(v[4] & 0x7F, 7), sign_extend(v[5] & 0x7F, 7)),
        1 | 3 | 5 | 7 => (sign_extend(v[4] & 0x3F, 6), sign_extend(v[5] & 0x3F, 6)),
        _ => (sign_extend(v[4] & 0x1F, 5), sign_extend(v[5] & 0x1F, 5)),
    };

    match mode {
        0 => {
            vb0 |= v[2] & 0x40;
            vb1 |= v[3] & 0x40;
        }
        1 => {
            vb0 |= v[2] & 0x40;
            vb1 |= v[3] & 0x40;
            vb0 |= v[4] << 1 & 0x80;
            vb1 |= v[5] << 1 & 0x80;
        }
        2 => {
            va |= v[2] << 3 & 0x200;
            vc |= v[3] & 0x40;
        }
        3 => {
            va |= v[4] << 3 & 0x200;
            vc |= v[5] & 0x40;
            vb0 |= v[2] & 0x40;
            vb1 |= v[3] & 0x40;
        }
        4 => {
            va |= v[4] << 4 & 0x200;
            va |= v[5] << 5 & 0x400;
            vb0 |= v[2] & 0x40;
            vb1 |= v[3] & 0x40;
            vb0 |= v[4] << 1 & 0x80;
            vb1 |= v[5] << 1 & 0x80;
        }
        5 => {
            va |= v[2] << 3 & 0x200;
            va |= v[3] << 4 & 0x400;
            vc |= v[5] & 0x40;
            vc |= v[4] << 1 & 0x80;
        }
        6 => {
            va |= v[4] << 4 & 0x200;
            va |= v[5] << 5 & 0x400;
            va |= v[4] << 5 & 0x800;
            vc |= v[5] & 0x40;
            vb0 |= v[2] & 0x40;
            vb1 |= v[3] & 0x40;
        }
        _ => {
            va |= v[2] << 3 & 0x200;
            va |= v[3] << 4 & 0x400;
            va |= v[4] << 5 & 0x800;
            vc |= v[5] & 0x40;
        }
    }

    // Scale everything to 12 bits.
    let shift = (mode >> 1) ^ 3;
    let [va, vb0, vb1, vc, vd0, vd1] = [va, vb0, vb1, vc, vd0, vd1].map(|x| x << shift);

    let e0 = swap_major([va - vc, va - vb0 - vc - vd0, va - vb1 - vc - vd1], major);
    let e1 = swap_major([va, va - vb0, va - vb1], major);
    let [r0, g0, b0] = e0;
    let [r1, g1, b1] = e1;
    [
        [r0, g0, b0, alpha0].map(clamp_hdr),
        [r1, g1, b1, alpha1].map(clamp_hdr),
    ]
}

// Moves the major component from red into its channel.
fn swap_major([r, g, b]: [i32; 3], major: i32) -> [i32; 3] {
    match major {
        1 => [g, r, b],
        2 => [b, g, r],
        _ => [r, g, b],
    }
}

fn hdr_rgba(v: [i32; 8]) -> Endpoints {
    let mode = ((v[6] >> 7) & 1) | ((v[7] >> 6) & 2);
    let v6 = v[6] & 0x7F;
    let v7 = v[7] & 0x7F;

    if mode == 3 {
        hdr_rgb(v, v6 << 5, v7 << 5)
    } else {
        let v6 = v6 | (v7 << (mode + 1)) & 0x780;
        let v7 = ((v7 & (0x3F >> mode)) ^ (0x20 >> mode)) - (0x20 >> mode);
        let v6 = v6 << (4 - mode);
        let v7 = v7 << (4 - mode);
        hdr_rgb(v, v6, clamp_hdr(v6 + v7))
    }
}
