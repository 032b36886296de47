//! Interpolation of endpoint colors by weight for LDR and HDR endpoints.
use half::f16;

/// Interpolates 8-bit endpoint channels by a weight in `0..=64`.
pub(crate) fn select_color(v0: i32, v1: i32, weight: i32) -> u8 {
    let c = ((v0 << 8 | v0) * (64 - weight) + (v1 << 8 | v1) * weight + 32) >> 6;
    ((c * 255 + 32768) / 65536) as u8
}

/// Interpolates 12-bit HDR endpoint channels by a weight in `0..=64`
/// and converts the resulting half float to an 8-bit value.
pub(crate) fn select_color_hdr(v0: i32, v1: i32, weight: i32) -> u8 {
    let c = (((v0 << 4) * (64 - weight) + (v1 << 4) * weight + 32) >> 6) as u16;

    // Map the 11-bit mantissa to be approximately logarithmic.
    let m = (c & 0x7FF) as u32;
    let m = if m < 512 {
        m * 3
    } else if m < 1536 {
        4 * m - 512
    } else {
        5 * m - 2048
    };

    let value = f16::from_bits((c >> 1 & 0x7C00) | (m >> 3) as u16).to_f32();
    if value.is_finite() {
        ((value * 255.0 + 0.5) as u32).min(255) as u8
    } else {
        255
    }
}
