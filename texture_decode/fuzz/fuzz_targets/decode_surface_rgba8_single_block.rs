#![no_main]

use libfuzzer_sys::fuzz_target;

use arbitrary::{Arbitrary, Result, Unstructured};

#[derive(Debug)]
pub struct SurfaceInfo {
    width: u32,
    height: u32,
    format: texture_decode::ImageFormat,
    data: Vec<u8>,
}

impl<'a> Arbitrary<'a> for SurfaceInfo {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let format = texture_decode::ImageFormat::arbitrary(u)?;

        // A single block with a possibly partial footprint.
        let (block_width, block_height) = format.block_dimensions();
        let width = u.int_in_range(1..=block_width)?;
        let height = u.int_in_range(1..=block_height)?;

        let mut data = vec![0u8; format.block_size_in_bytes()];
        u.fill_buffer(&mut data)?;

        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }
}

fuzz_target!(|input: SurfaceInfo| {
    let SurfaceInfo {
        width,
        height,
        format,
        data,
    } = input;

    let surface = texture_decode::Surface {
        width,
        height,
        image_format: format,
        data,
    };
    let rgba8 = surface.decode_rgba8().unwrap();
    assert_eq!(width as usize * height as usize * 4, rgba8.data.len());

    // BGRA only swaps the red and blue channels.
    let bgra8 = surface.decode_bgra8().unwrap();
    for (rgba, bgra) in rgba8.data.chunks_exact(4).zip(bgra8.data.chunks_exact(4)) {
        assert_eq!([rgba[2], rgba[1], rgba[0], rgba[3]], bgra);
    }
});
