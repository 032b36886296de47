#![no_main]

extern crate libfuzzer_sys;

use libfuzzer_sys::fuzz_target;

const ERROR_COLOR: [u8; 4] = [255, 0, 255, 255];

fuzz_target!(|data: [u8; 16]| {
    for size in [4, 5, 6, 8, 10, 12] {
        // Start with non zeros to test that every pixel is written.
        let mut actual = [1u8; 12 * 12 * 4];
        let valid = blockdec_rs::astc(&data, &mut actual, size * 4, size, size);

        let pixels = &actual[..size * size * 4];
        if !valid {
            assert!(pixels.chunks_exact(4).all(|p| p == ERROR_COLOR));
        }
        assert!(actual[size * size * 4..].iter().all(|u| *u == 1));
    }
});
