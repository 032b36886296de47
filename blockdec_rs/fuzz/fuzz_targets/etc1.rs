#![no_main]

extern crate libfuzzer_sys;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [u8; 8]| {
    // 4x4 RGBA u8
    let mut actual = [0u8; 4 * 4 * 4];
    blockdec_rs::etc1(&data, &mut actual, 4 * 4);

    // ETC1 has no alpha channel.
    assert!(actual.chunks_exact(4).all(|p| p[3] == 255));
});
