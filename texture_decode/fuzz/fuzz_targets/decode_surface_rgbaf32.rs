#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|surface: texture_decode::Surface<Vec<u8>>| {
    let _rgbaf32 = surface.decode_rgbaf32();
});
