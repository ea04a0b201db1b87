#![no_main]

use libfuzzer_sys::fuzz_target;
use zune_png_stream::{DecodeStatus, PngStreamDecoder};

fuzz_target!(|data: &[u8]| {
    // first byte picks how the stream gets split
    let Some((piece, data)) = data.split_first() else {
        return;
    };
    let piece = usize::from(*piece).max(1);

    let mut decoder = PngStreamDecoder::new();
    let mut pixels = vec![];

    for bytes in data.chunks(piece) {
        decoder.push_bytes(bytes);

        loop {
            match decoder.decode_step(&mut pixels) {
                Ok(DecodeStatus::NeedMoreInput) => break,
                Ok(DecodeStatus::HeadersDecoded) => {
                    let (w, h) = decoder.get_dimensions().unwrap();
                    pixels.resize(w * h, 0);
                }
                Ok(DecodeStatus::ImageComplete) | Err(_) => return,
                Ok(_) => ()
            }
        }
    }
});
