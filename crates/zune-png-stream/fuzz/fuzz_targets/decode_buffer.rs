#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    use zune_png_stream::zune_core::options::DecoderOptions;
    use zune_png_stream::PngOptions;

    let opts = PngOptions::new(DecoderOptions::new_fast());
    let _ = zune_png_stream::decode_with_options(data, opts);
});
