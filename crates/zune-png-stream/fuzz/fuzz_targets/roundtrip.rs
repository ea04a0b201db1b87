#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let width = usize::from(data[0] % 32) + 1;
    let channels = if data[1] & 1 == 0 { 3 } else { 4 };

    let pixels: Vec<u32> = data[2..]
        .chunks_exact(4)
        .map(|x| {
            let px = u32::from_be_bytes([x[0], x[1], x[2], x[3]]);
            if channels == 3 {
                px | 0xff00_0000
            } else {
                px
            }
        })
        .collect();

    let height = pixels.len() / width;
    if height == 0 {
        return;
    }
    let pixels = &pixels[..width * height];

    let png = zune_png_stream::encode(pixels, width, height, channels).unwrap();
    let (_, decoded) = zune_png_stream::decode(&png).unwrap();

    assert_eq!(decoded, pixels);
});
