/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decode images written by the png crate and compare against its decoder
use nanorand::{Rng, WyRand};
use zune_png_stream::{decode, pack_argb, PngColor};

mod common;

use common::decode_ref;

fn bit_depth(depth: u8) -> png::BitDepth {
    match depth {
        1 => png::BitDepth::One,
        2 => png::BitDepth::Two,
        4 => png::BitDepth::Four,
        8 => png::BitDepth::Eight,
        16 => png::BitDepth::Sixteen,
        _ => unreachable!()
    }
}

fn channels(color: png::ColorType) -> usize {
    match color {
        png::ColorType::Grayscale | png::ColorType::Indexed => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4
    }
}

/// Write random pixels with the png crate
fn write_ref(
    width: usize, height: usize, color: png::ColorType, depth: u8, palette: Option<(&[u8], &[u8])>,
    seed: u64
) -> Vec<u8> {
    let pitch = (width * channels(color) * usize::from(depth) + 7) / 8;
    let mut raw = vec![0_u8; pitch * height];
    WyRand::new_seed(seed).fill(&mut raw);

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width as u32, height as u32);
        encoder.set_color(color);
        encoder.set_depth(bit_depth(depth));

        if let Some((plte, trns)) = palette {
            encoder.set_palette(plte.to_vec());
            if !trns.is_empty() {
                encoder.set_trns(trns.to_vec());
            }
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&raw).unwrap();
        writer.finish().unwrap();
    }
    out
}

fn test_decoding(data: &[u8]) {
    let (info, pixels) = decode(data).unwrap();
    let reference = decode_ref(data);

    assert_eq!(pixels.len(), info.width * info.height);

    for (pos, (a, b)) in reference.iter().zip(&pixels).enumerate() {
        if a != b {
            panic!("[{pos}]: {a:08x} != {b:08x}");
        }
    }
}

#[test]
fn test_grayscale_depths() {
    for depth in [1, 2, 4, 8, 16] {
        let data = write_ref(13, 7, png::ColorType::Grayscale, depth, None, u64::from(depth));
        test_decoding(&data);
    }
}

#[test]
fn test_gray_alpha() {
    for depth in [8, 16] {
        let data = write_ref(9, 11, png::ColorType::GrayscaleAlpha, depth, None, 3);
        test_decoding(&data);
    }
}

#[test]
fn test_rgb_and_rgba() {
    for depth in [8, 16] {
        test_decoding(&write_ref(31, 5, png::ColorType::Rgb, depth, None, 10));
        test_decoding(&write_ref(5, 31, png::ColorType::Rgba, depth, None, 11));
    }
}

#[test]
fn test_palette_depths() {
    let mut rng = WyRand::new_seed(99);

    for depth in [1_u8, 2, 4, 8] {
        // fill the palette so every random index is valid
        let entries = 1_usize << depth;
        let mut plte = vec![0_u8; entries * 3];
        rng.fill(&mut plte);

        let no_alpha: &[u8] = &[];
        let palette = Some((plte.as_slice(), no_alpha));
        let data = write_ref(17, 6, png::ColorType::Indexed, depth, palette, 4);
        test_decoding(&data);
    }
}

#[test]
fn test_palette_transparency() {
    let mut rng = WyRand::new_seed(7);
    let mut plte = vec![0_u8; 16 * 3];
    rng.fill(&mut plte);
    // fewer alpha values than entries, the rest are opaque
    let trns = [0_u8, 64, 128, 192, 255, 10];

    let palette = Some((plte.as_slice(), trns.as_slice()));
    let data = write_ref(20, 20, png::ColorType::Indexed, 4, palette, 8);
    test_decoding(&data);

    let (_, pixels) = decode(&data).unwrap();
    let alphas: Vec<u8> = pixels.iter().map(|x| (x >> 24) as u8).collect();
    assert!(alphas.iter().any(|x| *x == 64));
    assert!(alphas.iter().any(|x| *x == 255));
}

#[test]
fn test_info() {
    let data = write_ref(3, 2, png::ColorType::Rgba, 16, None, 1);
    let (info, _) = decode(&data).unwrap();

    assert_eq!((info.width, info.height), (3, 2));
    assert_eq!(info.depth, 16);
    assert_eq!(info.color, PngColor::RGBA);
}

#[test]
fn test_two_by_two_rgb_sub_row() {
    // row 0 stored as is, row 1 stores pixel 2 as the difference from pixel 1
    let scanlines = [
        0, 10, 20, 30, 40, 50, 60, //
        1, 100, 110, 120, 5, 250, 7
    ];
    let data = common::build_png(&common::ihdr(2, 2, 8, 2, 0), &[], &scanlines);
    let (_, pixels) = decode(&data).unwrap();

    assert_eq!(
        pixels,
        [
            pack_argb(10, 20, 30, 255),
            pack_argb(40, 50, 60, 255),
            pack_argb(100, 110, 120, 255),
            // 110 + 250 wraps around
            pack_argb(105, 104, 127, 255)
        ]
    );
}

#[test]
fn test_ancillary_chunks_are_skipped() {
    let scanlines = [0, 1, 2, 3];
    let data = common::build_png(
        &common::ihdr(3, 1, 8, 0, 0),
        &[(b"tEXt", &b"Comment\0hello"[..]), (b"gAMA", &[0, 0, 177, 143][..])],
        &scanlines
    );
    let (_, pixels) = decode(&data).unwrap();

    assert_eq!(pixels[2], pack_argb(3, 3, 3, 255));
}

#[test]
fn test_gray_trns_is_ignored() {
    let scanlines = [0, 9, 200];
    let data = common::build_png(
        &common::ihdr(2, 1, 8, 0, 0),
        &[(b"tRNS", &[0, 9][..])],
        &scanlines
    );
    let (_, pixels) = decode(&data).unwrap();

    assert_eq!(pixels, [pack_argb(9, 9, 9, 255), pack_argb(200, 200, 200, 255)]);
}

#[test]
fn test_plte_on_truecolor_is_ignored() {
    let scanlines = [0, 1, 2, 3];
    let data = common::build_png(
        &common::ihdr(1, 1, 8, 2, 0),
        &[(b"PLTE", &[9, 9, 9][..])],
        &scanlines
    );
    let (_, pixels) = decode(&data).unwrap();
    assert_eq!(pixels, [pack_argb(1, 2, 3, 255)]);
}
