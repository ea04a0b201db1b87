/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Feeding the decoder in pieces gives the same image as feeding it at once
use nanorand::{Rng, WyRand};
use zune_png_stream::{decode, decode_begin, encode, pack_argb, DecodeStatus};

mod common;

use common::{build_png, decode_in_pieces, ihdr, interlace};

fn random_png(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let mut rng = WyRand::new_seed(seed);
    let pixels: Vec<u32> = (0..width * height).map(|_| rng.generate::<u32>()).collect();

    encode(&pixels, width, height, 4).unwrap()
}

#[test]
fn test_one_byte_at_a_time() {
    let data = random_png(23, 17, 42);
    let (_, expected) = decode(&data).unwrap();

    assert_eq!(decode_in_pieces(&data, 1), expected);
}

#[test]
fn test_odd_piece_sizes() {
    let data = random_png(64, 9, 5);
    let (_, expected) = decode(&data).unwrap();

    for piece in [2, 3, 7, 13, 100, 4096] {
        assert_eq!(decode_in_pieces(&data, piece), expected, "piece size {piece}");
    }
}

#[test]
fn test_interlaced_one_byte_at_a_time() {
    let (width, height) = (13, 10);
    let mut raw = vec![0_u8; width * height * 3];
    WyRand::new_seed(3).fill(&mut raw);

    let data = build_png(
        &ihdr(width as u32, height as u32, 8, 2, 1),
        &[],
        &interlace(&raw, width, height, 24)
    );
    let (_, expected) = decode(&data).unwrap();

    assert_eq!(decode_in_pieces(&data, 1), expected);
}

#[test]
fn test_need_more_input_keeps_progress() {
    let width = 4;
    let pixels = vec![pack_argb(1, 2, 3, 255); width * 4];
    let data = encode(&pixels, width, 4, 3).unwrap();

    // signature and most of IHDR
    let mut decoder = decode_begin(&data[..20]).unwrap();
    let mut out = vec![0; width * 4];

    assert_eq!(decoder.get_info(), None);
    assert_eq!(
        decoder.decode_step(&mut out).unwrap(),
        DecodeStatus::NeedMoreInput
    );
    assert_eq!(
        decoder.decode_step(&mut out).unwrap(),
        DecodeStatus::NeedMoreInput
    );
    assert_eq!(decoder.rows_decoded(), 0);

    decoder.push_bytes(&data[20..]);

    assert_eq!(decoder.get_dimensions(), None);
    assert_eq!(
        decoder.decode_step(&mut out).unwrap(),
        DecodeStatus::HeadersDecoded
    );
    assert_eq!(decoder.get_dimensions(), Some((4, 4)));
    assert_eq!(decoder.decode_step(&mut out).unwrap(), DecodeStatus::RowReady);
    assert_eq!(decoder.rows_decoded(), 1);
    assert_eq!(decoder.current_pass(), 0);

    while decoder.decode_step(&mut out).unwrap() != DecodeStatus::ImageComplete {}

    assert_eq!(out, pixels);
}
