/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Helpers shared by the integration tests
#![allow(dead_code)]

use std::io::Cursor;

use png::Transformations;
use zune_png_stream::filters::filter_scanline;
use zune_png_stream::{pack_argb, DecodeStatus, FilterMethod, PngStreamDecoder, ADAM7_PASSES};

pub const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

pub fn push_chunk(out: &mut Vec<u8>, name: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(name);
    hasher.update(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
}

pub fn ihdr(width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[depth, color, 0, 0, interlace]);
    data
}

/// A png file with the given header, ancillary chunks placed before IDAT
/// and `scanlines` (filter bytes included) compressed into one IDAT
pub fn build_png(header: &[u8], before_idat: &[(&[u8; 4], &[u8])], scanlines: &[u8]) -> Vec<u8> {
    let mut out = SIGNATURE.to_vec();
    push_chunk(&mut out, b"IHDR", header);

    for (name, data) in before_idat {
        push_chunk(&mut out, name, data);
    }
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(scanlines, 6);
    push_chunk(&mut out, b"IDAT", &compressed);
    push_chunk(&mut out, b"IEND", &[]);

    out
}

/// Like [`build_png`] without ancillary chunks, but the compressed
/// stream is spread over IDAT chunks of at most `idat_size` bytes
pub fn build_png_split(header: &[u8], scanlines: &[u8], idat_size: usize) -> Vec<u8> {
    let mut out = SIGNATURE.to_vec();
    push_chunk(&mut out, b"IHDR", header);

    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(scanlines, 6);
    for idat in compressed.chunks(idat_size) {
        push_chunk(&mut out, b"IDAT", idat);
    }
    push_chunk(&mut out, b"IEND", &[]);

    out
}

/// Prefix every `pitch` bytes of `raw` with a None filter byte
pub fn unfiltered_scanlines(raw: &[u8], pitch: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len() + raw.len() / pitch);

    for row in raw.chunks_exact(pitch) {
        out.push(0);
        out.extend_from_slice(row);
    }
    out
}

fn copy_sample(src: &[u8], sx: usize, dst: &mut [u8], dx: usize, bits: usize) {
    if bits >= 8 {
        let bytes = bits / 8;
        dst[dx * bytes..(dx + 1) * bytes].copy_from_slice(&src[sx * bytes..(sx + 1) * bytes]);
    } else {
        let mask = ((1_u16 << bits) - 1) as u8;
        let src_bit = sx * bits;
        let dst_bit = dx * bits;
        let value = (src[src_bit / 8] >> (8 - bits - src_bit % 8)) & mask;

        dst[dst_bit / 8] |= value << (8 - bits - dst_bit % 8);
    }
}

/// Reorder unpadded-per-row `raw` samples into Adam7 pass scanlines
///
/// The first row of every pass is Up filtered against a zeroed row, the
/// rest rotate through Average, Paeth, Sub and Up.
pub fn interlace(raw: &[u8], width: usize, height: usize, bits_per_pixel: usize) -> Vec<u8> {
    const ROTATION: [FilterMethod; 4] = [
        FilterMethod::Average,
        FilterMethod::Paeth,
        FilterMethod::Sub,
        FilterMethod::Up
    ];
    let pitch = (width * bits_per_pixel + 7) / 8;
    let stride = (bits_per_pixel / 8).max(1);
    let mut out = Vec::new();

    for (pass_index, pass) in ADAM7_PASSES.iter().enumerate() {
        let (pass_width, pass_height) = pass.dimensions(width, height);

        if pass_width == 0 || pass_height == 0 {
            continue;
        }
        let pass_pitch = (pass_width * bits_per_pixel + 7) / 8;
        let mut previous = vec![0_u8; pass_pitch];

        for y in 0..pass_height {
            let mut row = vec![0_u8; pass_pitch];

            for x in 0..pass_width {
                let (full_x, full_y) = pass.scatter(x, y);
                let src = &raw[full_y * pitch..(full_y + 1) * pitch];

                copy_sample(src, full_x, &mut row, x, bits_per_pixel);
            }
            let filter = if y == 0 {
                FilterMethod::Up
            } else {
                ROTATION[(y + pass_index) % ROTATION.len()]
            };
            let mut filtered = vec![0_u8; pass_pitch];
            filter_scanline(filter, &previous, &row, &mut filtered, stride);

            out.push(filter.to_int());
            out.extend_from_slice(&filtered);
            previous = row;
        }
    }
    out
}

/// Decode with the png crate, expanding to 8 bit samples and packing
/// the result the same way we do
pub fn decode_ref(data: &[u8]) -> Vec<u32> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder.read_info().unwrap();

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());

    let (color, _) = reader.output_color_type();

    match color {
        png::ColorType::Grayscale => buf.iter().map(|x| pack_argb(*x, *x, *x, 255)).collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .map(|x| pack_argb(x[0], x[0], x[0], x[1]))
            .collect(),
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .map(|x| pack_argb(x[0], x[1], x[2], 255))
            .collect(),
        png::ColorType::Rgba => buf
            .chunks_exact(4)
            .map(|x| pack_argb(x[0], x[1], x[2], x[3]))
            .collect(),
        png::ColorType::Indexed => panic!("EXPAND should have removed indexed output")
    }
}

/// Push `data` `piece` bytes at a time, stepping the decoder in between
pub fn decode_in_pieces(data: &[u8], piece: usize) -> Vec<u32> {
    let mut decoder = PngStreamDecoder::new();
    let mut pixels = vec![];

    for bytes in data.chunks(piece) {
        decoder.push_bytes(bytes);

        loop {
            match decoder.decode_step(&mut pixels).unwrap() {
                DecodeStatus::NeedMoreInput => break,
                DecodeStatus::HeadersDecoded => {
                    let (width, height) = decoder.get_dimensions().unwrap();
                    pixels.resize(width * height, 0);
                }
                DecodeStatus::ImageComplete => return pixels,
                DecodeStatus::RowReady | DecodeStatus::PassComplete => ()
            }
        }
    }
    decoder.end_of_input();
    assert_eq!(
        decoder.decode_step(&mut pixels).unwrap(),
        DecodeStatus::ImageComplete
    );
    pixels
}
