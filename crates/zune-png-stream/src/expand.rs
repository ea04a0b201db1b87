/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Color expansion, turns a de-filtered scanline into packed pixels
//!
//! Output pixels are 32 bit `0xAARRGGBB` values, 16 bit samples keep only
//! their high byte and sub-byte samples are scaled up to the full 8 bit range.
use crate::chunks::PLTEEntry;
use crate::enums::PngColor;
use crate::error::PngDecodeErrors;

/// Scale factors that map an n bit sample to 8 bits, indexed by depth
const DEPTH_SCALE_TABLE: [u8; 9] = [0, 0xff, 0x55, 0, 0x11, 0, 0, 0, 0x01];

/// Pack four channels into a `0xAARRGGBB` pixel
#[inline(always)]
pub const fn pack_argb(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_be_bytes([a, r, g, b])
}

/// Split a `0xAARRGGBB` pixel into `[r, g, b, a]`
#[inline(always)]
pub const fn unpack_argb(pixel: u32) -> [u8; 4] {
    let [a, r, g, b] = pixel.to_be_bytes();
    [r, g, b, a]
}

#[inline(always)]
fn sub_byte_sample(row: &[u8], index: usize, depth: usize) -> u8 {
    let bit = index * depth;
    // samples are packed msb first
    let shift = 8 - depth - (bit & 7);
    let mask = ((1_u16 << depth) - 1) as u8;

    (row[bit >> 3] >> shift) & mask
}

/// Expand one scanline into `out`, which holds exactly one row of pixels
///
/// `palette` holds the palette entries actually present in the image, it's
/// ignored for non indexed images.
pub fn expand_scanline(
    row: &[u8], color: PngColor, depth: u8, palette: &[PLTEEntry], out: &mut [u32]
) -> Result<(), PngDecodeErrors> {
    match color {
        PngColor::Luma => expand_luma(row, depth, out),
        PngColor::LumaA => expand_interleaved::<2>(row, depth, out),
        PngColor::RGB => expand_interleaved::<3>(row, depth, out),
        PngColor::RGBA => expand_interleaved::<4>(row, depth, out),
        PngColor::Palette => return expand_palette(row, depth, palette, out)
    }
    Ok(())
}

fn expand_luma(row: &[u8], depth: u8, out: &mut [u32]) {
    match depth {
        8 => {
            for (px, luma) in out.iter_mut().zip(row) {
                *px = pack_argb(*luma, *luma, *luma, 255);
            }
        }
        16 => {
            for (px, luma) in out.iter_mut().zip(row.chunks_exact(2)) {
                *px = pack_argb(luma[0], luma[0], luma[0], 255);
            }
        }
        _ => {
            let scale = DEPTH_SCALE_TABLE[usize::from(depth)];
            let depth = usize::from(depth);

            for (i, px) in out.iter_mut().enumerate() {
                let luma = sub_byte_sample(row, i, depth) * scale;
                *px = pack_argb(luma, luma, luma, 255);
            }
        }
    }
}

/// Luma+alpha, rgb and rgba at 8 or 16 bits per sample.
fn expand_interleaved<const COMPONENTS: usize>(row: &[u8], depth: u8, out: &mut [u32]) {
    // high byte comes first in 16 bit samples so we can
    // step over the low one
    let step = if depth == 16 { 2 } else { 1 };

    for (px, samples) in out.iter_mut().zip(row.chunks_exact(COMPONENTS * step)) {
        let sample = |i: usize| samples[i * step];

        *px = match COMPONENTS {
            2 => pack_argb(sample(0), sample(0), sample(0), sample(1)),
            3 => pack_argb(sample(0), sample(1), sample(2), 255),
            _ => pack_argb(sample(0), sample(1), sample(2), sample(3))
        };
    }
}

fn expand_palette(
    row: &[u8], depth: u8, palette: &[PLTEEntry], out: &mut [u32]
) -> Result<(), PngDecodeErrors> {
    let depth = usize::from(depth);

    for (i, px) in out.iter_mut().enumerate() {
        let index = if depth == 8 {
            row[i]
        } else {
            sub_byte_sample(row, i, depth)
        };
        let entry = palette
            .get(usize::from(index))
            .ok_or(PngDecodeErrors::PaletteIndexOutOfRange(index, palette.len()))?;

        *px = pack_argb(entry.red, entry.green, entry.blue, entry.alpha);
    }
    Ok(())
}
