/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The incremental encode driver
//!
//! Rows are filtered one [`encode_step`](PngEncoder::encode_step) at a time,
//! the whole filtered image is then compressed in one go by
//! [`finish`](PngEncoder::finish).
use alloc::vec;
use alloc::vec::Vec;

use log::trace;
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::options::EncoderOptions;

use crate::chunks::PngInfo;
use crate::constants::{MAX_CHUNK_LENGTH, MAX_IMAGE_BYTES, PNG_SIGNATURE};
use crate::enums::{InterlaceMethod, PngColor};
use crate::error::PngEncodeErrors;
use crate::expand::unpack_argb;
use crate::filters::choose_compression_filter;
use crate::headers::writers::{write_chunk, write_iend, write_ihdr};
use crate::inflate::{Compressor, MinizDeflater};

/// Outcome of a single [`PngEncoder::encode_step`] call
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EncodeStatus {
    /// One row was filtered, more remain
    RowEncoded,
    /// Every row was filtered, call [`PngEncoder::finish`]
    RowsComplete
}

/// A row at a time png encoder for 8 bit RGB and RGBA images
///
/// Input pixels are packed `0xAARRGGBB` values, the alpha byte is dropped
/// when encoding with three channels.
pub struct PngEncoder<'a> {
    pixels:     &'a [u32],
    width:      usize,
    height:     usize,
    channels:   usize,
    level:      u8,
    row:        usize,
    previous:   Vec<u8>,
    current:    Vec<u8>,
    candidates: [Vec<u8>; 5],
    /// filter byte + filtered row, for every row encoded so far
    filtered:   Vec<u8>
}

impl<'a> PngEncoder<'a> {
    /// Create an encoder for `width` by `height` pixels with
    /// `channels` (3 or 4) channels per pixel
    pub fn new(
        pixels: &'a [u32], width: usize, height: usize, channels: usize
    ) -> Result<PngEncoder<'a>, PngEncodeErrors> {
        if width == 0 || height == 0 {
            return Err(PngEncodeErrors::GenericStatic("Zero width or height"));
        }
        if channels != 3 && channels != 4 {
            return Err(PngEncodeErrors::UnsupportedChannels(channels));
        }
        let fits = width
            .checked_mul(height)
            .and_then(|x| x.checked_mul(4))
            .map_or(false, |x| x <= MAX_IMAGE_BYTES);

        if !fits {
            return Err(PngEncodeErrors::Overflow(width, height));
        }
        let expected = width * height;

        if pixels.len() != expected {
            return Err(PngEncodeErrors::WrongInputSize(expected, pixels.len()));
        }
        let pitch = width * channels;

        Ok(PngEncoder {
            pixels,
            width,
            height,
            channels,
            level: MinizDeflater::DEFAULT_LEVEL,
            row: 0,
            previous: vec![0; pitch],
            current: Vec::with_capacity(pitch),
            candidates: Default::default(),
            filtered: Vec::with_capacity((pitch + 1) * height)
        })
    }

    /// Create an encoder from zune-core options
    ///
    /// Only `ColorSpace::RGB` and `ColorSpace::RGBA` at `BitDepth::Eight` are supported
    pub fn new_with_options(
        pixels: &'a [u32], options: EncoderOptions
    ) -> Result<PngEncoder<'a>, PngEncodeErrors> {
        if options.get_depth() != BitDepth::Eight {
            return Err(PngEncodeErrors::GenericStatic(
                "Only 8 bit images can be encoded"
            ));
        }
        let channels = match options.get_colorspace() {
            ColorSpace::RGB => 3,
            ColorSpace::RGBA => 4,
            other => return Err(PngEncodeErrors::UnsupportedChannels(other.num_components()))
        };
        PngEncoder::new(pixels, options.get_width(), options.get_height(), channels)
    }

    /// Set the zlib compression level, 0 to 10, higher is smaller and slower
    pub fn set_compression_level(&mut self, level: u8) {
        self.level = level.min(10);
    }

    /// Rows filtered so far
    pub const fn rows_encoded(&self) -> usize {
        self.row
    }

    /// Filter the next row
    pub fn encode_step(&mut self) -> Result<EncodeStatus, PngEncodeErrors> {
        if self.row == self.height {
            return Ok(EncodeStatus::RowsComplete);
        }
        let start = self.row * self.width;
        let source = &self.pixels[start..start + self.width];

        self.current.clear();

        for pixel in source {
            let [r, g, b, a] = unpack_argb(*pixel);
            self.current.extend_from_slice(&[r, g, b]);

            if self.channels == 4 {
                self.current.push(a);
            }
        }
        let filter = choose_compression_filter(
            &self.previous,
            &self.current,
            &mut self.candidates,
            self.channels
        );

        self.filtered.push(filter.to_int());
        self.filtered
            .extend_from_slice(&self.candidates[usize::from(filter.to_int())]);

        core::mem::swap(&mut self.previous, &mut self.current);
        self.row += 1;

        if self.row == self.height {
            return Ok(EncodeStatus::RowsComplete);
        }
        Ok(EncodeStatus::RowEncoded)
    }

    /// Compress the filtered rows and return the complete png file
    ///
    /// # Errors
    /// If rows remain unencoded or the backend fails
    pub fn finish(&mut self) -> Result<Vec<u8>, PngEncodeErrors> {
        let mut compressor = MinizDeflater::new(self.level);
        self.finish_with_compressor(&mut compressor)
    }

    /// Same as [`finish`](Self::finish) with a caller provided zlib backend
    pub fn finish_with_compressor<C: Compressor>(
        &mut self, compressor: &mut C
    ) -> Result<Vec<u8>, PngEncodeErrors> {
        if self.row != self.height {
            return Err(PngEncodeErrors::GenericStatic(
                "Finish called before all rows were encoded"
            ));
        }
        let compressed = compress_all(compressor, &self.filtered)?;

        trace!(
            "Compressed {} filtered bytes to {} bytes",
            self.filtered.len(),
            compressed.len()
        );

        let color = if self.channels == 4 {
            PngColor::RGBA
        } else {
            PngColor::RGB
        };
        let info = PngInfo {
            width: self.width,
            height: self.height,
            depth: 8,
            color,
            interlace_method: InterlaceMethod::Standard
        };

        let mut out = Vec::with_capacity(compressed.len() + 64);

        out.extend_from_slice(&PNG_SIGNATURE);
        write_ihdr(&info, &mut out);

        // one chunk unless we exceed what a chunk length can describe
        for idat in compressed.chunks(MAX_CHUNK_LENGTH) {
            write_chunk(b"IDAT", idat, &mut out);
        }
        write_iend(&mut out);

        Ok(out)
    }

    /// Encode every remaining row and finish
    pub fn encode(&mut self) -> Result<Vec<u8>, PngEncodeErrors> {
        while self.encode_step()? != EncodeStatus::RowsComplete {}

        self.finish()
    }
}

/// Run `input` through the compressor with a final flush
fn compress_all<C: Compressor>(compressor: &mut C, input: &[u8]) -> Result<Vec<u8>, PngEncodeErrors> {
    let mut out = Vec::with_capacity(input.len() / 2 + 64);
    let mut buffer = vec![0; 1 << 15];
    let mut position = 0;

    loop {
        let step = compressor.compress(&input[position..], &mut buffer, true)?;

        position += step.consumed;
        out.extend_from_slice(&buffer[..step.produced]);

        if step.done {
            break;
        }
        if !step.made_progress() {
            return Err(PngEncodeErrors::GenericStatic(
                "Compressor stopped making progress"
            ));
        }
    }
    Ok(out)
}

/// Encode `width` by `height` packed `0xAARRGGBB` pixels into a png file
///
/// `channels` is 3 for RGB or 4 for RGBA output
pub fn encode(
    pixels: &[u32], width: usize, height: usize, channels: usize
) -> Result<Vec<u8>, PngEncodeErrors> {
    PngEncoder::new(pixels, width, height, channels)?.encode()
}
