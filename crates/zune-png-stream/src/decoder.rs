/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The incremental decode driver
//!
//! A [`PngStreamDecoder`] receives container bytes through
//! [`push_bytes`](PngStreamDecoder::push_bytes) and turns them into pixels
//! one row per [`decode_step`](PngStreamDecoder::decode_step) call.
//!
//! ```text
//! NotStarted -> InflateInit -> (PassInit -> RowLoop)* -> Done
//!                                 any state -> Error
//! ```
use alloc::vec;
use alloc::vec::Vec;

use log::trace;
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;

use crate::adam7::{pass_dimensions, scatter_row, ADAM7_PASSES};
use crate::chunks::{ChunkReader, PngInfo};
use crate::enums::{FilterMethod, InterlaceMethod, PngColor};
use crate::error::PngDecodeErrors;
use crate::expand::expand_scanline;
use crate::filters::de_filter_scanline;
use crate::inflate::{Decompressor, MinizInflater};
use crate::options::PngOptions;

/// Outcome of a single [`PngStreamDecoder::decode_step`] call
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecodeStatus {
    /// Not enough container or image bytes to make progress.
    ///
    /// Push more bytes and call again
    NeedMoreInput,
    /// The header and palette are known, row decoding starts with the next call
    HeadersDecoded,
    /// One row of the current pass was written to the pixel buffer
    RowReady,
    /// The last row of an interlaced pass was written, more passes follow
    PassComplete,
    /// Every pixel of the image was written
    ImageComplete
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum DecodeState {
    NotStarted,
    InflateInit,
    PassInit,
    RowLoop,
    Done,
    Error
}

/// A resumable png decoder
///
/// Output pixels are packed `0xAARRGGBB` values, see
/// [`pack_argb`](crate::pack_argb).
///
/// # Example
///
/// ```no_run
/// use zune_png_stream::{DecodeStatus, PngStreamDecoder};
///
/// let file_contents = std::fs::read("a.png").unwrap();
/// let mut decoder = PngStreamDecoder::new();
/// let mut pixels: Vec<u32> = vec![];
///
/// for piece in file_contents.chunks(4096) {
///     decoder.push_bytes(piece);
///
///     loop {
///         match decoder.decode_step(&mut pixels).unwrap() {
///             DecodeStatus::NeedMoreInput | DecodeStatus::ImageComplete => break,
///             DecodeStatus::HeadersDecoded => {
///                 let (w, h) = decoder.get_dimensions().unwrap();
///                 pixels.resize(w * h, 0);
///             }
///             _ => ()
///         }
///     }
/// }
/// ```
pub struct PngStreamDecoder<D: Decompressor = MinizInflater> {
    chunks:       ChunkReader,
    state:        DecodeState,
    error:        Option<PngDecodeErrors>,
    backend:      Option<D>,
    backend_done: bool,
    pass:         usize,
    pass_width:   usize,
    pass_height:  usize,
    /// Row within the current pass
    row:          usize,
    rows_decoded: usize,
    previous:     Vec<u8>,
    /// filter byte followed by the scanline
    current:      Vec<u8>,
    /// bytes of `current` the backend has filled in
    filled:       usize,
    /// one row of an interlaced pass before it's scattered
    pass_pixels:  Vec<u32>
}

impl PngStreamDecoder<MinizInflater> {
    pub fn new() -> PngStreamDecoder<MinizInflater> {
        PngStreamDecoder::new_with_options(PngOptions::default())
    }

    pub fn new_with_options(options: PngOptions) -> PngStreamDecoder<MinizInflater> {
        PngStreamDecoder::new_with_backend(options)
    }
}

impl Default for PngStreamDecoder<MinizInflater> {
    fn default() -> Self {
        PngStreamDecoder::new()
    }
}

impl<D: Decompressor + Default> PngStreamDecoder<D> {
    /// Create a decoder using `D` as the zlib backend
    pub fn new_with_backend(options: PngOptions) -> PngStreamDecoder<D> {
        PngStreamDecoder {
            chunks:       ChunkReader::new(options),
            state:        DecodeState::NotStarted,
            error:        None,
            backend:      None,
            backend_done: false,
            pass:         0,
            pass_width:   0,
            pass_height:  0,
            row:          0,
            rows_decoded: 0,
            previous:     Vec::new(),
            current:      Vec::new(),
            filled:       0,
            pass_pixels:  Vec::new()
        }
    }

    /// Hand the decoder more of the container
    ///
    /// Bytes are copied, the caller may reuse `data` right after
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.chunks.push_bytes(data);
    }

    /// Declare that no more bytes will be pushed
    ///
    /// From then on a truncated stream is reported as an error instead
    /// of [`DecodeStatus::NeedMoreInput`]
    pub fn end_of_input(&mut self) {
        self.chunks.set_end_of_input();
    }

    /// Header information, available once the IHDR chunk was parsed
    pub const fn get_info(&self) -> Option<PngInfo> {
        self.chunks.info
    }

    pub fn get_dimensions(&self) -> Option<(usize, usize)> {
        self.chunks.info.map(|info| (info.width, info.height))
    }

    /// Bit depth of the stored samples, the decoded pixels are always 8 bits per channel
    pub fn get_depth(&self) -> Option<BitDepth> {
        self.chunks.info.map(|info| match info.depth {
            16 => BitDepth::Sixteen,
            _ => BitDepth::Eight
        })
    }

    /// Colorspace of the stored image
    pub fn get_colorspace(&self) -> Option<ColorSpace> {
        self.chunks.info.map(|info| match info.color {
            PngColor::Luma => ColorSpace::Luma,
            PngColor::LumaA => ColorSpace::LumaA,
            PngColor::RGB => ColorSpace::RGB,
            PngColor::RGBA => ColorSpace::RGBA,
            PngColor::Palette if self.chunks.seen_trns => ColorSpace::RGBA,
            PngColor::Palette => ColorSpace::RGB
        })
    }

    /// Adam7 pass currently being decoded, always 0 for non interlaced images
    pub const fn current_pass(&self) -> usize {
        self.pass
    }

    /// Rows decoded so far, across all passes
    pub const fn rows_decoded(&self) -> usize {
        self.rows_decoded
    }

    pub fn is_complete(&self) -> bool {
        self.state == DecodeState::Done
    }

    /// Perform one bounded unit of decoding work
    ///
    /// `pixels` has to hold at least `width * height` pixels once rows start being
    /// decoded, (i.e after [`DecodeStatus::HeadersDecoded`] was returned).
    ///
    /// # Errors
    /// Any error is fatal, the same error is returned by every later call.
    pub fn decode_step(&mut self, pixels: &mut [u32]) -> Result<DecodeStatus, PngDecodeErrors> {
        match self.state {
            DecodeState::Done => return Ok(DecodeStatus::ImageComplete),
            DecodeState::Error => {
                return Err(self
                    .error
                    .clone()
                    .unwrap_or(PngDecodeErrors::GenericStatic("Decoder in error state")));
            }
            _ => ()
        }

        let result = self.step(pixels);

        if let Err(err) = &result {
            self.state = DecodeState::Error;
            self.error = Some(err.clone());
        }
        result
    }

    fn step(&mut self, pixels: &mut [u32]) -> Result<DecodeStatus, PngDecodeErrors> {
        loop {
            match self.state {
                DecodeState::NotStarted => {
                    self.chunks.parse()?;

                    if !self.chunks.seen_idat {
                        if self.chunks.is_stream_ended() {
                            return Err(PngDecodeErrors::GenericStatic(
                                "No IDAT chunks found, not enough data"
                            ));
                        }
                        return Ok(DecodeStatus::NeedMoreInput);
                    }
                    self.state = DecodeState::InflateInit;
                }
                DecodeState::InflateInit => {
                    self.backend = Some(D::default());
                    self.backend_done = false;
                    self.pass = 0;
                    self.state = DecodeState::PassInit;

                    return Ok(DecodeStatus::HeadersDecoded);
                }
                DecodeState::PassInit => {
                    let info = self.info()?;
                    self.init_pass(&info);
                    self.state = DecodeState::RowLoop;
                }
                DecodeState::RowLoop => {
                    let info = self.info()?;

                    let needed = info.output_buffer_size();
                    if pixels.len() < needed {
                        return Err(PngDecodeErrors::TooSmallOutput(needed, pixels.len()));
                    }
                    if !self.fill_row()? {
                        return Ok(DecodeStatus::NeedMoreInput);
                    }
                    self.process_row(&info, pixels)?;

                    self.filled = 0;
                    self.row += 1;
                    self.rows_decoded += 1;

                    if self.row < self.pass_height {
                        return Ok(DecodeStatus::RowReady);
                    }
                    return match next_pass(&info, self.pass + 1) {
                        Some(pass) => {
                            self.pass = pass;
                            self.state = DecodeState::PassInit;
                            Ok(DecodeStatus::PassComplete)
                        }
                        None => {
                            trace!("Finished decoding {} rows", self.rows_decoded);
                            self.state = DecodeState::Done;
                            self.backend = None;
                            Ok(DecodeStatus::ImageComplete)
                        }
                    };
                }
                DecodeState::Done => return Ok(DecodeStatus::ImageComplete),
                DecodeState::Error => {
                    return Err(PngDecodeErrors::GenericStatic("Decoder in error state"))
                }
            }
        }
    }

    fn info(&self) -> Result<PngInfo, PngDecodeErrors> {
        self.chunks
            .info
            .ok_or(PngDecodeErrors::GenericStatic("Image header not decoded"))
    }

    fn init_pass(&mut self, info: &PngInfo) {
        let (width, height) = match info.interlace_method {
            InterlaceMethod::Standard => (info.width, info.height),
            InterlaceMethod::Adam7 => {
                let (width, height) = pass_dimensions(self.pass, info.width, info.height);
                trace!("Starting adam7 pass {}, {}x{}", self.pass + 1, width, height);
                (width, height)
            }
        };
        self.pass_width = width;
        self.pass_height = height;
        self.row = 0;
        self.filled = 0;

        let pitch = info.bytes_per_row(width);

        // the row above the first row of a pass is all zeroes
        self.previous.clear();
        self.previous.resize(pitch, 0);
        self.current.resize(pitch + 1, 0);

        if info.interlace_method == InterlaceMethod::Adam7 {
            self.pass_pixels.resize(width, 0);
        }
    }

    /// Try to complete the current row from the backend.
    ///
    /// Returns false when more container bytes are needed
    fn fill_row(&mut self) -> Result<bool, PngDecodeErrors> {
        let needed = self.current.len();

        while self.filled < needed {
            self.chunks.parse()?;

            if self.backend_done {
                return Err(PngDecodeErrors::GenericStatic(
                    "Image data ended before all rows were decoded"
                ));
            }
            let backend = self
                .backend
                .as_mut()
                .ok_or(PngDecodeErrors::GenericStatic("Decompressor not initialized"))?;

            let step = backend.decompress(
                self.chunks.compressed(),
                &mut self.current[self.filled..needed]
            )?;

            self.chunks.consume_compressed(step.consumed);
            self.filled += step.produced;
            self.backend_done = step.done;

            if !step.made_progress() && !step.done {
                if self.chunks.is_stream_ended() {
                    return Err(PngDecodeErrors::GenericStatic(
                        "Premature end of image data, corrupt PNG"
                    ));
                }
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn process_row(&mut self, info: &PngInfo, pixels: &mut [u32]) -> Result<(), PngDecodeErrors> {
        let filter_byte = self.current[0];
        let filter =
            FilterMethod::from_int(filter_byte).ok_or(PngDecodeErrors::BadFilter(filter_byte))?;

        let row = &mut self.current[1..];

        de_filter_scanline(filter, &self.previous, row, info.filter_stride());
        self.previous.copy_from_slice(row);

        let palette = &self.chunks.palette;

        match info.interlace_method {
            InterlaceMethod::Standard => {
                let start = self.row * info.width;
                let out = &mut pixels[start..start + info.width];

                expand_scanline(row, info.color, info.depth, palette, out)?;
            }
            InterlaceMethod::Adam7 => {
                let out = &mut self.pass_pixels[..self.pass_width];

                expand_scanline(row, info.color, info.depth, palette, out)?;
                scatter_row(&ADAM7_PASSES[self.pass], self.row, out, pixels, info.width);
            }
        }
        Ok(())
    }
}

/// First pass at or after `from` that holds any pixels
fn next_pass(info: &PngInfo, from: usize) -> Option<usize> {
    if info.interlace_method == InterlaceMethod::Standard {
        return None;
    }
    (from..ADAM7_PASSES.len()).find(|pass| {
        let (width, height) = pass_dimensions(*pass, info.width, info.height);
        width != 0 && height != 0
    })
}

/// Create a decoder and feed it `data`, validating whichever headers
/// it contains
pub fn decode_begin(data: &[u8]) -> Result<PngStreamDecoder, PngDecodeErrors> {
    decode_begin_with_options(data, PngOptions::default())
}

pub fn decode_begin_with_options(
    data: &[u8], options: PngOptions
) -> Result<PngStreamDecoder, PngDecodeErrors> {
    let mut decoder = PngStreamDecoder::new_with_options(options);
    decoder.push_bytes(data);
    decoder.chunks.parse()?;

    Ok(decoder)
}

/// Decode a complete png file held in memory
pub fn decode(data: &[u8]) -> Result<(PngInfo, Vec<u32>), PngDecodeErrors> {
    decode_with_options(data, PngOptions::default())
}

pub fn decode_with_options(
    data: &[u8], options: PngOptions
) -> Result<(PngInfo, Vec<u32>), PngDecodeErrors> {
    let mut decoder = decode_begin_with_options(data, options)?;
    decoder.end_of_input();

    let mut pixels = vec![];

    loop {
        match decoder.decode_step(&mut pixels)? {
            DecodeStatus::HeadersDecoded => {
                let info = decoder.info()?;
                pixels = vec![0; info.output_buffer_size()];
            }
            DecodeStatus::ImageComplete => break,
            DecodeStatus::NeedMoreInput => {
                return Err(PngDecodeErrors::GenericStatic("Not enough data, corrupt PNG"));
            }
            DecodeStatus::RowReady | DecodeStatus::PassComplete => ()
        }
    }
    let info = decoder.info()?;

    Ok((info, pixels))
}
