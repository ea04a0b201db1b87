/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The compression backend
//!
//! The codec only talks to zlib streams through the [`Decompressor`] and
//! [`Compressor`] traits, which model one bounded step of an incremental
//! (de)compressor. A backend is created with `Default`, receives its input and
//! output as slices on every step and is released by dropping it.
//!
//! Backends may consume or produce fewer bytes than offered, callers must
//! look at [`StreamStep`] to know how far they actually got.
//!
//! The default implementations wrap the streaming API of `miniz_oxide`.
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use log::trace;
use miniz_oxide::deflate::core::{create_comp_flags_from_zip_params, CompressorOxide};
use miniz_oxide::inflate::stream::InflateState;
use miniz_oxide::{DataFormat, MZError, MZFlush, MZStatus, StreamResult};

/// Progress made by a single backend step
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct StreamStep {
    /// Input bytes taken by the backend
    pub consumed: usize,
    /// Output bytes written by the backend
    pub produced: usize,
    /// The end of the zlib stream was reached and all
    /// its output has been handed out
    pub done:     bool
}

impl StreamStep {
    pub const fn made_progress(&self) -> bool {
        self.consumed != 0 || self.produced != 0
    }
}

/// An unrecoverable fault reported by the backend, with
/// the backend's own description of it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BackendError {
    detail: String
}

impl BackendError {
    pub fn new<T: Into<String>>(detail: T) -> BackendError {
        BackendError {
            detail: detail.into()
        }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Incremental zlib decompression
pub trait Decompressor {
    /// Decompress as much of `input` into `output` as possible
    ///
    /// Running out of input is not an error, it shows up as a step
    /// that made no progress.
    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<StreamStep, BackendError>;
}

/// Incremental zlib compression
pub trait Compressor {
    /// Compress `input` into `output`.
    ///
    /// When `finish` is set, the backend flushes everything and terminates the
    /// stream, reporting `done` once all of it has been written out.
    fn compress(
        &mut self, input: &[u8], output: &mut [u8], finish: bool
    ) -> Result<StreamStep, BackendError>;
}

fn to_step(result: StreamResult) -> Result<StreamStep, BackendError> {
    let mut step = StreamStep {
        consumed: result.bytes_consumed,
        produced: result.bytes_written,
        done:     false
    };
    match result.status {
        Ok(MZStatus::StreamEnd) => step.done = true,
        Ok(MZStatus::Ok) => (),
        // no progress possible with what we were given, the caller
        // decides whether that's starvation or a truncated stream
        Err(MZError::Buf) => (),
        Ok(MZStatus::NeedDict) => {
            return Err(BackendError::new("zlib stream requires a preset dictionary"))
        }
        Err(err) => return Err(BackendError::new(format!("{err:?}")))
    }
    Ok(step)
}

/// Streaming zlib decoder backed by `miniz_oxide`
pub struct MinizInflater {
    state: Box<InflateState>
}

impl Default for MinizInflater {
    fn default() -> Self {
        MinizInflater {
            state: InflateState::new_boxed(DataFormat::Zlib)
        }
    }
}

impl Decompressor for MinizInflater {
    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<StreamStep, BackendError> {
        let result =
            miniz_oxide::inflate::stream::inflate(&mut self.state, input, output, MZFlush::None);

        to_step(result)
    }
}

/// Streaming zlib encoder backed by `miniz_oxide`
pub struct MinizDeflater {
    compressor: Box<CompressorOxide>
}

impl MinizDeflater {
    pub const DEFAULT_LEVEL: u8 = 6;

    /// Create a compressor for the given level, clamped to `0..=10`
    pub fn new(level: u8) -> MinizDeflater {
        let level = level.min(10);
        trace!("Creating zlib compressor with level {level}");
        // positive window bits ask for the zlib wrapper
        let flags = create_comp_flags_from_zip_params(i32::from(level), 15, 0);

        MinizDeflater {
            compressor: Box::new(CompressorOxide::new(flags))
        }
    }
}

impl Default for MinizDeflater {
    fn default() -> Self {
        MinizDeflater::new(Self::DEFAULT_LEVEL)
    }
}

impl Compressor for MinizDeflater {
    fn compress(
        &mut self, input: &[u8], output: &mut [u8], finish: bool
    ) -> Result<StreamStep, BackendError> {
        let flush = if finish { MZFlush::Finish } else { MZFlush::None };
        let result =
            miniz_oxide::deflate::stream::deflate(&mut self.compressor, input, output, flush);

        to_step(result)
    }
}

#[test]
fn test_inflate_small_output_windows() {
    let data: alloc::vec::Vec<u8> = (0..2000_u32).map(|x| (x % 251) as u8).collect();
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&data, 6);

    let mut inflater = MinizInflater::default();
    // slack so the output window is never empty
    let mut out = alloc::vec![0; data.len() + 8];
    let mut in_pos = 0;
    let mut out_pos = 0;
    let mut finished = false;

    // feed one byte, drain into 7 byte windows
    for _ in 0..100_000 {
        let end = (in_pos + 1).min(compressed.len());
        let window_end = (out_pos + 7).min(out.len());
        let step = inflater
            .decompress(&compressed[in_pos..end], &mut out[out_pos..window_end])
            .unwrap();
        in_pos += step.consumed;
        out_pos += step.produced;
        if step.done {
            finished = true;
            break;
        }
    }
    assert!(finished);
    assert_eq!(out_pos, data.len());
    assert_eq!(&out[..out_pos], &data[..]);
}

#[test]
fn test_inflate_corrupt_stream() {
    let mut inflater = MinizInflater::default();
    let mut out = [0; 64];
    // bad zlib header, check bits don't add up
    let err = inflater.decompress(&[0x78, 0x00, 0xff, 0xff], &mut out);
    assert!(err.is_err());
}
