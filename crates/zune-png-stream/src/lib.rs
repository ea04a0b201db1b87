/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A resumable png decoder and encoder
//!
//! This crate decodes ISO/IEC 15948:2003 (E) png images one row at a time,
//! from bytes the caller pushes in whatever pieces it has them, e.g straight
//! from a socket. Nothing blocks and nothing is read from files, each call to
//! [`decode_step`](PngStreamDecoder::decode_step) does a bounded amount of work
//! and reports what it did.
//!
//! # Features
//! - Every color type and bit depth, including Adam7 interlaced images
//! - Palette transparency via `tRNS`
//! - Output as packed `0xAARRGGBB` pixels, 16 bit samples keep their high byte
//! - A pluggable zlib backend, `miniz_oxide` by default
//! - An RGB/RGBA encoder with adaptive per-row filtering
//!
//! # Usage
//! Add the library to `Cargo.toml`
//!
//! ```toml
//! zune-png-stream = "0.1"
//! ```
//!
//! #### Decode a complete file
//!
//! ```no_run
//! let data = std::fs::read("a.png").unwrap();
//! let (info, pixels) = zune_png_stream::decode(&data).unwrap();
//!
//! assert_eq!(pixels.len(), info.width * info.height);
//! ```
//!
//! #### Decode incrementally
//!
//! See [`PngStreamDecoder`] for the full loop.
//!
//! #### Encode
//!
//! ```
//! use zune_png_stream::{decode, encode, pack_argb};
//!
//! let pixels = vec![pack_argb(255, 0, 0, 255); 16 * 16];
//! let png = encode(&pixels, 16, 16, 3).unwrap();
//!
//! assert_eq!(decode(&png).unwrap().1, pixels);
//! ```
//!
//! # Configuration
//! Limits and crc confirmation are set through
//! [`DecoderOptions`](zune_core::options::DecoderOptions), wrapped in [`PngOptions`],
//! which also carries strict chunk ordering and the unknown chunk handler.
//!
//! # Alternatives
//! - [png](https://crates.io/crates/png) crate
//! - [zune-png](https://crates.io/crates/zune-png) for a faster whole image decoder
#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::op_ref, clippy::identity_op)]
extern crate alloc;

pub use adam7::{pass_dimensions, Adam7Pass, ADAM7_PASSES};
pub use chunks::{PLTEEntry, PngInfo};
pub use decoder::{
    decode, decode_begin, decode_begin_with_options, decode_with_options, DecodeStatus,
    PngStreamDecoder
};
pub use encoder::{encode, EncodeStatus, PngEncoder};
pub use enums::{FilterMethod, InterlaceMethod, PngColor};
pub use error::{ErrorKind, PngDecodeErrors, PngEncodeErrors};
pub use expand::{pack_argb, unpack_argb};
pub use inflate::{BackendError, Compressor, Decompressor, MinizDeflater, MinizInflater, StreamStep};
pub use options::{default_chunk_handler, PngOptions, UnknownChunkHandler};
pub use zune_core;

mod adam7;
mod chunks;
mod constants;
mod decoder;
mod encoder;
mod enums;
pub mod error;
mod expand;
pub mod filters;
mod headers;
pub mod inflate;
mod options;
