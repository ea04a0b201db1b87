/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during decoding and encoding
use alloc::string::String;
use core::fmt::{Debug, Display, Formatter};

use crate::inflate::BackendError;

/// Broad classes of decode failures.
///
/// All of them are fatal, the session that produced them
/// must be discarded.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The stream does not follow the png format
    Format,
    /// Declared dimensions are too large to be represented
    Overflow,
    /// The compression backend gave up on the stream
    Backend
}

#[derive(Clone, PartialEq, Eq)]
pub enum PngDecodeErrors {
    BadSignature,
    GenericStatic(&'static str),
    Generic(String),
    /// Expected crc, calculated crc
    BadCrc(u32, u32),
    BadFilter(u8),
    /// Index found, palette length
    PaletteIndexOutOfRange(u8, usize),
    /// Width, height
    Overflow(usize, usize),
    /// Expected pixels, found pixels
    TooSmallOutput(usize, usize),
    Backend(BackendError)
}

impl PngDecodeErrors {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Overflow(..) => ErrorKind::Overflow,
            Self::Backend(_) => ErrorKind::Backend,
            _ => ErrorKind::Format
        }
    }
}

impl Debug for PngDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadSignature => writeln!(f, "Bad PNG signature, not a png"),
            Self::GenericStatic(val) => writeln!(f, "{val:?}"),
            Self::Generic(val) => writeln!(f, "{val:?}"),
            Self::BadCrc(expected, found) => writeln!(
                f,
                "CRC does not match, expected {expected} but found {found}",
            ),
            Self::BadFilter(filter) => writeln!(f, "Unknown filter type {filter}"),
            Self::PaletteIndexOutOfRange(index, len) => writeln!(
                f,
                "Palette index {index} out of range for a palette with {len} entries"
            ),
            Self::Overflow(width, height) => writeln!(
                f,
                "Image dimensions {width}x{height} overflow the maximum pixel count"
            ),
            Self::TooSmallOutput(expected, found) => writeln!(
                f,
                "Too small output, expected buffer with at least {expected} pixels but got one with {found} pixels"
            ),
            Self::Backend(err) => writeln!(f, "Error decoding idat chunks {err:?}")
        }
    }
}

impl Display for PngDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PngDecodeErrors {}

impl From<&'static str> for PngDecodeErrors {
    fn from(val: &'static str) -> Self {
        Self::GenericStatic(val)
    }
}

impl From<String> for PngDecodeErrors {
    fn from(val: String) -> Self {
        Self::Generic(val)
    }
}

impl From<BackendError> for PngDecodeErrors {
    fn from(val: BackendError) -> Self {
        Self::Backend(val)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum PngEncodeErrors {
    GenericStatic(&'static str),
    Generic(String),
    /// Width, height
    Overflow(usize, usize),
    /// Expected length, found length
    WrongInputSize(usize, usize),
    UnsupportedChannels(usize),
    Backend(BackendError)
}

impl Debug for PngEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GenericStatic(val) => writeln!(f, "{val:?}"),
            Self::Generic(val) => writeln!(f, "{val:?}"),
            Self::Overflow(width, height) => writeln!(
                f,
                "Image dimensions {width}x{height} overflow the maximum pixel count"
            ),
            Self::WrongInputSize(expected, found) => writeln!(
                f,
                "Expected an input of {expected} pixels but found {found} pixels"
            ),
            Self::UnsupportedChannels(channels) => writeln!(
                f,
                "Cannot encode images with {channels} channels, only 3 or 4 are supported"
            ),
            Self::Backend(err) => writeln!(f, "Error compressing scanlines {err:?}")
        }
    }
}

impl Display for PngEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PngEncodeErrors {}

impl From<&'static str> for PngEncodeErrors {
    fn from(val: &'static str) -> Self {
        Self::GenericStatic(val)
    }
}

impl From<String> for PngEncodeErrors {
    fn from(val: String) -> Self {
        Self::Generic(val)
    }
}

impl From<BackendError> for PngEncodeErrors {
    fn from(val: BackendError) -> Self {
        Self::Backend(val)
    }
}
