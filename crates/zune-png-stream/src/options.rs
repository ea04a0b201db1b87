/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::format;

use log::trace;
use zune_core::options::DecoderOptions;

use crate::enums::is_ancillary;
use crate::error::PngDecodeErrors;

/// Called for every chunk the decoder does not understand, with the
/// chunk's tag and payload
pub type UnknownChunkHandler =
    fn(chunk_type: [u8; 4], payload: &[u8]) -> Result<(), PngDecodeErrors>;

/// Skip ancillary chunks, reject critical ones
pub fn default_chunk_handler(chunk_type: [u8; 4], payload: &[u8]) -> Result<(), PngDecodeErrors> {
    let chunk_name = core::str::from_utf8(&chunk_type).unwrap_or("XXXX");

    if !is_ancillary(&chunk_type) {
        return Err(PngDecodeErrors::Generic(format!(
            "Marker {chunk_name} unknown but deemed necessary",
        )));
    }

    trace!("Encountered unknown chunk {:?}", chunk_name);
    trace!("Skipping {} bytes", payload.len());

    Ok(())
}

/// Decoder configuration
///
/// Limits and crc confirmation come from zune-core's [`DecoderOptions`].
/// Strict chunk ordering is kept here, since `DecoderOptions::get_strict_mode`
/// also reports true whenever crc confirmation is on.
#[derive(Copy, Clone)]
pub struct PngOptions {
    pub(crate) decoder:       DecoderOptions,
    pub(crate) chunk_handler: UnknownChunkHandler,
    pub(crate) strict:        bool
}

impl PngOptions {
    pub fn new(decoder: DecoderOptions) -> PngOptions {
        PngOptions {
            decoder,
            chunk_handler: default_chunk_handler,
            strict: false
        }
    }

    pub fn set_chunk_handler(mut self, handler: UnknownChunkHandler) -> PngOptions {
        self.chunk_handler = handler;
        self
    }

    /// Reject IDAT chunks separated by other chunks and IEND chunks
    /// carrying data
    ///
    /// Default is false
    pub fn set_strict_mode(mut self, yes: bool) -> PngOptions {
        self.strict = yes;
        self
    }

    pub const fn get_strict_mode(&self) -> bool {
        self.strict
    }

    pub const fn get_decoder_options(&self) -> &DecoderOptions {
        &self.decoder
    }
}

impl Default for PngOptions {
    fn default() -> Self {
        PngOptions::new(DecoderOptions::default())
    }
}

impl From<DecoderOptions> for PngOptions {
    fn from(decoder: DecoderOptions) -> Self {
        PngOptions::new(decoder)
    }
}

#[test]
fn test_default_options() {
    let options = PngOptions::default();

    assert!(!options.get_strict_mode());
    assert!(options.get_decoder_options().png_get_confirm_crc());
    // strictness of the wrapped options does not leak into chunk ordering
    assert!(!PngOptions::new(DecoderOptions::default().set_strict_mode(true)).get_strict_mode());
}
