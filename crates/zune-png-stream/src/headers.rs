/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::format;

use log::{info, warn};

use crate::chunks::{ChunkReader, PLTEEntry, PngChunk, PngInfo};
use crate::constants::{IHDR_LENGTH, MAX_IMAGE_BYTES, MAX_PALETTE_ENTRIES};
use crate::enums::{InterlaceMethod, PngColor};
use crate::error::PngDecodeErrors;

pub mod writers;

impl ChunkReader {
    pub(crate) fn parse_ihdr(
        &mut self, chunk: PngChunk, payload: &[u8]
    ) -> Result<(), PngDecodeErrors> {
        if self.info.is_some() {
            return Err(PngDecodeErrors::GenericStatic("Multiple IHDR, corrupt PNG"));
        }
        if chunk.length != IHDR_LENGTH {
            let err = format!(
                "IHDR chunk length {} not equal to {IHDR_LENGTH}",
                chunk.length
            );
            return Err(PngDecodeErrors::Generic(err));
        }
        let width = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
        let height = u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]) as usize;

        if width == 0 {
            return Err(PngDecodeErrors::GenericStatic("Width is zero"));
        }
        if height == 0 {
            return Err(PngDecodeErrors::GenericStatic("Height is zero"));
        }

        // width * height * 4 has to fit a signed 32 bit number
        let fits = width
            .checked_mul(height)
            .and_then(|x| x.checked_mul(4))
            .map_or(false, |x| x <= MAX_IMAGE_BYTES);

        if !fits {
            return Err(PngDecodeErrors::Overflow(width, height));
        }

        let options = &self.options.decoder;

        if width > options.get_max_width() {
            let err = format!(
                "Image width {}, larger than maximum configured width {}, aborting",
                width,
                options.get_max_width()
            );
            return Err(PngDecodeErrors::Generic(err));
        }

        if height > options.get_max_height() {
            let err = format!(
                "Image height {}, larger than maximum configured height {}, aborting",
                height,
                options.get_max_height()
            );
            return Err(PngDecodeErrors::Generic(err));
        }

        let depth = payload[8];

        let color = PngColor::from_int(payload[9]).ok_or_else(|| {
            PngDecodeErrors::Generic(format!("Unknown color value {}", payload[9]))
        })?;

        if !color.is_legal_depth(depth) {
            let err = format!("Bit depth {depth} not allowed for color type {color:?}");
            return Err(PngDecodeErrors::Generic(err));
        }

        if payload[10] != 0 {
            return Err(PngDecodeErrors::GenericStatic("Unknown compression method"));
        }
        if payload[11] != 0 {
            return Err(PngDecodeErrors::GenericStatic("Unknown filter method"));
        }

        let interlace_method = InterlaceMethod::from_int(payload[12]).ok_or_else(|| {
            PngDecodeErrors::Generic(format!("Unknown interlace method {}", payload[12]))
        })?;

        info!("Width: {}", width);
        info!("Height: {}", height);
        info!("Colorspace: {:?} ", color);
        info!("Depth: {:?}", depth);
        info!("Interlace :{:?}", interlace_method);

        self.info = Some(PngInfo {
            width,
            height,
            depth,
            color,
            interlace_method
        });

        Ok(())
    }

    pub(crate) fn parse_plte(
        &mut self, chunk: PngChunk, payload: &[u8]
    ) -> Result<(), PngDecodeErrors> {
        let color = self
            .info
            .map(|x| x.color)
            .ok_or(PngDecodeErrors::GenericStatic("PLTE chunk before IHDR"))?;

        if self.seen_idat {
            return Err(PngDecodeErrors::GenericStatic("PLTE chunk after IDAT"));
        }
        if self.seen_plte {
            return Err(PngDecodeErrors::GenericStatic("Multiple PLTE chunks"));
        }
        if self.seen_trns {
            return Err(PngDecodeErrors::GenericStatic("PLTE chunk after tRNS"));
        }
        if matches!(color, PngColor::Luma | PngColor::LumaA) {
            return Err(PngDecodeErrors::GenericStatic(
                "PLTE chunk not allowed for grayscale images"
            ));
        }
        if chunk.length == 0 {
            return Err(PngDecodeErrors::GenericStatic("Empty PLTE chunk"));
        }
        if chunk.length % 3 != 0 {
            return Err(PngDecodeErrors::GenericStatic(
                "Invalid PLTE length, corrupt PNG"
            ));
        }
        if chunk.length / 3 > MAX_PALETTE_ENTRIES {
            return Err(PngDecodeErrors::GenericStatic(
                "PLTE chunk with more than 256 entries"
            ));
        }
        self.seen_plte = true;

        if color != PngColor::Palette {
            // a suggested palette for truecolor images, not needed for decoding
            warn!("Ignoring PLTE chunk in a {:?} image", color);
            return Ok(());
        }

        self.palette.clear();
        self.palette
            .extend(payload.chunks_exact(3).map(|rgb| PLTEEntry {
                red:   rgb[0],
                green: rgb[1],
                blue:  rgb[2],
                alpha: 255
            }));

        Ok(())
    }

    pub(crate) fn parse_trns(
        &mut self, chunk: PngChunk, payload: &[u8]
    ) -> Result<(), PngDecodeErrors> {
        let color = self
            .info
            .map(|x| x.color)
            .ok_or(PngDecodeErrors::GenericStatic("tRNS chunk before IHDR"))?;

        if self.seen_idat {
            return Err(PngDecodeErrors::GenericStatic("tRNS chunk after IDAT"));
        }
        if self.seen_trns {
            return Err(PngDecodeErrors::GenericStatic("Multiple tRNS chunks"));
        }
        if color.has_alpha() {
            return Err(PngDecodeErrors::GenericStatic(
                "tRNS chunk not allowed for images with an alpha channel"
            ));
        }
        self.seen_trns = true;

        match color {
            PngColor::Luma => {
                if chunk.length != 2 {
                    return Err(PngDecodeErrors::GenericStatic(
                        "tRNS chunk for grayscale images must be 2 bytes"
                    ));
                }
            }
            PngColor::RGB => {
                if chunk.length != 6 {
                    return Err(PngDecodeErrors::GenericStatic(
                        "tRNS chunk for truecolor images must be 6 bytes"
                    ));
                }
            }
            PngColor::Palette => {
                if self.palette.is_empty() {
                    return Err(PngDecodeErrors::GenericStatic("tRNS chunk before PLTE"));
                }
                if chunk.length > self.palette.len() {
                    let err = format!(
                        "tRNS chunk with {} entries, more than the {} palette entries",
                        chunk.length,
                        self.palette.len()
                    );
                    return Err(PngDecodeErrors::Generic(err));
                }
                for (entry, alpha) in self.palette.iter_mut().zip(payload) {
                    entry.alpha = *alpha;
                }
            }
            PngColor::LumaA | PngColor::RGBA => ()
        }
        Ok(())
    }

    pub(crate) fn parse_idat(
        &mut self, _chunk: PngChunk, payload: &[u8]
    ) -> Result<(), PngDecodeErrors> {
        let color = self
            .info
            .map(|x| x.color)
            .ok_or(PngDecodeErrors::GenericStatic("IDAT chunk before IHDR"))?;

        if color == PngColor::Palette && !self.seen_plte {
            return Err(PngDecodeErrors::GenericStatic(
                "Indexed image without a PLTE chunk before IDAT"
            ));
        }
        if self.idat_closed && self.options.strict {
            return Err(PngDecodeErrors::GenericStatic("IDAT chunks are not consecutive"));
        }
        self.seen_idat = true;
        self.append_compressed(payload);

        Ok(())
    }

    pub(crate) fn parse_iend(&mut self, chunk: PngChunk) -> Result<(), PngDecodeErrors> {
        if !self.seen_idat {
            return Err(PngDecodeErrors::GenericStatic("IEND chunk before any IDAT"));
        }
        if chunk.length != 0 {
            if self.options.strict {
                return Err(PngDecodeErrors::GenericStatic("IEND chunk is not empty"));
            }
            warn!("IEND chunk with {} bytes of data", chunk.length);
        }
        self.seen_iend = true;

        Ok(())
    }
}
