/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Container level parsing
//!
//! The [`ChunkReader`] receives raw container bytes in whatever pieces the
//! caller has them, splits them into chunks once a chunk is complete and keeps
//! the header, palette and concatenated IDAT payload around for the decoder.
use alloc::format;
use alloc::vec::Vec;

use log::{trace, warn};

use crate::constants::{CHUNK_OVERHEAD, MAX_CHUNK_LENGTH, PNG_SIGNATURE};
use crate::enums::{InterlaceMethod, PngChunkType, PngColor};
use crate::error::PngDecodeErrors;
use crate::options::PngOptions;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PLTEEntry {
    pub red:   u8,
    pub green: u8,
    pub blue:  u8,
    pub alpha: u8
}

impl Default for PLTEEntry {
    fn default() -> Self {
        // a tRNS chunk may contain fewer values than there are palette entries.
        // In this case, the alpha value for all remaining palette entries is assumed to be 255
        PLTEEntry {
            red:   0,
            green: 0,
            blue:  0,
            alpha: 255
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct PngChunk {
    pub length:     usize,
    pub chunk_type: PngChunkType,
    pub chunk:      [u8; 4]
}

/// Header information of a png image
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PngInfo {
    pub width:            usize,
    pub height:           usize,
    pub depth:            u8,
    pub color:            PngColor,
    pub interlace_method: InterlaceMethod
}

impl PngInfo {
    /// Bytes in one scanline `width` pixels wide, excluding the filter byte
    pub const fn bytes_per_row(&self, width: usize) -> usize {
        (width * self.color.num_components() * self.depth as usize + 7) / 8
    }

    /// Distance in bytes between a byte and the corresponding byte of the
    /// pixel to its left, used by the filters
    pub const fn filter_stride(&self) -> usize {
        let bits = self.color.num_components() * self.depth as usize;
        if bits < 8 {
            1
        } else {
            bits / 8
        }
    }

    /// Number of pixels needed to hold the decoded image
    pub const fn output_buffer_size(&self) -> usize {
        self.width * self.height
    }
}

pub(crate) struct ChunkReader {
    pub(crate) options:     PngOptions,
    /// Container bytes not yet parsed
    buffer:                 Vec<u8>,
    seen_signature:         bool,
    pub(crate) info:        Option<PngInfo>,
    pub(crate) palette:     Vec<PLTEEntry>,
    pub(crate) seen_plte:   bool,
    pub(crate) seen_trns:   bool,
    pub(crate) seen_idat:   bool,
    /// A non IDAT chunk came after the first IDAT
    pub(crate) idat_closed: bool,
    pub(crate) seen_iend:   bool,
    end_of_input:           bool,
    warned_trailing:        bool,
    idat_chunks:            Vec<u8>,
    /// Bytes of `idat_chunks` already handed to the backend
    idat_position:          usize
}

impl ChunkReader {
    pub fn new(options: PngOptions) -> ChunkReader {
        ChunkReader {
            options,
            buffer: Vec::new(),
            seen_signature: false,
            info: None,
            palette: Vec::new(),
            seen_plte: false,
            seen_trns: false,
            seen_idat: false,
            idat_closed: false,
            seen_iend: false,
            end_of_input: false,
            warned_trailing: false,
            idat_chunks: Vec::new(),
            idat_position: 0
        }
    }

    pub fn push_bytes(&mut self, data: &[u8]) {
        if self.seen_iend {
            if !data.is_empty() && !self.warned_trailing {
                warn!("Data after IEND chunk, ignoring it");
                self.warned_trailing = true;
            }
            return;
        }
        self.buffer.extend_from_slice(data);
    }

    pub fn set_end_of_input(&mut self) {
        self.end_of_input = true;
    }

    /// No more IDAT data will ever arrive
    pub const fn is_stream_ended(&self) -> bool {
        self.seen_iend || self.end_of_input
    }

    /// Compressed bytes received but not yet consumed by the backend
    pub fn compressed(&self) -> &[u8] {
        &self.idat_chunks[self.idat_position..]
    }

    pub fn consume_compressed(&mut self, bytes: usize) {
        self.idat_position = (self.idat_position + bytes).min(self.idat_chunks.len());
    }

    pub(crate) fn append_compressed(&mut self, data: &[u8]) {
        if self.idat_position > 0 {
            // drop what the backend already has
            self.idat_chunks.drain(..self.idat_position);
            self.idat_position = 0;
        }
        self.idat_chunks.extend_from_slice(data);
    }

    /// Parse every complete chunk currently buffered
    pub fn parse(&mut self) -> Result<(), PngDecodeErrors> {
        if self.seen_iend {
            return Ok(());
        }
        let buffer = core::mem::take(&mut self.buffer);
        let result = self.parse_chunks(&buffer);
        self.buffer = buffer;

        let consumed = result?;
        self.buffer.drain(..consumed);

        Ok(())
    }

    /// Returns how many bytes of `data` were fully handled
    fn parse_chunks(&mut self, data: &[u8]) -> Result<usize, PngDecodeErrors> {
        let mut position = 0;

        if !self.seen_signature {
            let available = data.len().min(PNG_SIGNATURE.len());

            if data[..available] != PNG_SIGNATURE[..available] {
                return Err(PngDecodeErrors::BadSignature);
            }
            if available < PNG_SIGNATURE.len() {
                if self.end_of_input {
                    return Err(PngDecodeErrors::BadSignature);
                }
                return Ok(0);
            }
            self.seen_signature = true;
            position += PNG_SIGNATURE.len();
        }

        while !self.seen_iend {
            let remaining = &data[position..];

            if remaining.len() < 8 {
                if self.end_of_input {
                    return Err(PngDecodeErrors::GenericStatic(
                        "Not enough bytes for chunk header, corrupt PNG"
                    ));
                }
                break;
            }
            let header = read_chunk_header(remaining)?;

            if self.info.is_none() && header.chunk_type != PngChunkType::IHDR {
                return Err(PngDecodeErrors::GenericStatic(
                    "First chunk not IHDR, Corrupt PNG"
                ));
            }
            let total = header.length + CHUNK_OVERHEAD;

            if remaining.len() < total {
                if self.end_of_input {
                    let err = format!(
                        "Not enough bytes for chunk {:?}, bytes requested are {}, but bytes present are {}",
                        header.chunk_type,
                        total,
                        remaining.len()
                    );
                    return Err(PngDecodeErrors::Generic(err));
                }
                break;
            }
            let payload = &remaining[8..8 + header.length];

            if self.options.decoder.png_get_confirm_crc() {
                let crc_bytes = &remaining[8 + header.length..total];
                let expected =
                    u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
                // crc covers the chunk type and the chunk data
                let calculated = crc32fast::hash(&remaining[4..8 + header.length]);

                if expected != calculated {
                    return Err(PngDecodeErrors::BadCrc(expected, calculated));
                }
            }
            self.dispatch(header, payload)?;

            position += total;
        }
        Ok(position)
    }

    fn dispatch(&mut self, header: PngChunk, payload: &[u8]) -> Result<(), PngDecodeErrors> {
        trace!(
            "Chunk {:?}, length {}",
            core::str::from_utf8(&header.chunk).unwrap_or("XXXX"),
            header.length
        );

        if self.seen_idat && header.chunk_type != PngChunkType::IDAT {
            self.idat_closed = true;
        }
        match header.chunk_type {
            PngChunkType::IHDR => self.parse_ihdr(header, payload),
            PngChunkType::PLTE => self.parse_plte(header, payload),
            PngChunkType::tRNS => self.parse_trns(header, payload),
            PngChunkType::IDAT => self.parse_idat(header, payload),
            PngChunkType::IEND => self.parse_iend(header),
            PngChunkType::unkn => (self.options.chunk_handler)(header.chunk, payload)
        }
    }
}

fn read_chunk_header(data: &[u8]) -> Result<PngChunk, PngDecodeErrors> {
    // Format is length - chunk type - [data] -  crc chunk
    let chunk_length = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let chunk = [data[4], data[5], data[6], data[7]];

    if chunk_length > MAX_CHUNK_LENGTH {
        return Err(PngDecodeErrors::Generic(format!(
            "Chunk length {chunk_length} larger than the allowed 2^31-1 bytes"
        )));
    }

    Ok(PngChunk {
        length: chunk_length,
        chunk_type: PngChunkType::from_tag(&chunk),
        chunk
    })
}
