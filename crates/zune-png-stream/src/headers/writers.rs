/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use crate::chunks::PngInfo;
use crate::constants::IHDR_LENGTH;

/// Append one chunk to `writer`
///
/// Format is length - chunk type - [data] -  crc chunk, where the crc
/// covers the chunk type and data but not the length
pub(crate) fn write_chunk(name: &[u8; 4], data: &[u8], writer: &mut Vec<u8>) {
    writer.extend_from_slice(&(data.len() as u32).to_be_bytes());

    let crc_start = writer.len();

    writer.extend_from_slice(name);
    writer.extend_from_slice(data);

    let crc = crc32fast::hash(&writer[crc_start..]);
    writer.extend_from_slice(&crc.to_be_bytes());
}

pub(crate) fn write_ihdr(info: &PngInfo, writer: &mut Vec<u8>) {
    let mut ihdr = [0; IHDR_LENGTH];

    // write width and height
    ihdr[0..4].copy_from_slice(&(info.width as u32).to_be_bytes());
    ihdr[4..8].copy_from_slice(&(info.height as u32).to_be_bytes());
    ihdr[8] = info.depth;
    ihdr[9] = info.color.to_int();
    // compression and filter method, only 0 exists
    ihdr[10] = 0;
    ihdr[11] = 0;
    ihdr[12] = info.interlace_method.to_int();

    write_chunk(b"IHDR", &ihdr, writer);
}

pub(crate) fn write_iend(writer: &mut Vec<u8>) {
    write_chunk(b"IEND", &[], writer);
}

#[test]
fn test_iend_crc() {
    let mut out = Vec::new();
    write_iend(&mut out);
    // every png ends with these bytes
    assert_eq!(
        out,
        [0, 0, 0, 0, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82]
    );
}
