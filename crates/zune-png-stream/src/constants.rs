/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Bytes in a chunk that aren't payload, length + type + crc
pub const CHUNK_OVERHEAD: usize = 12;

/// Largest chunk length the format allows, 2^31-1
pub const MAX_CHUNK_LENGTH: usize = (1 << 31) - 1;

/// Upper bound for `width * height * 4`, a 31 bit signed value.
pub const MAX_IMAGE_BYTES: usize = i32::MAX as usize;

pub const IHDR_LENGTH: usize = 13;

pub const MAX_PALETTE_ENTRIES: usize = 256;
