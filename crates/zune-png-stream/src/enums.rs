/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::upper_case_acronyms, non_camel_case_types)]

/// Chunk types the decoder understands, see
/// table 5.3 of https://www.w3.org/TR/2003/REC-PNG-20031110/
///
/// Everything else ends up as `unkn` and is routed to the
/// unknown chunk handler
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngChunkType {
    IHDR,
    PLTE,
    IDAT,
    IEND,
    tRNS,
    unkn
}

impl PngChunkType {
    pub const fn from_tag(tag: &[u8; 4]) -> PngChunkType {
        match tag {
            b"IHDR" => Self::IHDR,
            b"PLTE" => Self::PLTE,
            b"IDAT" => Self::IDAT,
            b"IEND" => Self::IEND,
            b"tRNS" => Self::tRNS,
            _ => Self::unkn
        }
    }
}

/// Return true if a chunk's tag marks it as ancillary,
/// i.e. a decoder that doesn't understand it may skip it.
pub const fn is_ancillary(tag: &[u8; 4]) -> bool {
    tag[0] & (1 << 5) != 0
}

/// Per scanline filter types, in declaration order.
///
/// The order matters for the encoder, ties between equally scored
/// filters go to the one declared first.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterMethod {
    None,
    Sub,
    Up,
    Average,
    Paeth
}

impl FilterMethod {
    pub const ALL: [FilterMethod; 5] = [
        FilterMethod::None,
        FilterMethod::Sub,
        FilterMethod::Up,
        FilterMethod::Average,
        FilterMethod::Paeth
    ];

    pub const fn from_int(int: u8) -> Option<FilterMethod> {
        match int {
            0 => Some(FilterMethod::None),
            1 => Some(FilterMethod::Sub),
            2 => Some(FilterMethod::Up),
            3 => Some(FilterMethod::Average),
            4 => Some(FilterMethod::Paeth),
            _ => None
        }
    }

    pub const fn to_int(self) -> u8 {
        match self {
            FilterMethod::None => 0,
            FilterMethod::Sub => 1,
            FilterMethod::Up => 2,
            FilterMethod::Average => 3,
            FilterMethod::Paeth => 4
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InterlaceMethod {
    Standard,
    Adam7
}

impl InterlaceMethod {
    pub const fn from_int(int: u8) -> Option<InterlaceMethod> {
        match int {
            0 => Some(Self::Standard),
            1 => Some(Self::Adam7),
            _ => None
        }
    }

    pub const fn to_int(self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Adam7 => 1
        }
    }
}

/// The five color models a png image can be stored in
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngColor {
    Luma,
    RGB,
    Palette,
    LumaA,
    RGBA
}

impl PngColor {
    /// Number of samples making up one pixel in the
    /// stored image
    pub const fn num_components(self) -> usize {
        match self {
            PngColor::Luma => 1,
            PngColor::Palette => 1,
            PngColor::LumaA => 2,
            PngColor::RGB => 3,
            PngColor::RGBA => 4
        }
    }

    pub const fn from_int(int: u8) -> Option<PngColor> {
        match int {
            0 => Some(Self::Luma),
            2 => Some(Self::RGB),
            3 => Some(Self::Palette),
            4 => Some(Self::LumaA),
            6 => Some(Self::RGBA),
            _ => None
        }
    }

    pub const fn to_int(self) -> u8 {
        match self {
            Self::Luma => 0,
            Self::RGB => 2,
            Self::Palette => 3,
            Self::LumaA => 4,
            Self::RGBA => 6
        }
    }

    /// Whether `depth` may be paired with this color type
    ///
    /// See table 11.1 of https://www.w3.org/TR/2003/REC-PNG-20031110/
    pub const fn is_legal_depth(self, depth: u8) -> bool {
        match self {
            PngColor::Luma => matches!(depth, 1 | 2 | 4 | 8 | 16),
            PngColor::Palette => matches!(depth, 1 | 2 | 4 | 8),
            PngColor::RGB | PngColor::LumaA | PngColor::RGBA => matches!(depth, 8 | 16)
        }
    }

    /// Whether every pixel carries its own alpha sample
    pub const fn has_alpha(self) -> bool {
        matches!(self, PngColor::LumaA | PngColor::RGBA)
    }
}

#[test]
fn test_legal_depths() {
    assert!(PngColor::Luma.is_legal_depth(1));
    assert!(PngColor::Palette.is_legal_depth(4));
    assert!(!PngColor::Palette.is_legal_depth(16));
    assert!(!PngColor::RGB.is_legal_depth(4));
    assert!(!PngColor::LumaA.is_legal_depth(2));

    for depth in [0, 3, 5, 7, 9, 32] {
        assert!(!PngColor::Luma.is_legal_depth(depth));
    }
}

#[test]
fn test_alpha_color_types() {
    assert!(PngColor::LumaA.has_alpha());
    assert!(PngColor::RGBA.has_alpha());
    // palette alpha comes from tRNS
    assert!(!PngColor::Palette.has_alpha());
    assert!(!PngColor::Luma.has_alpha());
    assert!(!PngColor::RGB.has_alpha());
}

#[test]
fn test_ancillary_bit() {
    assert!(is_ancillary(b"tEXt"));
    assert!(is_ancillary(b"gAMA"));
    assert!(!is_ancillary(b"IDAT"));
    assert!(!is_ancillary(b"ABCD"));
}
