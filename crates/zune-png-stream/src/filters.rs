/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Scanline filters
//!
//! De-filtering works in place, the row holds the filtered bytes on entry
//! and the reconstructed bytes on exit. The previous row is always a real
//! buffer of the same length, callers zero it for the first row of a pass
//! so no special first-row variants are needed.
//!
//! `components` is the predictor step, bytes between a pixel and its
//! left neighbour, it is at least 1 even for sub-byte depths.
use alloc::vec::Vec;

use crate::enums::FilterMethod;

/// Undo `filter` for `row` in place using the reconstructed `prev_row`
pub fn de_filter_scanline(
    filter: FilterMethod, prev_row: &[u8], row: &mut [u8], components: usize
) {
    match filter {
        FilterMethod::None => (),
        FilterMethod::Sub => handle_sub(row, components),
        FilterMethod::Up => handle_up(prev_row, row),
        FilterMethod::Average => handle_avg(prev_row, row, components),
        FilterMethod::Paeth => handle_paeth(prev_row, row, components)
    }
}

pub fn handle_sub(row: &mut [u8], components: usize) {
    // leftmost pixel has nothing to its left, so it stays as is
    for i in components..row.len() {
        let a = row[i - components];
        row[i] = row[i].wrapping_add(a);
    }
}

pub fn handle_up(prev_row: &[u8], row: &mut [u8]) {
    for (recon, up) in row.iter_mut().zip(prev_row) {
        *recon = recon.wrapping_add(*up);
    }
}

pub fn handle_avg(prev_row: &[u8], row: &mut [u8], components: usize) {
    let end = row.len().min(prev_row.len());
    let start = components.min(end);

    // handle leftmost pixel explicitly
    for i in 0..start {
        row[i] = row[i].wrapping_add(prev_row[i] >> 1);
    }
    for i in start..end {
        let a = row[i - components];
        let b = prev_row[i];

        // average without overflowing 8 bits, from stanford bit-hacks
        let c = (a & b) + ((a ^ b) >> 1);

        row[i] = row[i].wrapping_add(c);
    }
}

pub fn handle_paeth(prev_row: &[u8], row: &mut [u8], components: usize) {
    let end = row.len().min(prev_row.len());
    let start = components.min(end);

    // with no left pixel, paeth(0, b, 0) is always b
    for i in 0..start {
        row[i] = row[i].wrapping_add(prev_row[i]);
    }
    for i in start..end {
        let paeth_res = paeth(row[i - components], prev_row[i], prev_row[i - components]);
        row[i] = row[i].wrapping_add(paeth_res);
    }
}

/// The paeth predictor, picks whichever of `a` (left), `b` (above) or `c` (above left) is
/// closest to `a + b - c`, preferring them in that order on ties
#[inline(always)]
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let a = i16::from(a);
    let b = i16::from(b);
    let c = i16::from(c);
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();

    if pa <= pb && pa <= pc {
        return a as u8;
    }
    if pb <= pc {
        return b as u8;
    }
    c as u8
}

/// Apply `filter` to `current` writing the result to `out`
///
/// This is the forward direction of [`de_filter_scanline`], predictions are
/// subtracted instead of added.
pub fn filter_scanline(
    filter: FilterMethod, previous: &[u8], current: &[u8], out: &mut [u8], components: usize
) {
    let width = current.len().min(out.len()).min(previous.len());

    for i in 0..width {
        let a = if i >= components { current[i - components] } else { 0 };
        let b = previous[i];
        let c = if i >= components { previous[i - components] } else { 0 };

        let prediction = match filter {
            FilterMethod::None => 0,
            FilterMethod::Sub => a,
            FilterMethod::Up => b,
            FilterMethod::Average => ((u16::from(a) + u16::from(b)) >> 1) as u8,
            FilterMethod::Paeth => paeth(a, b, c)
        };
        out[i] = current[i].wrapping_sub(prediction);
    }
}

/// Sum of absolute values of the bytes treated as signed, a cheap
/// estimate of how well a row will compress. Lower is better
pub fn score_filtered(row: &[u8]) -> u64 {
    row.iter()
        .map(|x| u64::from((*x as i8).unsigned_abs()))
        .sum()
}

/// Pick the filter producing the lowest scoring row
///
/// Every candidate ends up in `candidates`, indexed by the filter's numeric value,
/// so the winner can be copied out without filtering again.
/// Ties go to the filter declared first in [`FilterMethod`].
pub fn choose_compression_filter(
    previous: &[u8], current: &[u8], candidates: &mut [Vec<u8>; 5], components: usize
) -> FilterMethod {
    let mut best = FilterMethod::None;
    let mut best_score = u64::MAX;

    for (filter, candidate) in FilterMethod::ALL.iter().zip(candidates.iter_mut()) {
        candidate.resize(current.len(), 0);
        filter_scanline(*filter, previous, current, candidate, components);

        let score = score_filtered(candidate);

        if score < best_score {
            best_score = score;
            best = *filter;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use nanorand::{Rng, WyRand};

    use super::*;

    #[test]
    fn test_paeth_ties() {
        assert_eq!(paeth(10, 10, 10), 10);
        // p = -255, a and b are both at distance 255, c at 510
        assert_eq!(paeth(0, 0, 255), 0);
        // p lands exactly on c
        assert_eq!(paeth(3, 5, 4), 4);
        assert_eq!(paeth(100, 20, 20), 100);
        assert_eq!(paeth(20, 100, 20), 100);
    }

    #[test]
    fn test_filter_inverse_law() {
        let mut rng = WyRand::new_seed(0x1234);

        for components in [1, 2, 3, 4, 6, 8] {
            for length in [1, 2, 7, 24, 97] {
                let mut previous = vec![0_u8; length];
                let mut current = vec![0_u8; length];
                rng.fill(&mut previous);
                rng.fill(&mut current);

                for filter in FilterMethod::ALL {
                    let mut filtered = vec![0; length];
                    filter_scanline(filter, &previous, &current, &mut filtered, components);
                    de_filter_scanline(filter, &previous, &mut filtered, components);

                    assert_eq!(
                        filtered, current,
                        "{filter:?} with {components} components and {length} bytes"
                    );
                }
            }
        }
    }

    #[test]
    fn test_sub_wraps_around() {
        let mut row = [200, 100, 0xff, 1];
        handle_sub(&mut row, 2);
        // 0xff + 200 and 1 + 100 modulo 256
        assert_eq!(row, [200, 100, 199, 101]);
    }

    #[test]
    fn test_avg_left_edge() {
        let prev = [255, 255, 255];
        let mut row = [1, 1, 1];
        handle_avg(&prev, &mut row, 1);
        // first byte: 1 + 255/2, then (128 + 255) / 2 = 191 + 1
        assert_eq!(row[0], 128);
        assert_eq!(row[1], 192);
    }

    #[test]
    fn test_choose_none_for_flat_rows() {
        let previous = vec![0; 12];
        let current = vec![0; 12];
        let mut candidates: [Vec<u8>; 5] = Default::default();

        let filter = choose_compression_filter(&previous, &current, &mut candidates, 3);
        assert_eq!(filter, FilterMethod::None);
    }

    #[test]
    fn test_choose_sub_for_gradient() {
        let previous = vec![0; 16];
        let current: Vec<u8> = (0..16).map(|x| x * 10).collect();
        let mut candidates: [Vec<u8>; 5] = Default::default();

        let filter = choose_compression_filter(&previous, &current, &mut candidates, 1);
        // sub and paeth both give [0, 10, 10, ...], sub is declared first
        assert_eq!(filter, FilterMethod::Sub);
        assert_eq!(candidates[1][1..], [10; 15]);
    }

    #[test]
    fn test_choose_up_for_repeated_rows() {
        let previous: Vec<u8> = (0..16).map(|x| (x * 37) as u8).collect();
        let current = previous.clone();
        let mut candidates: [Vec<u8>; 5] = Default::default();

        let filter = choose_compression_filter(&previous, &current, &mut candidates, 4);
        assert_eq!(filter, FilterMethod::Up);
        assert!(candidates[2].iter().all(|x| *x == 0));
    }

    #[test]
    fn test_score_is_signed() {
        assert_eq!(score_filtered(&[0xff, 0x01, 0x80, 0x7f]), 1 + 1 + 128 + 127);
    }
}
