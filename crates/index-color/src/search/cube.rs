//! Color cube indexer.
//!
//! No search happens here: the top `bits` of every bias-shifted channel are
//! packed into a direct index of a precomputed table, channel 0 in the most
//! significant position. Lookup quality depends entirely on how the table
//! was filled.

use std::collections::TryReserveError;

/// Table index of a bias-shifted color.
///
/// # Example
///
/// ```
/// use index_color::search::cube_index;
///
/// // 4 bits per channel: 0xA_, 0x5_, 0xF_ -> 0xA5F
/// assert_eq!(cube_index(&[0xA3, 0x5C, 0xF0], 8, 4), 0xA5F);
/// ```
#[inline]
pub fn cube_index<const N: usize>(color: &[u32; N], sample_bits: u32, bits: u32) -> usize {
    debug_assert!(bits >= 1 && bits <= sample_bits);
    let drop = sample_bits - bits;
    color
        .iter()
        .fold(0usize, |acc, &c| (acc << bits) | (c >> drop) as usize)
}

/// Entries in a cube table for `channels` channels at `bits` per channel.
#[inline]
pub fn cube_table_len(channels: usize, bits: u32) -> usize {
    1usize << (channels as u32 * bits)
}

/// Fill a cube table by resolving the centre of every cell with `nearest`
/// and adding `offset`.
pub fn build_cube_table<const N: usize>(
    sample_bits: u32,
    bits: u32,
    offset: u32,
    mut nearest: impl FnMut(&[u32; N]) -> u32,
) -> Result<Vec<u32>, TryReserveError> {
    let len = cube_table_len(N, bits);
    let drop = sample_bits - bits;
    let half = (1u32 << drop) >> 1;
    let mask = (1usize << bits) - 1;

    let mut table = Vec::new();
    table.try_reserve_exact(len)?;
    for cell in 0..len {
        let mut centre = [0u32; N];
        for (i, v) in centre.iter_mut().enumerate() {
            let level = (cell >> ((N - 1 - i) as u32 * bits)) & mask;
            *v = ((level as u32) << drop) + half;
        }
        table.push(nearest(&centre) + offset);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_precision_packs_bytes() {
        assert_eq!(cube_index(&[0x12, 0x34, 0x56], 8, 8), 0x123456);
        assert_eq!(cube_index(&[1, 2, 3, 4], 8, 8), 0x01020304);
    }

    #[test]
    fn test_matches_mask_and_shift_form() {
        // (c0 & 0xF0) << 4 | (c1 & 0xF0) | (c2 & 0xF0) >> 4
        for (c0, c1, c2) in [(0u32, 0u32, 0u32), (255, 128, 17), (16, 240, 255)] {
            let expected = ((c0 & 0xF0) << 4 | (c1 & 0xF0) | (c2 & 0xF0) >> 4) as usize;
            assert_eq!(cube_index(&[c0, c1, c2], 8, 4), expected);
        }
    }

    #[test]
    fn test_sixteen_bit_truncation() {
        // Bias-shifted 16-bit values keep their top bits
        assert_eq!(cube_index(&[0xFFFF, 0x0000, 0x8000], 16, 2), 0b11_00_10);
        assert_eq!(cube_index(&[0xFFC0, 0, 0], 16, 10), 0x3FF << 20);
    }

    #[test]
    fn test_one_bit_cube_cells() {
        assert_eq!(cube_table_len(3, 1), 8);
        assert_eq!(cube_index(&[200, 10, 200], 8, 1), 0b101);
    }

    #[test]
    fn test_build_table_uses_cell_centres() {
        let mut seen = Vec::new();
        let table = build_cube_table::<3>(8, 1, 5, |c| {
            seen.push(*c);
            c[0] / 128
        })
        .unwrap();
        assert_eq!(table, vec![5, 5, 5, 5, 6, 6, 6, 6]);
        assert_eq!(seen[0], [64, 64, 64]);
        assert_eq!(seen[7], [192, 192, 192]);
    }

    #[test]
    fn test_build_table_full_precision_centres_are_exact() {
        let table = build_cube_table::<3>(8, 8, 0, |c| c[2]).unwrap();
        assert_eq!(table[cube_index(&[9, 8, 7], 8, 8)], 7);
    }
}
