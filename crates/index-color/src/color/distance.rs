//! Squared Euclidean color distance.
//!
//! Both operands are bias-shifted unsigned channel values. Each squared
//! channel difference is shifted right by `shift` before summation, which
//! keeps 16-bit four-channel sums inside `u32`.

/// Squared distance between two colors, `Σ ((a_i - b_i)^2 >> shift)`.
///
/// The sum saturates at `u32::MAX`, which only happens for 16-bit
/// channels compared with `shift == 0`.
///
/// # Example
///
/// ```
/// use index_color::distance;
///
/// assert_eq!(distance(&[130, 130, 131], &[130, 130, 130], 0), 1);
/// assert_eq!(distance(&[0, 0, 0, 0], &[4, 4, 4, 4], 2), 16);
/// ```
#[inline]
pub fn distance<const N: usize>(a: &[u32; N], b: &[u32; N], shift: u32) -> u32 {
    let mut sum = 0u64;
    for i in 0..N {
        sum += plane_distance(a[i], b[i], shift);
    }
    sum.min(u32::MAX as u64) as u32
}

/// One distance term, computed wide so that plane tests against
/// `COLOR_MAX` (one past the last channel value) cannot overflow.
#[inline]
pub fn plane_distance(a: u32, b: u32, shift: u32) -> u64 {
    let d = a.abs_diff(b) as u64;
    (d * d) >> shift
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_distance_three_channels() {
        assert_eq!(distance(&[0, 0, 0], &[3, 4, 0], 0), 25);
    }

    #[test]
    fn test_distance_shift_applies_per_term() {
        // (3^2 >> 2) + (3^2 >> 2) = 2 + 2, not (9 + 9) >> 2 = 4
        assert_eq!(distance(&[0, 0, 0], &[3, 3, 0], 2), 4);
        assert_eq!(distance(&[0, 0, 0], &[1, 1, 1], 2), 0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = [10, 200, 33, 7];
        let b = [250, 1, 90, 7];
        for shift in 0..4 {
            assert_eq!(distance(&a, &b, shift), distance(&b, &a, shift));
        }
    }

    #[test]
    fn test_distance_16bit_four_channels_fits() {
        let a = [0, 0, 0, 0];
        let b = [65535, 65535, 65535, 65535];
        assert_eq!(distance(&a, &b, 2), 4 * ((65535u64 * 65535) >> 2) as u32);
    }

    #[test]
    fn test_plane_distance_at_color_max() {
        assert_eq!(plane_distance(65536, 0, 0), 65536u64 * 65536);
    }
}
