//! Brute-force nearest-neighbor search over the double-precision palette.

/// Index of the first palette entry at minimal distance from `color`.
///
/// `palette` holds `N` raw (not bias-shifted) channel values per entry.
/// Each squared distance is multiplied by `scale` and truncated to `i32`
/// before comparison; entries are visited in ascending order and only a
/// strictly smaller distance replaces the current best.
///
/// # Example
///
/// ```
/// use index_color::search::nearest_brute_force;
///
/// let palette = [0.0, 0.0, 0.0, 255.0, 255.0, 255.0];
/// assert_eq!(nearest_brute_force(&palette, &[200.0, 180.0, 190.0], 1.0), 1);
/// ```
#[inline]
pub fn nearest_brute_force<const N: usize>(palette: &[f64], color: &[f64; N], scale: f64) -> usize {
    let mut min_dist = i32::MAX;
    let mut k_min = 0;
    for (k, entry) in palette.chunks_exact(N).enumerate() {
        let mut dist = 0.0;
        for (&p, &c) in entry.iter().zip(color) {
            let len = p - c;
            dist += len * len;
        }
        let dist = (dist * scale) as i32;
        if dist < min_dist {
            min_dist = dist;
            k_min = k;
        }
    }
    k_min
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_entry_wins_ties() {
        let palette = [0.0, 0.0, 0.0, 10.0, 0.0, 0.0, -10.0, 0.0, 0.0];
        assert_eq!(nearest_brute_force(&palette, &[0.0, 0.0, 0.0], 1.0), 0);
        // 10 and -10 are equidistant from 0 once entry 0 is removed
        assert_eq!(nearest_brute_force(&palette[3..], &[0.0, 0.0, 0.0], 1.0), 0);
    }

    #[test]
    fn test_four_channels() {
        let palette = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 255.0];
        assert_eq!(nearest_brute_force(&palette, &[0.0, 0.0, 0.0, 200.0], 1.0), 1);
    }

    #[test]
    fn test_eighth_scale_truncation_creates_ties() {
        // Distances 1 and 4 both truncate to 0 at scale 0.125
        let palette = [2.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        assert_eq!(nearest_brute_force(&palette, &[0.0, 0.0, 0.0], 0.125), 0);
        assert_eq!(nearest_brute_force(&palette, &[0.0, 0.0, 0.0], 1.0), 1);
    }

    #[test]
    fn test_signed_sixteen_bit_values() {
        let palette = [-32768.0, -32768.0, -32768.0, 32767.0, 32767.0, 32767.0];
        assert_eq!(nearest_brute_force(&palette, &[100.0, 50.0, 20.0], 0.125), 1);
        assert_eq!(nearest_brute_force(&palette, &[-100.0, -50.0, -20.0], 0.125), 0);
    }
}
