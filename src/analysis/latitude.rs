//! Minimum visibility latitude lookup.

/// Minimum latitude (degrees) by rounded index value, for index 0 through 8.
/// Index 9 and above share the last bucket.
const MIN_LATITUDE_TABLE: [i32; 10] = [67, 66, 65, 64, 62, 60, 57, 54, 51, 48];

/// Maps a geomagnetic index value to the lowest absolute latitude at which
/// aurora is expected to be visible.
///
/// The value is rounded to the nearest integer with ties away from zero
/// (6.5 → 7). Negative values fall into the 0 bucket and anything at or
/// above 8.5 into the ≥9 bucket.
pub fn minimum_latitude(index_value: f64) -> i32 {
    if index_value.is_nan() {
        return MIN_LATITUDE_TABLE[0];
    }
    let rounded = index_value.round().max(0.0);
    let bucket = (rounded as usize).min(MIN_LATITUDE_TABLE.len() - 1);
    MIN_LATITUDE_TABLE[bucket]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_index_values_match_table() {
        let expected = [(0.0, 67), (1.0, 66), (2.0, 65), (3.0, 64), (4.0, 62),
                        (5.0, 60), (6.0, 57), (7.0, 54), (8.0, 51), (9.0, 48)];
        for (index, lat) in expected {
            assert_eq!(minimum_latitude(index), lat, "index {} should map to {}°", index, lat);
        }
    }

    #[test]
    fn test_half_values_round_up() {
        // 6.50 must land in the 7 bucket, not round-half-to-even's 6.
        assert_eq!(minimum_latitude(6.5), 54);
        assert_eq!(minimum_latitude(4.5), 60);
        assert_eq!(minimum_latitude(6.49), 57);
    }

    #[test]
    fn test_values_from_eight_and_a_half_map_to_last_bucket() {
        assert_eq!(minimum_latitude(8.49), 51);
        assert_eq!(minimum_latitude(8.5), 48);
        assert_eq!(minimum_latitude(9.33), 48);
        assert_eq!(minimum_latitude(12.0), 48);
    }

    #[test]
    fn test_negative_values_clamp_to_zero_bucket() {
        assert_eq!(minimum_latitude(-0.4), 67);
        assert_eq!(minimum_latitude(-3.0), 67);
    }

    #[test]
    fn test_table_is_monotonically_decreasing() {
        for pair in MIN_LATITUDE_TABLE.windows(2) {
            assert!(pair[0] > pair[1], "table must decrease: {:?}", pair);
        }
    }
}
