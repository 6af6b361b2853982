use super::CompressorParams;

/// Soft-knee gain computer: maps an input level in dBFS to the gain
/// reduction in dB that the compressor curve asks for. Pure function of the
/// parameters; always <= 0.
///
/// Below `threshold - knee/2` no reduction is applied, above
/// `threshold + knee/2` the full ratio applies, and inside the knee a
/// quadratic ramp keeps both the value and the slope continuous at the
/// knee edges. A zero knee degenerates to a hard corner at the threshold.
pub fn gain_reduction_db(level_db: f64, params: &CompressorParams) -> f64 {
    let slope = 1.0 - 1.0 / params.ratio;
    let knee_start = params.threshold_db - params.knee_db / 2.0;
    let knee_end = params.threshold_db + params.knee_db / 2.0;

    if level_db < knee_start {
        0.0
    } else if level_db > knee_end {
        -(level_db - params.threshold_db) * slope
    } else if params.knee_db > 0.0 {
        let overshoot = level_db - knee_start;
        -slope * overshoot * overshoot / (2.0 * params.knee_db)
    } else {
        // knee == 0 and level == threshold exactly
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(threshold_db: f64, ratio: f64, knee_db: f64) -> CompressorParams {
        CompressorParams::new(threshold_db, ratio, knee_db, 5.0, 50.0).unwrap()
    }

    #[test]
    fn no_reduction_below_knee() {
        let p = params(-20.0, 4.0, 6.0);
        assert_eq!(gain_reduction_db(-40.0, &p), 0.0);
        assert_eq!(gain_reduction_db(-23.1, &p), 0.0);
    }

    #[test]
    fn full_ratio_above_knee() {
        let p = params(-20.0, 4.0, 0.0);
        // 10 dB over threshold at 4:1 -> 7.5 dB of reduction
        let gr = gain_reduction_db(-10.0, &p);
        assert!((gr - (-7.5)).abs() < 1e-9, "gr = {}", gr);
    }

    #[test]
    fn never_amplifies() {
        let p = params(-20.0, 4.0, 6.0);
        let mut level = -100.0;
        while level <= 20.0 {
            assert!(gain_reduction_db(level, &p) <= 0.0, "level {}", level);
            level += 0.1;
        }
    }

    #[test]
    fn continuous_at_knee_edges() {
        let p = params(-20.0, 4.0, 6.0);
        let eps = 1e-6;
        for edge in [-23.0, -17.0] {
            let below = gain_reduction_db(edge - eps, &p);
            let above = gain_reduction_db(edge + eps, &p);
            assert!((below - above).abs() < 1e-4, "value jump at {}", edge);
        }
    }

    #[test]
    fn slope_continuous_at_knee_edges() {
        let p = params(-20.0, 4.0, 6.0);
        let h = 1e-4;
        for edge in [-23.0, -17.0] {
            let slope_below =
                (gain_reduction_db(edge, &p) - gain_reduction_db(edge - h, &p)) / h;
            let slope_above =
                (gain_reduction_db(edge + h, &p) - gain_reduction_db(edge, &p)) / h;
            assert!(
                (slope_below - slope_above).abs() < 1e-2,
                "slope jump at {}: {} vs {}",
                edge,
                slope_below,
                slope_above
            );
        }
    }

    #[test]
    fn hard_knee_has_corner_at_threshold() {
        let p = params(-20.0, 2.0, 0.0);
        assert_eq!(gain_reduction_db(-20.0, &p), 0.0);
        let just_above = gain_reduction_db(-19.9, &p);
        assert!((just_above - (-0.05)).abs() < 1e-9);
    }

    #[test]
    fn knee_midpoint_matches_quadratic() {
        let p = params(-20.0, 4.0, 6.0);
        // At threshold (knee midpoint): -(1-1/4) * 3^2 / 12 = -0.5625
        let gr = gain_reduction_db(-20.0, &p);
        assert!((gr - (-0.5625)).abs() < 1e-9, "gr = {}", gr);
    }

    #[test]
    fn unity_ratio_is_transparent() {
        let p = params(-20.0, 1.0, 6.0);
        for level in [-40.0, -20.0, -5.0, 0.0] {
            assert_eq!(gain_reduction_db(level, &p), 0.0);
        }
    }
}
