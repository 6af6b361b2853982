use crate::level::{linear_to_db, LEVEL_FLOOR_DB};

/// Smoothing time constant for the mean-square follower. Short enough to
/// track program material, long enough to read RMS rather than peaks.
const RMS_TIME_MS: f64 = 10.0;

/// Single-pole mean-square envelope follower.
///
/// Tracks a short-term RMS-like level of the detection signal. Causal:
/// each step uses only the current sample and the previous state. Starts
/// from zero, so an all-silence input stays at the level floor.
pub struct EnvelopeDetector {
    mean_square: f64,
    coeff: f64,
}

impl EnvelopeDetector {
    pub fn new(sample_rate: u32) -> Self {
        EnvelopeDetector {
            mean_square: 0.0,
            coeff: time_constant_coeff(RMS_TIME_MS, sample_rate),
        }
    }

    /// Advances the follower by one sample and returns the current level in
    /// dBFS, floored at -100 dB.
    pub fn step(&mut self, sample: f64) -> f64 {
        let squared = sample * sample;
        self.mean_square = squared + self.coeff * (self.mean_square - squared);
        // mean-square -> RMS dB: 10*log10(ms) == 20*log10(rms)
        if self.mean_square <= 0.0 {
            LEVEL_FLOOR_DB
        } else {
            linear_to_db(self.mean_square.sqrt())
        }
    }
}

/// One-pole coefficient for a time constant in milliseconds; the response
/// covers ~63% of a step within one time constant.
pub fn time_constant_coeff(time_ms: f64, sample_rate: u32) -> f64 {
    (-1.0 / (sample_rate as f64 * time_ms / 1000.0)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_stays_at_floor() {
        let mut env = EnvelopeDetector::new(44100);
        for _ in 0..1000 {
            let level = env.step(0.0);
            assert_eq!(level, LEVEL_FLOOR_DB);
            assert!(level.is_finite());
        }
    }

    #[test]
    fn settles_near_dc_level() {
        let mut env = EnvelopeDetector::new(44100);
        let mut level = LEVEL_FLOOR_DB;
        // 0.5 amplitude DC: RMS is 0.5 -> about -6.02 dB
        for _ in 0..44100 {
            level = env.step(0.5);
        }
        assert!((level - (-6.0206)).abs() < 0.05, "level = {}", level);
    }

    #[test]
    fn rises_smoothly_on_transient() {
        let mut env = EnvelopeDetector::new(44100);
        env.step(0.0);
        // A full-scale transient must not be tracked instantaneously.
        let level = env.step(1.0);
        assert!(level < -10.0, "tracked transient too fast: {} dB", level);
    }

    #[test]
    fn monotonic_under_constant_input() {
        let mut env = EnvelopeDetector::new(44100);
        let mut prev = env.step(0.8);
        for _ in 0..500 {
            let next = env.step(0.8);
            assert!(next >= prev - 1e-9);
            prev = next;
        }
    }
}
