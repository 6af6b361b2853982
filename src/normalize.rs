//! Loudness normalization: makeup gain toward the target LUFS, with a hard
//! sample-peak ceiling as the last line of defense.

use crate::audio::AudioBuffer;
use crate::error::{PipelineError, Result};
use crate::level::{db_to_linear, linear_to_db};
use crate::loudness::Measurement;

/// Outcome of one normalization pass.
#[derive(Clone, Copy, Debug)]
pub struct NormalizationResult {
    /// Gain the target asked for, dB.
    pub makeup_gain_db: f64,
    /// Gain actually applied after the ceiling clamp, dB.
    pub applied_gain_db: f64,
    /// Whether the ceiling clamp reduced the gain.
    pub limited: bool,
    /// Whether normalization ran at all (false for silent input).
    pub skipped: bool,
    /// Integrated loudness after the applied gain. Below target when
    /// limiting occurred.
    pub achieved_lufs: f64,
    /// Sample peak of the output, dBFS.
    pub final_peak_dbfs: f64,
}

impl NormalizationResult {
    fn skipped_for_silence(peak_dbfs: f64) -> Self {
        NormalizationResult {
            makeup_gain_db: 0.0,
            applied_gain_db: 0.0,
            limited: false,
            skipped: true,
            achieved_lufs: f64::NEG_INFINITY,
            final_peak_dbfs: peak_dbfs,
        }
    }
}

pub struct Normalizer {
    target_lufs: f64,
    ceiling_db: f64,
}

impl Normalizer {
    pub fn new(target_lufs: f64, ceiling_db: f64) -> Result<Self> {
        if !target_lufs.is_finite() {
            return Err(PipelineError::invalid_parameter(
                "target_lufs",
                target_lufs,
                "must be finite",
            ));
        }
        if !ceiling_db.is_finite() || ceiling_db > 0.0 {
            return Err(PipelineError::invalid_parameter(
                "ceiling",
                ceiling_db,
                "must be finite and <= 0 dBFS",
            ));
        }
        Ok(Normalizer {
            target_lufs,
            ceiling_db,
        })
    }

    /// Applies makeup gain `target - measured` as one linear multiplier.
    /// If the result would poke above the ceiling, the gain is reduced so
    /// the sample peak lands exactly on it; that clamp is a scalar, not a
    /// limiter with look-ahead. Silent input is passed through untouched
    /// and the skip is reported.
    pub fn normalize(
        &self,
        mut audio: AudioBuffer,
        measurement: &Measurement,
    ) -> (AudioBuffer, NormalizationResult) {
        if measurement.is_silent() || audio.is_empty() {
            let peak = linear_to_db(audio.sample_peak());
            return (audio, NormalizationResult::skipped_for_silence(peak));
        }

        let makeup_gain_db = self.target_lufs - measurement.integrated_lufs;

        // Clamp against the ceiling before touching the samples: the peak
        // after a scalar gain is just peak * gain.
        let peak = audio.sample_peak();
        let ceiling = db_to_linear(self.ceiling_db);
        let requested = db_to_linear(makeup_gain_db);
        let (gain, limited) = if peak * requested > ceiling {
            (ceiling / peak, true)
        } else {
            (requested, false)
        };
        let applied_gain_db = 20.0 * gain.log10();

        let gain = gain as f32;
        for s in audio.samples.iter_mut() {
            *s *= gain;
        }

        let result = NormalizationResult {
            makeup_gain_db,
            applied_gain_db,
            limited,
            skipped: false,
            // A scalar gain shifts integrated loudness by exactly its dB
            // value, so no second measurement pass is needed.
            achieved_lufs: measurement.integrated_lufs + applied_gain_db,
            final_peak_dbfs: linear_to_db(audio.sample_peak()),
        };
        (audio, result)
    }
}
