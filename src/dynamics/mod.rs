pub mod envelope;
pub mod gain;
pub mod smoother;

use crate::audio::AudioBuffer;
use crate::error::{PipelineError, Result};
use crate::level::{db_to_linear, linear_to_db};

use envelope::EnvelopeDetector;
use smoother::GainSmoother;

/// Compressor parameter bundle. Validated on construction, immutable for
/// the duration of a run.
#[derive(Clone, Copy, Debug)]
pub struct CompressorParams {
    /// Level above which gain reduction starts, dBFS.
    pub threshold_db: f64,
    /// Compression ratio, N:1. 1.0 means no compression.
    pub ratio: f64,
    /// Soft-knee width in dB; 0 is a hard knee.
    pub knee_db: f64,
    pub attack_ms: f64,
    pub release_ms: f64,
}

impl CompressorParams {
    pub fn new(
        threshold_db: f64,
        ratio: f64,
        knee_db: f64,
        attack_ms: f64,
        release_ms: f64,
    ) -> Result<Self> {
        if !ratio.is_finite() || ratio < 1.0 {
            return Err(PipelineError::invalid_parameter("ratio", ratio, "must be >= 1.0"));
        }
        if !knee_db.is_finite() || knee_db < 0.0 {
            return Err(PipelineError::invalid_parameter("knee", knee_db, "must be >= 0 dB"));
        }
        if !attack_ms.is_finite() || attack_ms <= 0.0 {
            return Err(PipelineError::invalid_parameter("attack", attack_ms, "must be > 0 ms"));
        }
        if !release_ms.is_finite() || release_ms <= 0.0 {
            return Err(PipelineError::invalid_parameter("release", release_ms, "must be > 0 ms"));
        }
        if !threshold_db.is_finite() {
            return Err(PipelineError::invalid_parameter(
                "threshold",
                threshold_db,
                "must be finite",
            ));
        }
        Ok(CompressorParams {
            threshold_db,
            ratio,
            knee_db,
            attack_ms,
            release_ms,
        })
    }
}

impl Default for CompressorParams {
    fn default() -> Self {
        CompressorParams {
            threshold_db: -20.0,
            ratio: 3.0,
            knee_db: 3.0,
            attack_ms: 5.0,
            release_ms: 50.0,
        }
    }
}

/// Peak / RMS / crest of one buffer, in dB.
#[derive(Clone, Copy, Debug, Default)]
pub struct DynamicsStats {
    pub peak_db: f64,
    pub rms_db: f64,
    /// Peak minus RMS; a rough dynamic-range figure.
    pub crest_db: f64,
}

impl DynamicsStats {
    pub fn of(audio: &AudioBuffer) -> Self {
        if audio.is_empty() {
            return DynamicsStats::default();
        }
        let peak_db = linear_to_db(audio.sample_peak());
        let rms_db = linear_to_db(audio.rms());
        DynamicsStats {
            peak_db,
            rms_db,
            crest_db: peak_db - rms_db,
        }
    }
}

/// Before/after dynamics figures for one compression pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompressionReport {
    pub input: DynamicsStats,
    pub output: DynamicsStats,
    /// Deepest smoothed gain reduction applied anywhere in the signal, dB.
    pub max_reduction_db: f64,
}

/// Dynamic-range compressor: envelope detection, soft-knee gain computer,
/// attack/release smoothing, per-frame gain application.
///
/// Channel detection is linked: one envelope is fed the loudest channel of
/// each frame, and the resulting multiplier is applied identically to every
/// channel, so the stereo image does not shift under compression. The
/// per-frame loop is strictly sequential (the smoother is recursive).
pub struct Compressor {
    params: CompressorParams,
}

impl Compressor {
    pub fn new(params: CompressorParams) -> Self {
        Compressor { params }
    }

    /// Runs one compression pass. The empty signal passes through with
    /// zero-valued statistics.
    pub fn compress(&self, mut audio: AudioBuffer) -> (AudioBuffer, CompressionReport) {
        if audio.is_empty() {
            return (audio, CompressionReport::default());
        }

        let input = DynamicsStats::of(&audio);
        let channels = audio.channels;

        let mut detector = EnvelopeDetector::new(audio.sample_rate);
        let mut smoother = GainSmoother::new(
            self.params.attack_ms,
            self.params.release_ms,
            audio.sample_rate,
        );
        let mut max_reduction_db = 0.0f64;

        for frame in audio.samples.chunks_mut(channels) {
            let detection = frame
                .iter()
                .fold(0.0f64, |max, &s| max.max(s.abs() as f64));

            let level_db = detector.step(detection);
            let target_db = gain::gain_reduction_db(level_db, &self.params);
            let smoothed_db = smoother.step(target_db);
            max_reduction_db = max_reduction_db.min(smoothed_db);

            let multiplier = db_to_linear(smoothed_db) as f32;
            for s in frame.iter_mut() {
                *s *= multiplier;
            }
        }

        let output = DynamicsStats::of(&audio);
        (
            audio,
            CompressionReport {
                input,
                output,
                max_reduction_db,
            },
        )
    }
}
