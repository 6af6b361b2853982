//! The processing core: validate -> compress -> measure -> normalize.
//!
//! Owns no I/O; takes a decoded buffer plus parameters and returns the
//! processed buffer with before/after statistics. Deterministic: the same
//! input always produces the same output.

use crate::audio::AudioBuffer;
use crate::dynamics::{CompressionReport, Compressor, CompressorParams};
use crate::error::Result;
use crate::loudness;
use crate::normalize::{NormalizationResult, Normalizer};
use crate::report::SignalStats;

#[derive(Clone, Copy, Debug)]
pub struct PipelineParams {
    /// Compression pass; `None` normalizes only.
    pub compressor: Option<CompressorParams>,
    /// Normalization target; `None` compresses only.
    pub target_lufs: Option<f64>,
    /// Hard sample-peak ceiling for the normalizer, dBFS.
    pub ceiling_db: f64,
}

#[derive(Clone, Debug)]
pub struct PipelineOutcome {
    pub audio: AudioBuffer,
    pub pre_stats: SignalStats,
    pub post_compression_stats: SignalStats,
    pub compression: Option<CompressionReport>,
    pub normalization: Option<NormalizationResult>,
    pub final_stats: SignalStats,
}

pub fn run(audio: AudioBuffer, params: &PipelineParams) -> Result<PipelineOutcome> {
    audio.validate()?;
    // Fail fast on parameters before any samples move.
    let compressor = params.compressor.map(Compressor::new);
    let normalizer = params
        .target_lufs
        .map(|t| Normalizer::new(t, params.ceiling_db))
        .transpose()?;

    let pre_measurement = loudness::measure(&audio);
    let pre_stats = SignalStats::from_measurement(&audio, &pre_measurement);

    let (audio, compression, post_measurement) = match compressor {
        Some(comp) => {
            let (compressed, report) = comp.compress(audio);
            let measurement = loudness::measure(&compressed);
            (compressed, Some(report), measurement)
        }
        None => (audio, None, pre_measurement),
    };
    let post_compression_stats = SignalStats::from_measurement(&audio, &post_measurement);

    let (audio, normalization) = match normalizer {
        Some(norm) => {
            let (normalized, result) = norm.normalize(audio, &post_measurement);
            (normalized, Some(result))
        }
        None => (audio, None),
    };

    // A scalar gain shifts loudness, RMS and peak by exactly its dB value
    // and leaves crest and LRA alone, so the final stats follow from the
    // post-compression measurement without a third filtering pass.
    let final_stats = match &normalization {
        Some(result) if !result.skipped => SignalStats {
            lufs: post_compression_stats.lufs + result.applied_gain_db,
            peak_db: result.final_peak_dbfs,
            rms_db: post_compression_stats.rms_db + result.applied_gain_db,
            crest_db: post_compression_stats.crest_db,
            lra_lu: post_compression_stats.lra_lu,
        },
        _ => post_compression_stats,
    };

    Ok(PipelineOutcome {
        audio,
        pre_stats,
        post_compression_stats,
        compression,
        normalization,
        final_stats,
    })
}
