//! Human-readable rendering of the measurement and processing results.

use crate::audio::AudioBuffer;
use crate::dynamics::CompressionReport;
use crate::level::linear_to_db;
use crate::loudness::Measurement;
use crate::normalize::NormalizationResult;

/// Loudness-oriented statistics of one buffer.
#[derive(Clone, Copy, Debug)]
pub struct SignalStats {
    pub lufs: f64,
    pub peak_db: f64,
    pub rms_db: f64,
    pub crest_db: f64,
    pub lra_lu: f64,
}

impl SignalStats {
    pub fn from_measurement(audio: &AudioBuffer, measurement: &Measurement) -> Self {
        let peak_db = linear_to_db(audio.sample_peak());
        let rms_db = linear_to_db(audio.rms());
        SignalStats {
            lufs: measurement.integrated_lufs,
            peak_db,
            rms_db,
            crest_db: if audio.is_empty() { 0.0 } else { peak_db - rms_db },
            lra_lu: measurement.loudness_range_lu,
        }
    }
}

fn fmt_lufs(lufs: f64) -> String {
    if lufs.is_finite() {
        format!("{:.2} LUFS", lufs)
    } else {
        "-inf LUFS (silence)".to_string()
    }
}

pub fn log_signal_stats(label: &str, stats: &SignalStats) {
    log::info!("{} statistics:", label);
    log::info!("  Integrated loudness: {}", fmt_lufs(stats.lufs));
    log::info!("  Peak: {:.2} dBFS", stats.peak_db);
    log::info!("  RMS: {:.2} dBFS", stats.rms_db);
    log::info!("  Crest factor: {:.2} dB", stats.crest_db);
    log::info!("  Loudness range: {:.2} LU", stats.lra_lu);
}

pub fn log_compression(report: &CompressionReport) {
    log::info!("Compression results:");
    log::info!(
        "  Dynamic range: {:.2} dB -> {:.2} dB",
        report.input.crest_db,
        report.output.crest_db
    );
    log::info!("  Max gain reduction: {:.2} dB", report.max_reduction_db);
}

pub fn log_normalization(result: &NormalizationResult, target_lufs: f64) {
    if result.skipped {
        log::warn!("Normalization skipped: signal is silent, no loudness to normalize");
        return;
    }
    log::info!("Normalization:");
    log::info!("  Target: {:.2} LUFS", target_lufs);
    log::info!("  Makeup gain: {:+.2} dB", result.makeup_gain_db);
    if result.limited {
        log::warn!(
            "  Peak limiting applied: gain clamped to {:+.2} dB, achieved {}",
            result.applied_gain_db,
            fmt_lufs(result.achieved_lufs)
        );
    }
    log::info!("  Final peak: {:.2} dBFS", result.final_peak_dbfs);
}

/// End-of-run summary in the style of the step logging, but on stdout.
pub fn print_summary(input: &str, output: &str, before: &SignalStats, after: &SignalStats) {
    println!("Summary:");
    println!("  Input:  {}", input);
    println!("  Output: {}", output);
    println!("  LUFS:   {} -> {}", fmt_lufs(before.lufs), fmt_lufs(after.lufs));
    println!("  LRA:    {:.2} LU -> {:.2} LU", before.lra_lu, after.lra_lu);
    println!("  Peak:   {:.2} dBFS -> {:.2} dBFS", before.peak_db, after.peak_db);
}
