pub mod gating;
pub mod kweight;

use crate::audio::AudioBuffer;
use crate::level::linear_to_db;

use gating::{GATING_BLOCK_MS, GATING_HOP_MS, SHORT_TERM_MS};
use kweight::KWeighting;

/// One-shot BS.1770 loudness measurement of a buffer. The meter keeps no
/// state across calls; every invocation filters and integrates from scratch.
#[derive(Clone, Debug)]
pub struct Measurement {
    /// Gated integrated loudness; `NEG_INFINITY` for silent or fully gated
    /// material.
    pub integrated_lufs: f64,
    /// 3-second short-term loudness series (100 ms hop).
    pub short_term_lufs: Vec<f64>,
    /// Loudness range over the short-term series, LU.
    pub loudness_range_lu: f64,
    /// Sample peak in dBFS. Stands in for true peak; no oversampling.
    pub sample_peak_dbfs: f64,
}

impl Measurement {
    /// True when the signal produced no usable loudness blocks; the
    /// normalizer must skip rather than derive a gain from this.
    pub fn is_silent(&self) -> bool {
        !self.integrated_lufs.is_finite()
    }
}

/// Measures integrated loudness, the short-term series, LRA, and sample
/// peak of one buffer.
pub fn measure(audio: &AudioBuffer) -> Measurement {
    if audio.is_empty() {
        return Measurement {
            integrated_lufs: f64::NEG_INFINITY,
            short_term_lufs: Vec::new(),
            loudness_range_lu: 0.0,
            sample_peak_dbfs: linear_to_db(0.0),
        };
    }

    let kweighting = KWeighting::new(audio.sample_rate);
    let weighted = kweighting.filter_interleaved(&audio.samples, audio.channels);

    let block_energies =
        gating::window_energies(&weighted, audio.sample_rate, GATING_BLOCK_MS, GATING_HOP_MS);
    let integrated_lufs = gating::integrated_lufs(&block_energies);

    let short_term_lufs: Vec<f64> =
        gating::window_energies(&weighted, audio.sample_rate, SHORT_TERM_MS, GATING_HOP_MS)
            .into_iter()
            .map(gating::energy_to_lufs)
            .collect();
    let loudness_range_lu = gating::loudness_range(&short_term_lufs);

    log::debug!(
        "Loudness: {} gating blocks, {} short-term windows",
        block_energies.len(),
        short_term_lufs.len()
    );

    Measurement {
        integrated_lufs,
        short_term_lufs,
        loudness_range_lu,
        sample_peak_dbfs: linear_to_db(audio.sample_peak()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::db_to_linear;

    fn sine_buffer(freq: f64, amplitude: f64, secs: f64, sample_rate: u32, channels: usize) -> AudioBuffer {
        let n = (secs * sample_rate as f64) as usize;
        let mut samples = Vec::with_capacity(n * channels);
        for i in 0..n {
            let v = (amplitude
                * (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin())
                as f32;
            for _ in 0..channels {
                samples.push(v);
            }
        }
        AudioBuffer::new(samples, sample_rate, channels)
    }

    #[test]
    fn full_scale_sine_calibration() {
        // BS.1770 calibration point: a 0 dBFS 997 Hz sine in a single
        // channel reads -3.01 LKFS.
        let audio = sine_buffer(997.0, 1.0, 5.0, 48000, 1);
        let m = measure(&audio);
        assert!(
            (m.integrated_lufs - (-3.01)).abs() < 0.1,
            "integrated {}",
            m.integrated_lufs
        );
        assert!((m.sample_peak_dbfs - 0.0).abs() < 0.01);
    }

    #[test]
    fn stereo_doubles_energy() {
        let mono = measure(&sine_buffer(997.0, 0.5, 5.0, 48000, 1));
        let stereo = measure(&sine_buffer(997.0, 0.5, 5.0, 48000, 2));
        let diff = stereo.integrated_lufs - mono.integrated_lufs;
        assert!((diff - 3.01).abs() < 0.05, "diff {}", diff);
    }

    #[test]
    fn silence_yields_sentinel() {
        let audio = AudioBuffer::new(vec![0.0; 48000], 48000, 1);
        let m = measure(&audio);
        assert!(m.is_silent());
        assert_eq!(m.integrated_lufs, f64::NEG_INFINITY);
        assert_eq!(m.loudness_range_lu, 0.0);
    }

    #[test]
    fn empty_signal_yields_sentinel() {
        let m = measure(&AudioBuffer::new(vec![], 44100, 2));
        assert!(m.is_silent());
        assert!(m.short_term_lufs.is_empty());
    }

    #[test]
    fn scalar_gain_shifts_loudness_by_its_db_value() {
        let audio = sine_buffer(997.0, 0.25, 4.0, 44100, 1);
        let base = measure(&audio);

        let gain = db_to_linear(6.0) as f32;
        let boosted = AudioBuffer::new(
            audio.samples.iter().map(|&s| s * gain).collect(),
            audio.sample_rate,
            audio.channels,
        );
        let shifted = measure(&boosted);
        let diff = shifted.integrated_lufs - base.integrated_lufs;
        assert!((diff - 6.0).abs() < 0.05, "diff {}", diff);
    }

    #[test]
    fn short_signal_still_integrates() {
        // 150 ms, shorter than one 400 ms gating block.
        let audio = sine_buffer(997.0, 0.5, 0.15, 48000, 1);
        let m = measure(&audio);
        assert!(m.integrated_lufs.is_finite(), "got {}", m.integrated_lufs);
        // Too short for any 3 s window.
        assert!(m.short_term_lufs.len() <= 1);
        assert_eq!(m.loudness_range_lu, 0.0);
    }

    #[test]
    fn gating_ignores_long_silence() {
        // 4 s of tone followed by 8 s of silence: the gated measurement
        // should stay near the tone-only loudness instead of averaging the
        // silence in.
        let sr = 48000;
        let tone = sine_buffer(997.0, 0.3, 4.0, sr, 1);
        let tone_only = measure(&tone).integrated_lufs;

        let mut samples = tone.samples.clone();
        samples.extend(vec![0.0f32; sr as usize * 8]);
        let padded = measure(&AudioBuffer::new(samples, sr, 1));
        assert!(
            (padded.integrated_lufs - tone_only).abs() < 0.3,
            "tone {} padded {}",
            tone_only,
            padded.integrated_lufs
        );
    }

    #[test]
    fn lra_tracks_level_contrast() {
        // 6 s at -30-ish and 6 s at -10-ish: LRA should land near 20 LU.
        let sr = 44100;
        let quiet = sine_buffer(440.0, db_to_linear(-30.0) * std::f64::consts::SQRT_2, 6.0, sr, 1);
        let loud = sine_buffer(440.0, db_to_linear(-10.0) * std::f64::consts::SQRT_2, 6.0, sr, 1);
        let mut samples = quiet.samples;
        samples.extend(loud.samples);
        let m = measure(&AudioBuffer::new(samples, sr, 1));
        assert!(
            (m.loudness_range_lu - 20.0).abs() < 2.0,
            "lra {}",
            m.loudness_range_lu
        );
    }
}
