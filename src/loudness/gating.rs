//! BS.1770 gated integration and EBU R128 loudness range.
//!
//! Works on the K-weighted per-channel signal: mean-square powers over
//! overlapping blocks, channel-weighted summation, two-stage gating for the
//! integrated value, and percentile statistics over the short-term series
//! for LRA.

use rayon::prelude::*;

/// Gating block length (BS.1770).
pub const GATING_BLOCK_MS: u64 = 400;
/// Hop between gating blocks: 75% overlap.
pub const GATING_HOP_MS: u64 = 100;
/// Short-term window for the LRA series (EBU R128).
pub const SHORT_TERM_MS: u64 = 3000;
/// Blocks quieter than this never contribute.
pub const ABSOLUTE_GATE_LUFS: f64 = -70.0;
/// Relative gate sits this far below the first-stage mean.
pub const RELATIVE_GATE_LU: f64 = 10.0;
/// LRA relative gate (EBU Tech 3342).
pub const LRA_GATE_LU: f64 = 20.0;

/// BS.1770 channel weights: L/R/C at unity, surrounds at +1.5 dB. Channels
/// past the first five fall back to unity.
pub fn channel_weight(index: usize) -> f64 {
    match index {
        0 | 1 | 2 => 1.0,
        3 | 4 => 1.41,
        _ => 1.0,
    }
}

pub fn energy_to_lufs(energy: f64) -> f64 {
    if energy <= 0.0 {
        f64::NEG_INFINITY
    } else {
        -0.691 + 10.0 * energy.log10()
    }
}

fn lufs_to_energy(lufs: f64) -> f64 {
    10.0f64.powf((lufs + 0.691) / 10.0)
}

/// Channel-weighted mean-square energies over overlapping windows of the
/// K-weighted signal. Windows are order-independent, so they are computed
/// in parallel. A signal shorter than one window yields a single partial
/// window covering everything available.
pub fn window_energies(channels: &[Vec<f64>], sample_rate: u32, window_ms: u64, hop_ms: u64) -> Vec<f64> {
    let frames = channels.first().map_or(0, |c| c.len());
    if frames == 0 {
        return Vec::new();
    }

    let window = (sample_rate as u64 * window_ms / 1000) as usize;
    let hop = (sample_rate as u64 * hop_ms / 1000) as usize;
    if window == 0 || hop == 0 {
        return Vec::new();
    }

    if frames < window {
        return vec![energy_of_window(channels, 0, frames)];
    }

    let count = (frames - window) / hop + 1;
    (0..count)
        .into_par_iter()
        .map(|i| energy_of_window(channels, i * hop, window))
        .collect()
}

fn energy_of_window(channels: &[Vec<f64>], start: usize, len: usize) -> f64 {
    channels
        .iter()
        .enumerate()
        .map(|(ch, samples)| {
            let slice = &samples[start..start + len];
            let ms: f64 = slice.iter().map(|&x| x * x).sum::<f64>() / len as f64;
            channel_weight(ch) * ms
        })
        .sum()
}

/// Two-stage gated integration over 400 ms block energies: drop blocks below
/// the absolute gate, derive the relative gate from the survivors' mean, drop
/// again, and average what remains. Returns `NEG_INFINITY` when every block
/// is gated out (silence).
pub fn integrated_lufs(block_energies: &[f64]) -> f64 {
    let absolute_gate = lufs_to_energy(ABSOLUTE_GATE_LUFS);

    let above_absolute: Vec<f64> = block_energies
        .iter()
        .copied()
        .filter(|&e| e > absolute_gate)
        .collect();
    if above_absolute.is_empty() {
        return f64::NEG_INFINITY;
    }

    let first_stage_mean = above_absolute.iter().sum::<f64>() / above_absolute.len() as f64;
    let relative_gate = first_stage_mean * 10.0f64.powf(-RELATIVE_GATE_LU / 10.0);

    let survivors: Vec<f64> = above_absolute
        .iter()
        .copied()
        .filter(|&e| e > relative_gate)
        .collect();
    if survivors.is_empty() {
        return f64::NEG_INFINITY;
    }

    energy_to_lufs(survivors.iter().sum::<f64>() / survivors.len() as f64)
}

/// Loudness range per EBU Tech 3342 over the short-term loudness series:
/// absolute gate at -70 LUFS, relative gate 20 LU below the power mean of
/// the survivors, then the spread between the 10th and 95th percentiles.
pub fn loudness_range(short_term_lufs: &[f64]) -> f64 {
    let above_absolute: Vec<f64> = short_term_lufs
        .iter()
        .copied()
        .filter(|&l| l.is_finite() && l > ABSOLUTE_GATE_LUFS)
        .collect();
    if above_absolute.len() < 2 {
        return 0.0;
    }

    let mean_energy =
        above_absolute.iter().map(|&l| lufs_to_energy(l)).sum::<f64>() / above_absolute.len() as f64;
    let gate = energy_to_lufs(mean_energy) - LRA_GATE_LU;

    let mut survivors: Vec<f64> = above_absolute.into_iter().filter(|&l| l >= gate).collect();
    if survivors.len() < 2 {
        return 0.0;
    }

    survivors.sort_by(|a, b| a.partial_cmp(b).unwrap());
    percentile(&survivors, 0.95) - percentile(&survivors, 0.10)
}

/// Linear-interpolated percentile over a sorted slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = pos - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}
