//! JSON analysis profile: per-file measurements produced by an upstream
//! analysis step, used to pick compressor parameters adapted to the
//! material. Values given explicitly in the profile's `compression` section
//! win over the adaptive suggestions derived from the metadata.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct AnalysisProfile {
    #[serde(default)]
    pub compression: CompressionSection,
    #[serde(default)]
    pub noise_reduction: NoiseReductionSection,
    #[serde(default)]
    pub voice_enhancement: VoiceEnhancementSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompressionSection {
    pub threshold: Option<f64>,
    pub ratio: Option<f64>,
    pub attack: Option<f64>,
    pub release: Option<f64>,
    /// Free-text rationale, e.g. "Large dynamic range (30.6 dB)".
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NoiseReductionSection {
    pub gate_threshold: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VoiceEnhancementSection {
    /// Free-text rationale, e.g. "Wide bandwidth (9755 Hz)".
    pub reason: Option<String>,
}

/// Numeric facts extracted from the profile.
#[derive(Debug, Default, PartialEq)]
pub struct Metadata {
    pub dynamic_range_db: Option<f64>,
    pub bandwidth_hz: Option<f64>,
    pub gate_threshold_db: Option<f64>,
}

/// Parameter suggestions derived from the metadata.
#[derive(Debug, Default, PartialEq)]
pub struct AdaptiveParams {
    pub threshold: Option<f64>,
    pub ratio: Option<f64>,
    pub attack: Option<f64>,
    pub release: Option<f64>,
}

pub fn load_profile(path: &Path) -> Result<AnalysisProfile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read analysis profile: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in analysis profile: {}", path.display()))
}

impl AnalysisProfile {
    pub fn metadata(&self) -> Metadata {
        Metadata {
            dynamic_range_db: self
                .compression
                .reason
                .as_deref()
                .and_then(|r| number_before_unit(r, "dB")),
            bandwidth_hz: self
                .voice_enhancement
                .reason
                .as_deref()
                .and_then(|r| number_before_unit(r, "Hz")),
            gate_threshold_db: self.noise_reduction.gate_threshold,
        }
    }
}

/// Suggestions matching the analysis conventions: heavier ratios for wider
/// dynamic range, threshold pinned 10 dB above the noise gate, and faster
/// time constants for wide-bandwidth material.
pub fn adaptive_params(metadata: &Metadata) -> AdaptiveParams {
    let mut params = AdaptiveParams::default();

    if let Some(dr) = metadata.dynamic_range_db {
        params.ratio = Some(if dr > 25.0 {
            4.0
        } else if dr > 15.0 {
            3.0
        } else {
            2.0
        });
    }

    if let Some(gate) = metadata.gate_threshold_db {
        params.threshold = Some(gate + 10.0);
    }

    if let Some(bw) = metadata.bandwidth_hz {
        if bw > 8000.0 {
            params.attack = Some(3.0);
            params.release = Some(40.0);
        } else {
            params.attack = Some(7.0);
            params.release = Some(60.0);
        }
    }

    params
}

/// Finds the number immediately preceding a unit token in free text, e.g.
/// "(30.6 dB)" -> 30.6 for unit "dB".
fn number_before_unit(text: &str, unit: &str) -> Option<f64> {
    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')' || c == ',')
        .filter(|t| !t.is_empty())
        .collect();
    tokens
        .windows(2)
        .find(|w| w[1] == unit)
        .and_then(|w| w[0].parse::<f64>().ok())
}
