use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compressor: CompressorConfig,
    #[serde(default)]
    pub loudness: LoudnessConfig,
}

#[derive(Debug, Deserialize)]
pub struct CompressorConfig {
    #[serde(default = "default_threshold_db")]
    pub threshold_db: f64,
    #[serde(default = "default_ratio")]
    pub ratio: f64,
    #[serde(default = "default_knee_db")]
    pub knee_db: f64,
    #[serde(default = "default_attack_ms")]
    pub attack_ms: f64,
    #[serde(default = "default_release_ms")]
    pub release_ms: f64,
}

#[derive(Debug, Deserialize)]
pub struct LoudnessConfig {
    #[serde(default = "default_target_lufs")]
    pub target_lufs: f64,
    #[serde(default = "default_ceiling_db")]
    pub ceiling_db: f64,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            threshold_db: default_threshold_db(),
            ratio: default_ratio(),
            knee_db: default_knee_db(),
            attack_ms: default_attack_ms(),
            release_ms: default_release_ms(),
        }
    }
}

impl Default for LoudnessConfig {
    fn default() -> Self {
        Self {
            target_lufs: default_target_lufs(),
            ceiling_db: default_ceiling_db(),
        }
    }
}

fn default_threshold_db() -> f64 { -20.0 }
fn default_ratio() -> f64 { 3.0 }
fn default_knee_db() -> f64 { 3.0 }
fn default_attack_ms() -> f64 { 5.0 }
fn default_release_ms() -> f64 { 50.0 }
fn default_target_lufs() -> f64 { -16.0 }
fn default_ceiling_db() -> f64 { 0.0 }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.compressor.threshold_db, -20.0);
        assert_eq!(cfg.compressor.ratio, 3.0);
        assert_eq!(cfg.loudness.target_lufs, -16.0);
        assert_eq!(cfg.loudness.ceiling_db, 0.0);
    }

    #[test]
    fn partial_config_fills_missing_fields() {
        let cfg: Config = toml::from_str(
            r#"
            [compressor]
            ratio = 4.0

            [loudness]
            target_lufs = -23.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.compressor.ratio, 4.0);
        assert_eq!(cfg.compressor.attack_ms, 5.0);
        assert_eq!(cfg.loudness.target_lufs, -23.0);
        assert_eq!(cfg.loudness.ceiling_db, 0.0);
    }
}
