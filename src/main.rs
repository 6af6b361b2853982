mod analysis;
mod audio;
mod cli;
mod config;
mod dynamics;
mod error;
mod level;
mod loudness;
mod normalize;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use dynamics::CompressorParams;
use pipeline::PipelineParams;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect loudpress.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("loudpress.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("loudpress").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("loudpress").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    let cfg = match config_path {
        Some(ref path) => match config::load_config(path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                config::Config::default()
            }
        },
        None => config::Config::default(),
    };

    // Optional analysis profile with adaptive parameter suggestions
    let (profile, adaptive) = match cli.analysis {
        Some(ref path) => {
            let profile = analysis::load_profile(path)?;
            let metadata = profile.metadata();
            log::info!("Analysis profile: {}", path.display());
            if let Some(dr) = metadata.dynamic_range_db {
                log::info!("  Dynamic range: {:.1} dB", dr);
            }
            if let Some(bw) = metadata.bandwidth_hz {
                log::info!("  Bandwidth: {:.0} Hz", bw);
            }
            if let Some(gate) = metadata.gate_threshold_db {
                log::info!("  Noise gate threshold: {:.1} dB", gate);
            }
            let adaptive = analysis::adaptive_params(&metadata);
            (profile, adaptive)
        }
        None => (
            analysis::AnalysisProfile::default(),
            analysis::AdaptiveParams::default(),
        ),
    };

    // Precedence: CLI flag > profile compression value > adaptive suggestion
    // > config/default.
    let threshold = cli
        .threshold
        .or(profile.compression.threshold)
        .or(adaptive.threshold)
        .unwrap_or(cfg.compressor.threshold_db);
    let ratio = cli
        .ratio
        .or(profile.compression.ratio)
        .or(adaptive.ratio)
        .unwrap_or(cfg.compressor.ratio);
    let attack = cli
        .attack
        .or(profile.compression.attack)
        .or(adaptive.attack)
        .unwrap_or(cfg.compressor.attack_ms);
    let release = cli
        .release
        .or(profile.compression.release)
        .or(adaptive.release)
        .unwrap_or(cfg.compressor.release_ms);
    let knee = cli.knee.unwrap_or(cfg.compressor.knee_db);
    let target_lufs = cli.target_lufs.unwrap_or(cfg.loudness.target_lufs);
    let ceiling_db = cli.ceiling.unwrap_or(cfg.loudness.ceiling_db);

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    log::info!("loudpress - dynamic range compression and loudness normalization");
    log::info!("Input: {}", input.display());
    log::info!("Output: {}", cli.output.display());

    // 1. Decode audio
    log::info!("Decoding audio...");
    let input_audio = audio::decode::decode_audio(input)?;
    log::info!("Duration: {:.2}s", input_audio.duration_secs());

    // 2. Assemble and validate parameters (fail fast, before processing)
    let compressor = if cli.no_compress {
        None
    } else {
        let params = CompressorParams::new(threshold, ratio, knee, attack, release)?;
        log::info!("Compressor settings:");
        log::info!("  Threshold: {} dB", params.threshold_db);
        log::info!("  Ratio: {}:1", params.ratio);
        log::info!("  Attack: {} ms", params.attack_ms);
        log::info!("  Release: {} ms", params.release_ms);
        log::info!("  Knee: {} dB", params.knee_db);
        Some(params)
    };
    let target = if cli.no_normalize {
        log::info!("Skipping loudness normalization (--no-normalize)");
        None
    } else {
        log::info!("Target loudness: {} LUFS (ceiling {} dBFS)", target_lufs, ceiling_db);
        Some(target_lufs)
    };

    // 3. Run the processing core
    log::info!("Processing...");
    let outcome = pipeline::run(
        input_audio,
        &PipelineParams {
            compressor,
            target_lufs: target,
            ceiling_db,
        },
    )?;

    // 4. Report
    report::log_signal_stats("Original", &outcome.pre_stats);
    if let Some(ref compression) = outcome.compression {
        report::log_compression(compression);
        report::log_signal_stats("Compressed", &outcome.post_compression_stats);
    }
    if let Some(ref normalization) = outcome.normalization {
        report::log_normalization(normalization, target_lufs);
    }
    report::log_signal_stats("Final", &outcome.final_stats);

    // 5. Write output
    log::info!("Writing output...");
    audio::wav::write_wav(&cli.output, &outcome.audio)?;

    report::print_summary(
        &input.display().to_string(),
        &cli.output.display().to_string(),
        &outcome.pre_stats,
        &outcome.final_stats,
    );

    log::info!("Done! Output: {}", cli.output.display());
    Ok(())
}
