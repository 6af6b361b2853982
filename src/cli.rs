use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "loudpress", about = "Dynamic range compression and LUFS loudness normalization")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG, AAC)
    pub input: Option<PathBuf>,

    /// Output WAV file
    #[arg(short, long, default_value = "output.wav")]
    pub output: PathBuf,

    /// Config file path (auto-detected when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON analysis profile driving adaptive compressor parameters
    #[arg(short, long)]
    pub analysis: Option<PathBuf>,

    /// Compression threshold in dBFS
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Compression ratio (e.g. 3.0 = 3:1)
    #[arg(short, long)]
    pub ratio: Option<f64>,

    /// Attack time in milliseconds
    #[arg(long)]
    pub attack: Option<f64>,

    /// Release time in milliseconds
    #[arg(long)]
    pub release: Option<f64>,

    /// Soft knee width in dB (0 = hard knee)
    #[arg(short, long)]
    pub knee: Option<f64>,

    /// Target integrated loudness in LUFS
    #[arg(long)]
    pub target_lufs: Option<f64>,

    /// Sample peak ceiling in dBFS for the normalizer
    #[arg(long)]
    pub ceiling: Option<f64>,

    /// Skip loudness normalization (compress only)
    #[arg(long)]
    pub no_normalize: bool,

    /// Skip compression (normalize only)
    #[arg(long)]
    pub no_compress: bool,
}
