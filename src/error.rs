//! Error taxonomy for the processing core.
//!
//! Validation failures abort before any processing starts; degenerate
//! loudness and peak overflow are recovered in-place by the pipeline and
//! reported as part of normal output, never through these variants.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Sample rate must be a positive number of Hz.
    #[error("Invalid sample rate: {0} Hz (must be > 0)")]
    InvalidSampleRate(u32),

    /// At least one channel is required.
    #[error("Invalid channel count: {0} (must be >= 1)")]
    InvalidChannelCount(usize),

    /// Interleaved buffer length must be a whole number of frames.
    #[error("Sample buffer length {len} is not a multiple of {channels} channels")]
    RaggedBuffer { len: usize, channels: usize },

    /// NaN or infinite amplitude in the input.
    #[error("Non-finite sample at frame {frame}, channel {channel}")]
    NonFiniteSample { frame: usize, channel: usize },

    /// A compressor or normalizer parameter is out of its documented bound.
    #[error("Invalid parameter {name} = {value} ({requirement})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        requirement: &'static str,
    },
}

impl PipelineError {
    pub fn invalid_parameter(name: &'static str, value: f64, requirement: &'static str) -> Self {
        PipelineError::InvalidParameter {
            name,
            value,
            requirement,
        }
    }
}
