pub mod decode;
pub mod wav;

use crate::error::{PipelineError, Result};

/// A fully materialized multichannel signal: interleaved f32 frames in
/// [-1.0, 1.0] plus the sample rate. Each pipeline stage takes ownership of
/// the buffer it transforms and hands a new one downstream.
#[derive(Clone, Debug)]
pub struct AudioBuffer {
    /// Interleaved samples, `frames * channels` long.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: usize) -> Self {
        AudioBuffer {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / self.sample_rate as f64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Boundary validation: positive sample rate, at least one channel, a
    /// whole number of frames, and every sample finite. An empty buffer is
    /// valid (the pipeline passes it through unchanged).
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(PipelineError::InvalidSampleRate(self.sample_rate));
        }
        if self.channels == 0 {
            return Err(PipelineError::InvalidChannelCount(self.channels));
        }
        if self.samples.len() % self.channels != 0 {
            return Err(PipelineError::RaggedBuffer {
                len: self.samples.len(),
                channels: self.channels,
            });
        }
        for (i, &s) in self.samples.iter().enumerate() {
            if !s.is_finite() {
                return Err(PipelineError::NonFiniteSample {
                    frame: i / self.channels,
                    channel: i % self.channels,
                });
            }
        }
        Ok(())
    }

    /// Largest absolute sample value, linear scale.
    pub fn sample_peak(&self) -> f64 {
        self.samples
            .iter()
            .fold(0.0f64, |max, &s| max.max(s.abs() as f64))
    }

    /// Whole-signal RMS across all channels, linear scale.
    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.samples.iter().map(|&s| s as f64 * s as f64).sum();
        (sum_sq / self.samples.len() as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_clean_buffer() {
        let buf = AudioBuffer::new(vec![0.1, -0.2, 0.3, -0.4], 48000, 2);
        assert!(buf.validate().is_ok());
        assert_eq!(buf.frames(), 2);
    }

    #[test]
    fn empty_buffer_is_valid() {
        let buf = AudioBuffer::new(vec![], 44100, 1);
        assert!(buf.validate().is_ok());
        assert_eq!(buf.frames(), 0);
        assert_eq!(buf.sample_peak(), 0.0);
        assert_eq!(buf.rms(), 0.0);
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let buf = AudioBuffer::new(vec![0.0], 0, 1);
        assert!(matches!(
            buf.validate(),
            Err(PipelineError::InvalidSampleRate(0))
        ));
    }

    #[test]
    fn rejects_zero_channels() {
        let buf = AudioBuffer::new(vec![], 44100, 0);
        assert!(matches!(
            buf.validate(),
            Err(PipelineError::InvalidChannelCount(0))
        ));
    }

    #[test]
    fn rejects_non_finite_sample_with_location() {
        let buf = AudioBuffer::new(vec![0.0, 0.0, f32::NAN, 0.0], 44100, 2);
        match buf.validate() {
            Err(PipelineError::NonFiniteSample { frame, channel }) => {
                assert_eq!(frame, 1);
                assert_eq!(channel, 0);
            }
            other => panic!("expected NonFiniteSample, got {:?}", other),
        }
    }

    #[test]
    fn rejects_ragged_buffer() {
        let buf = AudioBuffer::new(vec![0.0, 0.0, 0.0], 44100, 2);
        assert!(matches!(
            buf.validate(),
            Err(PipelineError::RaggedBuffer { len: 3, channels: 2 })
        ));
    }

    #[test]
    fn peak_and_rms() {
        let buf = AudioBuffer::new(vec![0.5, -0.8, 0.1, 0.0], 44100, 1);
        assert!((buf.sample_peak() - 0.8).abs() < 1e-9);
        let expected = ((0.25 + 0.64 + 0.01) / 4.0f64).sqrt();
        assert!((buf.rms() - expected).abs() < 1e-6);
    }
}
