//! K-weighting prefilter from ITU-R BS.1770: a high-frequency shelf
//! modelling the acoustic effect of the head, cascaded with a high-pass
//! (RLB) stage. Coefficients are derived for the actual sample rate from
//! the standard's reference filter definition.

use rayon::prelude::*;

/// Second-order IIR section coefficients (a0 normalized out).
#[derive(Clone, Copy, Debug)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    /// High-frequency shelf stage.
    fn shelf(rate: f64) -> Self {
        let f0 = 1681.974450955533;
        let gain_db = 3.999843853973347;
        let q = 0.7071752369554196;

        let k = f64::tan(std::f64::consts::PI * f0 / rate);
        let vh = 10.0f64.powf(gain_db / 20.0);
        let vb = vh.powf(0.4996667741545416);

        let a0 = 1.0 + k / q + k * k;
        Biquad {
            b0: (vh + vb * k / q + k * k) / a0,
            b1: 2.0 * (k * k - vh) / a0,
            b2: (vh - vb * k / q + k * k) / a0,
            a1: 2.0 * (k * k - 1.0) / a0,
            a2: (1.0 - k / q + k * k) / a0,
        }
    }

    /// RLB high-pass stage. The standard fixes the numerator at
    /// [1, -2, 1] without a0 normalization.
    fn highpass(rate: f64) -> Self {
        let f0 = 38.13547087602444;
        let q = 0.5003270373238773;

        let k = f64::tan(std::f64::consts::PI * f0 / rate);
        let a0 = 1.0 + k / q + k * k;
        Biquad {
            b0: 1.0,
            b1: -2.0,
            b2: 1.0,
            a1: 2.0 * (k * k - 1.0) / a0,
            a2: (1.0 - k / q + k * k) / a0,
        }
    }
}

/// Recursive filter delay line, one per channel per stage.
#[derive(Clone, Copy, Debug, Default)]
struct BiquadState {
    z1: f64,
    z2: f64,
}

impl BiquadState {
    // Direct form II transposed.
    #[inline]
    fn step(&mut self, c: &Biquad, x: f64) -> f64 {
        let y = c.b0 * x + self.z1;
        self.z1 = c.b1 * x - c.a1 * y + self.z2;
        self.z2 = c.b2 * x - c.a2 * y;
        y
    }
}

/// The two-stage K-weighting chain for one sample rate.
pub struct KWeighting {
    shelf: Biquad,
    highpass: Biquad,
}

impl KWeighting {
    pub fn new(sample_rate: u32) -> Self {
        let rate = sample_rate as f64;
        KWeighting {
            shelf: Biquad::shelf(rate),
            highpass: Biquad::highpass(rate),
        }
    }

    /// Filters one channel with fresh state.
    pub fn filter_channel(&self, input: &[f64]) -> Vec<f64> {
        let mut shelf_state = BiquadState::default();
        let mut hp_state = BiquadState::default();
        input
            .iter()
            .map(|&x| {
                let y = shelf_state.step(&self.shelf, x);
                hp_state.step(&self.highpass, y)
            })
            .collect()
    }

    /// Deinterleaves and filters every channel. Channels are independent,
    /// so they run in parallel.
    pub fn filter_interleaved(&self, samples: &[f32], channels: usize) -> Vec<Vec<f64>> {
        (0..channels)
            .into_par_iter()
            .map(|ch| {
                let channel: Vec<f64> = samples
                    .iter()
                    .skip(ch)
                    .step_by(channels)
                    .map(|&s| s as f64)
                    .collect();
                self.filter_channel(&channel)
            })
            .collect()
    }
}
