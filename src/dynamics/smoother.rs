use super::envelope::time_constant_coeff;

/// Attack/release smoother over the gain-reduction signal.
///
/// First-order exponential filter with asymmetric time constants: moves
/// toward targets asking for more attenuation at the attack rate and toward
/// targets asking for less at the release rate. Holds one scalar state (the
/// currently applied reduction in dB) and never overshoots the target.
pub struct GainSmoother {
    state_db: f64,
    attack_coeff: f64,
    release_coeff: f64,
}

impl GainSmoother {
    pub fn new(attack_ms: f64, release_ms: f64, sample_rate: u32) -> Self {
        GainSmoother {
            state_db: 0.0,
            attack_coeff: time_constant_coeff(attack_ms, sample_rate),
            release_coeff: time_constant_coeff(release_ms, sample_rate),
        }
    }

    /// Advances one sample toward `target_db` and returns the smoothed
    /// reduction.
    pub fn step(&mut self, target_db: f64) -> f64 {
        let coeff = if target_db < self.state_db {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.state_db = target_db + coeff * (self.state_db - target_db);
        self.state_db
    }
}
