//! dB <-> linear conversions shared across the pipeline.

/// Floor applied before log conversion so silence maps to a finite level.
pub const LEVEL_FLOOR_DB: f64 = -100.0;

pub fn db_to_linear(db: f64) -> f64 {
    10.0f64.powf(db / 20.0)
}

/// Amplitude to dBFS, floored at [`LEVEL_FLOOR_DB`].
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        return LEVEL_FLOOR_DB;
    }
    (20.0 * linear.log10()).max(LEVEL_FLOOR_DB)
}
