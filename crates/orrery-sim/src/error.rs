//! Simulation construction errors.

/// Errors raised while building bodies from static parameters.
///
/// The per-frame update itself cannot fail; every check happens here, once.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// Semi-major axis must be strictly positive and finite.
    #[error("body '{name}' has invalid semi-major axis {value} AU")]
    InvalidSemiMajorAxis { name: String, value: f64 },

    /// Visual radius must be strictly positive and finite.
    #[error("body '{name}' has invalid visual radius {value}")]
    InvalidVisualRadius { name: String, value: f64 },

    /// Distance scale must be strictly positive and finite.
    #[error("distance scale must be positive, got {0}")]
    InvalidDistanceScale(f64),

    /// Initial angle must be finite.
    #[error("body '{name}' has non-finite initial angle")]
    InvalidInitialAngle { name: String },

    /// Speedup factor must be finite and not negative.
    #[error("speedup factor must be finite and non-negative, got {0}")]
    InvalidSpeedup(f64),

    /// Spin rates must be finite.
    #[error("{body} spin rate must be finite, got {value}")]
    InvalidSpinRate { body: &'static str, value: f64 },
}
