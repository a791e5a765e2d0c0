//! Error types for flurry.
//!
//! Everything that can fail does so at configuration time: building an
//! emitter or a keyframe curve. Once construction succeeds, the per-step
//! simulation path is pure arithmetic over validated inputs and has no
//! failure surface.

use std::fmt;

/// Errors raised when validating emitter configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Emission rate must be positive and finite; its reciprocal is the
    /// per-particle spawn interval.
    EmissionRate(f32),
    /// Particle lifetime must be positive.
    MaxLife(f32),
    /// An attractor's falloff radius must be positive; it divides the
    /// distance in the falloff term.
    AttractorRadius {
        /// Position of the offending attractor in the configured list.
        index: usize,
        /// The rejected radius.
        radius: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmissionRate(rate) => write!(
                f,
                "emission rate must be a positive number of particles per second, got {}",
                rate
            ),
            ConfigError::MaxLife(life) => {
                write!(f, "particle lifetime must be positive, got {} seconds", life)
            }
            ConfigError::AttractorRadius { index, radius } => write!(
                f,
                "attractor {} has non-positive falloff radius {}",
                index, radius
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised when building a keyframe curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveError {
    /// A curve needs at least one keyframe.
    Empty,
    /// Keyframe times must be strictly increasing.
    NonIncreasing {
        /// Index of the first keyframe that fails to increase.
        index: usize,
    },
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveError::Empty => write!(f, "a curve needs at least one keyframe"),
            CurveError::NonIncreasing { index } => write!(
                f,
                "keyframe {} does not come strictly after its predecessor",
                index
            ),
        }
    }
}

impl std::error::Error for CurveError {}
