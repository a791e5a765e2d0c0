//! # Flurry
//!
//! CPU particle simulation engine for real-time effects.
//!
//! Flurry spawns, ages, force-integrates, and retires large numbers of
//! lightweight point particles, and produces compact per-frame
//! attribute buffers a renderer can consume directly. It owns the
//! simulation only: cameras, shaders, textures, and windowing belong to
//! the host.
//!
//! ## Quick Start
//!
//! ```
//! use flurry::prelude::*;
//!
//! // A gentle snowfall: particles shed from a jittered point, dragged
//! // and pulled down by gravity.
//! let params = EmitterParams::new()
//!     .with_shape(PointShape::new(Vec3::new(0.0, 10.0, 0.0)).with_radius_variance(2.0))
//!     .with_emission_rate(200.0)
//!     .with_max_particles(2_000)
//!     .with_max_emission(u32::MAX)
//!     .with_max_life(6.0)
//!     .with_gravity(true)
//!     .with_drag_coefficient(2.0)
//!     .with_seed(7);
//!
//! let mut system = ParticleSystem::new();
//! system.add_emitter(Emitter::new(params).unwrap());
//!
//! // Host loop: one step per frame tick.
//! system.step(1.0 / 60.0, 0.0);
//! assert!(system.still_active());
//! ```
//!
//! ## Core Concepts
//!
//! ### Emitters
//!
//! An [`Emitter`] owns a bounded particle pool. Each step it spends an
//! accumulated emission budget on new particles, integrates gravity,
//! drag, and [`ParticleAttractor`] forces, retires particles whose age
//! reached their lifetime, and publishes the survivors to an attached
//! [`AttributeSink`]. A [`ParticleSystem`] steps a collection of
//! emitters and reaps the finished ones.
//!
//! ### Shapes
//!
//! Spawn positions come from an [`EmitterShape`]: a point with optional
//! spherical jitter, a transformed plane, or anything you implement.
//! The emitter only calls `emit`.
//!
//! ### Over-life curves
//!
//! Time-varying parameters (size, color, alpha over a particle's life)
//! are authored as piecewise-linear [`Interpolant`] curves and baked
//! once into uniform [`BakedTable`] lookup buffers the host uploads as
//! 1D textures:
//!
//! ```
//! use flurry::{Interpolant, Keyframe, Vec3};
//!
//! let color = Interpolant::new(vec![
//!     Keyframe::new(0.0, Vec3::ONE),
//!     Keyframe::new(5.0, Vec3::new(0.5, 0.7, 1.0)),
//! ]).unwrap();
//! let alpha = Interpolant::new(vec![
//!     Keyframe::new(0.0, 1.0_f32),
//!     Keyframe::new(5.0, 0.0),
//! ]).unwrap();
//!
//! let table = color.bake_with_alpha(&alpha);
//! assert_eq!(table.channels(), 4);
//! ```
//!
//! ### Determinism
//!
//! Everything is single-threaded and synchronous: one
//! [`step`](ParticleSystem::step) per external frame tick. Seed an
//! emitter with [`EmitterParams::with_seed`] and replaying the same
//! step sequence reproduces bit-identical trajectories.
//!
//! ## Feature Overview
//!
//! | Concern | Types |
//! |---------|-------|
//! | Simulation | [`ParticleSystem`], [`Emitter`], [`Particle`] |
//! | Configuration | [`EmitterParams`], [`ParticleAttractor`] |
//! | Spawn volumes | [`EmitterShape`], [`PointShape`], [`PlaneShape`] |
//! | Curves | [`Interpolant`], [`Keyframe`], [`BakedTable`] |
//! | Renderer feed | [`AttributeSink`], [`ParticleAttributes`], [`SinkUniforms`] |
//! | Host timing | [`Time`] |

mod emitter;
pub mod error;
mod interpolant;
pub mod math;
mod particle;
mod shape;
mod simulation;
mod sink;
mod spawn;
pub mod time;

pub use bytemuck;
pub use emitter::{Emitter, EmitterParams, ParticleAttractor, ParticleHook};
pub use error::{ConfigError, CurveError};
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use interpolant::{BakedTable, Interpolant, Interpolate, Keyframe, DEFAULT_RESOLUTION_HINT};
pub use particle::Particle;
pub use shape::{EmitterShape, PlaneShape, PointShape};
pub use simulation::ParticleSystem;
pub use sink::{pack_attributes, AttributeSink, ParticleAttributes, SinkUniforms};
pub use spawn::SpawnContext;
pub use time::Time;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```
/// use flurry::prelude::*;
/// ```
pub mod prelude {
    pub use crate::emitter::{Emitter, EmitterParams, ParticleAttractor};
    pub use crate::error::{ConfigError, CurveError};
    pub use crate::interpolant::{BakedTable, Interpolant, Keyframe};
    pub use crate::particle::Particle;
    pub use crate::shape::{EmitterShape, PlaneShape, PointShape};
    pub use crate::simulation::ParticleSystem;
    pub use crate::sink::{AttributeSink, ParticleAttributes, SinkUniforms};
    pub use crate::spawn::SpawnContext;
    pub use crate::time::Time;
    pub use crate::{Mat4, Quat, Vec2, Vec3, Vec4};
}
