//! Spawn-volume shapes for emitters.
//!
//! A shape decides where a freshly spawned particle starts; the emitter
//! assigns velocity and identity afterwards. The emitter depends only on
//! the [`EmitterShape`] capability, so new volumes slot in without any
//! emitter changes.
//!
//! | Shape | Spawn volume |
//! |-------|--------------|
//! | [`PointShape`] | Fixed point, optional spherical jitter |
//! | [`PlaneShape`] | Rectangle in a transformed XZ plane |

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec2, Vec3};

use crate::particle::Particle;
use crate::spawn::SpawnContext;

/// Capability for producing a spawn position within some volume.
pub trait EmitterShape {
    /// Construct a particle positioned within the shape's volume.
    ///
    /// Velocity and identity are assigned later by the emitter, so
    /// implementations only place the particle.
    fn emit(&self, ctx: &mut SpawnContext) -> Particle;
}

/// Emit from a fixed point, optionally jittered within a spherical
/// radius.
///
/// The jitter draws a direction over the sphere and a radius uniformly
/// in `[0, radius_variance)`. That stacks density toward the outer shell
/// rather than filling the ball uniformly; renderers built against this
/// engine expect exactly that distribution.
#[derive(Debug, Clone)]
pub struct PointShape {
    /// Spawn position.
    pub position: Vec3,
    /// Maximum radial displacement. Zero emits exactly at `position`.
    pub radius_variance: f32,
}

impl PointShape {
    /// A point shape at `position` with no jitter.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            radius_variance: 0.0,
        }
    }

    /// Set the spherical jitter radius.
    pub fn with_radius_variance(mut self, radius_variance: f32) -> Self {
        self.radius_variance = radius_variance;
        self
    }
}

impl Default for PointShape {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl EmitterShape for PointShape {
    fn emit(&self, ctx: &mut SpawnContext) -> Particle {
        let phi = ctx.random() * TAU;
        let theta = ctx.random() * PI;
        let radius = ctx.random() * self.radius_variance;

        let dir = Vec3::new(
            theta.sin() * phi.cos(),
            theta.cos(),
            theta.sin() * phi.sin(),
        );
        Particle::at(self.position + dir * radius)
    }
}

/// Emit uniformly from a rectangle in the shape's local XZ plane.
///
/// Positions are drawn from `[-x, x] × [-y, y]` (half-extents in
/// `dimensions`) at local `y = 0`, then carried into world space by
/// `transform`. A snowfall plane is the canonical use: wide, high up,
/// facing down.
#[derive(Debug, Clone)]
pub struct PlaneShape {
    /// Half-extents of the rectangle in local X and Z.
    pub dimensions: Vec2,
    /// Local-to-world affine transform.
    pub transform: Mat4,
}

impl PlaneShape {
    pub fn new(dimensions: Vec2, transform: Mat4) -> Self {
        Self {
            dimensions,
            transform,
        }
    }
}

impl EmitterShape for PlaneShape {
    fn emit(&self, ctx: &mut SpawnContext) -> Particle {
        let local = Vec3::new(
            ctx.random_range(-self.dimensions.x, self.dimensions.x),
            0.0,
            ctx.random_range(-self.dimensions.y, self.dimensions.y),
        );
        Particle::at(self.transform.transform_point3(local))
    }
}
