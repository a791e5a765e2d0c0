//! A single simulated point particle.

use glam::Vec3;

use crate::math::saturate;

/// One simulated point: position, velocity, age, lifetime, and a stable
/// per-particle random seed for the renderer.
///
/// Particles are owned exclusively by the [`Emitter`](crate::Emitter)
/// that spawned them and are retired once their age reaches `max_life`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// World-space position.
    pub position: Vec3,
    /// World-space velocity.
    pub velocity: Vec3,
    /// Seconds lived so far. Clamped so it never exceeds `max_life`.
    pub age: f32,
    /// Lifetime in seconds.
    pub max_life: f32,
    /// Stable random value in `[0, 1)` assigned at spawn. Renderers use
    /// it as a per-particle seed (twinkle phase, sprite pick). Immutable
    /// after creation.
    pub identity: f32,
}

impl Particle {
    /// Create a particle at `position` with zero velocity and age.
    ///
    /// Shapes call this to place a particle; the emitter then assigns
    /// `max_life`, velocity, and `identity`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            age: 0.0,
            max_life: 5.0,
            identity: 0.0,
        }
    }

    /// Age as a fraction of lifetime, in `[0, 1]`.
    #[inline]
    pub fn normalized_age(&self) -> f32 {
        if self.max_life > 0.0 {
            saturate(self.age / self.max_life)
        } else {
            1.0
        }
    }

    /// Whether this particle has reached the end of its lifetime.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.age >= self.max_life
    }
}
