//! Emitters: particle pools, emission-rate control, and force
//! integration.
//!
//! An [`Emitter`] owns a bounded pool of [`Particle`]s and advances it
//! once per host frame. Each step it spends the accumulated emission
//! budget on new particles, integrates gravity, drag, and attractor
//! forces over the pool, retires particles that aged out, and publishes
//! the survivors to an attached [`AttributeSink`].
//!
//! # Lifecycle
//!
//! | State | Meaning |
//! |-------|---------|
//! | Active | Spawn budget remains; spawning and simulating |
//! | Draining | Budget spent (or [`stop`](Emitter::stop) called), survivors aging out |
//! | Dead | Killed, or drained to zero particles; permanent |
//!
//! # Example
//!
//! ```
//! use flurry::{Emitter, EmitterParams, PointShape, Vec3};
//!
//! let params = EmitterParams::new()
//!     .with_shape(PointShape::new(Vec3::ZERO))
//!     .with_emission_rate(10.0)
//!     .with_max_particles(5)
//!     .with_max_emission(1_000)
//!     .with_seed(1);
//!
//! let mut emitter = Emitter::new(params).unwrap();
//! emitter.step(1.0, 1.0);
//! // Rate allows 10 spawns, the pool caps it at 5.
//! assert_eq!(emitter.particles().len(), 5);
//! ```

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use crate::error::ConfigError;
use crate::math::GRAVITY;
use crate::particle::Particle;
use crate::shape::{EmitterShape, PointShape};
use crate::sink::{pack_attributes, AttributeSink, ParticleAttributes, SinkUniforms};
use crate::spawn::SpawnContext;

/// A point force source with an inverse-square-like falloff.
///
/// The force on a particle at distance `d` has magnitude
/// `intensity / (1 + (d / radius)^2)` toward `position`. It is finite
/// everywhere, including at the attractor itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleAttractor {
    /// World-space position particles are pulled toward.
    pub position: Vec3,
    /// Peak force magnitude, reached at distance zero.
    pub intensity: f32,
    /// Falloff radius; the force halves at `d = radius`. Must be
    /// positive.
    pub radius: f32,
}

impl ParticleAttractor {
    pub fn new(position: Vec3, intensity: f32, radius: f32) -> Self {
        Self {
            position,
            intensity,
            radius,
        }
    }

    /// Force this attractor exerts on a particle at `point`.
    fn force_at(&self, point: Vec3) -> Vec3 {
        let offset = self.position - point;
        let distance = offset.length();
        let falloff = self.intensity / (1.0 + (distance / self.radius).powi(2));
        // A particle sitting exactly on the attractor has no direction
        // to be pulled in; the zero vector keeps the math finite.
        offset.normalize_or_zero() * falloff
    }
}

/// Hook invoked with a particle at a lifecycle event.
pub type ParticleHook = Box<dyn FnMut(&mut Particle)>;

/// Emitter configuration.
///
/// A plain options object: every field is public, and `with_*` methods
/// chain for the common construction path. Hand the finished params to
/// [`Emitter::new`], which validates them.
pub struct EmitterParams {
    /// Lifetime assigned to each spawned particle, seconds. Must be
    /// positive.
    pub max_life: f32,
    /// Base spawn speed.
    pub velocity_magnitude: f32,
    /// Uniform +/- variance applied to the spawn speed.
    pub velocity_magnitude_variance: f32,
    /// Orientation applied to each spawn direction.
    pub rotation: Quat,
    /// Polar half-angle of the spawn cone, radians. Zero fires straight
    /// along the rotated up-axis; pi covers the full sphere.
    pub rotation_angular_variance: f32,
    /// Pool capacity. Spawning defers while the pool is full.
    pub max_particles: usize,
    /// Total spawn budget across the emitter's life. `u32::MAX` for
    /// endless emission.
    pub max_emission: u32,
    /// Particles per second. Must be positive.
    pub emission_rate: f32,
    /// Whether gravity acts on this emitter's particles.
    pub gravity: bool,
    /// Multiplier on the gravity vector.
    pub gravity_strength: f32,
    /// Linear drag: force `-drag_coefficient * velocity`.
    pub drag_coefficient: f32,
    /// Published to the sink for renderers that spin their sprites.
    pub spin_speed: f32,
    /// Point force sources. Order is irrelevant; forces sum.
    pub attractors: Vec<ParticleAttractor>,
    /// Spawn-position volume.
    pub shape: Box<dyn EmitterShape>,
    /// Seed for the emitter's random draws. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Fires once per particle immediately after spawn.
    pub on_created: Option<ParticleHook>,
    /// Fires once per particle per step, after integration.
    pub on_step: Option<ParticleHook>,
    /// Fires exactly once per particle when it is retired or the
    /// emitter is disposed.
    pub on_destroy: Option<ParticleHook>,
    /// Renderer feed. `None` simulates without publishing.
    pub sink: Option<Box<dyn AttributeSink>>,
}

impl Default for EmitterParams {
    fn default() -> Self {
        Self {
            max_life: 5.0,
            velocity_magnitude: 0.0,
            velocity_magnitude_variance: 0.0,
            rotation: Quat::IDENTITY,
            rotation_angular_variance: 0.0,
            max_particles: 100,
            max_emission: 100,
            emission_rate: 1.0,
            gravity: false,
            gravity_strength: 1.0,
            drag_coefficient: 0.5,
            spin_speed: 0.0,
            attractors: Vec::new(),
            shape: Box::new(PointShape::default()),
            seed: None,
            on_created: None,
            on_step: None,
            on_destroy: None,
            sink: None,
        }
    }
}

impl EmitterParams {
    /// Default configuration: a point emitter at the origin, one
    /// particle per second, five-second lifetimes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spawn-position volume.
    pub fn with_shape(mut self, shape: impl EmitterShape + 'static) -> Self {
        self.shape = Box::new(shape);
        self
    }

    /// Set the per-particle lifetime in seconds.
    pub fn with_max_life(mut self, max_life: f32) -> Self {
        self.max_life = max_life;
        self
    }

    /// Set the emission rate in particles per second.
    pub fn with_emission_rate(mut self, emission_rate: f32) -> Self {
        self.emission_rate = emission_rate;
        self
    }

    /// Set the pool capacity.
    pub fn with_max_particles(mut self, max_particles: usize) -> Self {
        self.max_particles = max_particles;
        self
    }

    /// Set the lifetime spawn budget. `u32::MAX` for endless emission.
    pub fn with_max_emission(mut self, max_emission: u32) -> Self {
        self.max_emission = max_emission;
        self
    }

    /// Set the base spawn speed.
    pub fn with_velocity_magnitude(mut self, velocity_magnitude: f32) -> Self {
        self.velocity_magnitude = velocity_magnitude;
        self
    }

    /// Set the uniform +/- variance on the spawn speed.
    pub fn with_velocity_magnitude_variance(mut self, variance: f32) -> Self {
        self.velocity_magnitude_variance = variance;
        self
    }

    /// Set the orientation applied to spawn directions.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the spawn-cone half-angle in radians.
    pub fn with_rotation_angular_variance(mut self, variance: f32) -> Self {
        self.rotation_angular_variance = variance;
        self
    }

    /// Enable or disable gravity.
    pub fn with_gravity(mut self, gravity: bool) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the gravity multiplier.
    pub fn with_gravity_strength(mut self, gravity_strength: f32) -> Self {
        self.gravity_strength = gravity_strength;
        self
    }

    /// Set the linear drag coefficient.
    pub fn with_drag_coefficient(mut self, drag_coefficient: f32) -> Self {
        self.drag_coefficient = drag_coefficient;
        self
    }

    /// Set the spin speed published to the sink.
    pub fn with_spin_speed(mut self, spin_speed: f32) -> Self {
        self.spin_speed = spin_speed;
        self
    }

    /// Add a point force source.
    pub fn with_attractor(mut self, attractor: ParticleAttractor) -> Self {
        self.attractors.push(attractor);
        self
    }

    /// Seed the emitter's random draws for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Hook fired once per particle immediately after spawn.
    pub fn with_on_created<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Particle) + 'static,
    {
        self.on_created = Some(Box::new(hook));
        self
    }

    /// Hook fired once per particle per step, after integration.
    pub fn with_on_step<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Particle) + 'static,
    {
        self.on_step = Some(Box::new(hook));
        self
    }

    /// Hook fired exactly once per particle when it is destroyed.
    pub fn with_on_destroy<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Particle) + 'static,
    {
        self.on_destroy = Some(Box::new(hook));
        self
    }

    /// Attach the renderer feed.
    pub fn with_sink(mut self, sink: impl AttributeSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.emission_rate.is_finite() && self.emission_rate > 0.0) {
            return Err(ConfigError::EmissionRate(self.emission_rate));
        }
        if !(self.max_life > 0.0) {
            return Err(ConfigError::MaxLife(self.max_life));
        }
        for (index, attractor) in self.attractors.iter().enumerate() {
            if !(attractor.radius > 0.0) {
                return Err(ConfigError::AttractorRadius {
                    index,
                    radius: attractor.radius,
                });
            }
        }
        Ok(())
    }
}

/// Owns a pool of particles and advances it each step.
///
/// Built from validated [`EmitterParams`]; after construction, stepping
/// cannot fail. Dead is permanent: once [`kill`](Emitter::kill) has been
/// called or the emitter has fully drained,
/// [`still_active`](Emitter::still_active) stays false.
pub struct Emitter {
    params: EmitterParams,
    particles: Vec<Particle>,
    /// Accumulated emission budget, seconds. Each spawn costs
    /// `1 / emission_rate`. Keeps accumulating while the pool is full,
    /// so deferred spawns happen as soon as slots free up.
    emission_time: f32,
    num_spawned: u32,
    dead: bool,
    ctx: SpawnContext,
    scratch: Vec<ParticleAttributes>,
}

impl Emitter {
    /// Validate `params` and build the emitter.
    ///
    /// Fails fast on a non-positive emission rate, lifetime, or
    /// attractor radius. Initializes the attached sink with the pool
    /// capacity.
    pub fn new(mut params: EmitterParams) -> Result<Self, ConfigError> {
        params.validate()?;

        let ctx = match params.seed {
            Some(seed) => SpawnContext::seeded(seed),
            None => SpawnContext::from_entropy(),
        };
        if let Some(sink) = params.sink.as_mut() {
            sink.initialize(params.max_particles);
        }
        log::debug!(
            "emitter: rate={}/s, pool={}, budget={}",
            params.emission_rate,
            params.max_particles,
            params.max_emission
        );

        Ok(Self {
            params,
            particles: Vec::new(),
            emission_time: 0.0,
            num_spawned: 0,
            dead: false,
            ctx,
            scratch: Vec::new(),
        })
    }

    /// The live particles, in spawn order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Total particles spawned across this emitter's life.
    pub fn num_spawned(&self) -> u32 {
        self.num_spawned
    }

    /// The unspent emission budget, in seconds.
    pub fn emission_time(&self) -> f32 {
        self.emission_time
    }

    /// The emitter's configuration.
    pub fn params(&self) -> &EmitterParams {
        &self.params
    }

    /// Whether this emitter is still live.
    ///
    /// False once killed, or once the spawn budget is spent and the
    /// last particle has aged out.
    pub fn still_active(&self) -> bool {
        !self.dead && (self.num_spawned < self.params.max_emission || !self.particles.is_empty())
    }

    /// Stop spawning. Live particles keep simulating until they age
    /// out, after which the emitter reports itself inactive.
    pub fn stop(&mut self) {
        self.params.max_emission = self.num_spawned;
        log::debug!("emitter stopped after {} spawns", self.num_spawned);
    }

    /// Kill the emitter immediately, even with particles still alive.
    ///
    /// Remaining particles are destroyed (each sees its `on_destroy`
    /// hook exactly once) and the sink is released.
    pub fn kill(&mut self) {
        self.dead = true;
        log::debug!("emitter killed with {} live particles", self.particles.len());
        self.dispose();
    }

    /// Tear down: destroy remaining particles through `on_destroy` and
    /// release the sink. Idempotent; a
    /// [`ParticleSystem`](crate::ParticleSystem) calls this when it
    /// reaps the emitter.
    pub fn dispose(&mut self) {
        if let Some(on_destroy) = self.params.on_destroy.as_mut() {
            for p in &mut self.particles {
                on_destroy(p);
            }
        }
        self.particles.clear();
        if let Some(mut sink) = self.params.sink.take() {
            sink.release();
        }
    }

    /// Advance the emitter by `dt` seconds.
    ///
    /// Spends the emission budget on new particles, integrates forces
    /// over the pool, retires expired particles, then publishes the
    /// survivors to the sink. `elapsed` is the host's total clock,
    /// forwarded to the sink untouched.
    pub fn step(&mut self, dt: f32, elapsed: f32) {
        self.update_emission(dt);
        self.update_particles(dt);
        self.publish(elapsed);
    }

    fn can_spawn(&self) -> bool {
        self.emission_time >= 1.0 / self.params.emission_rate
            && self.particles.len() < self.params.max_particles
            && self.num_spawned < self.params.max_emission
    }

    fn update_emission(&mut self, dt: f32) {
        if self.dead {
            return;
        }
        self.emission_time += dt;
        let seconds_per_particle = 1.0 / self.params.emission_rate;

        let before = self.num_spawned;
        while self.can_spawn() {
            self.emission_time -= seconds_per_particle;
            self.num_spawned += 1;
            let p = self.spawn_particle();
            self.particles.push(p);
        }
        if self.num_spawned > before {
            log::trace!(
                "spawned {} particles ({} live)",
                self.num_spawned - before,
                self.particles.len()
            );
        }
    }

    /// Spawn one particle. Draw order is fixed: shape jitter, direction
    /// (phi, theta), speed, identity.
    fn spawn_particle(&mut self) -> Particle {
        let params = &mut self.params;
        let mut p = params.shape.emit(&mut self.ctx);
        p.max_life = params.max_life;

        let phi = self.ctx.random() * TAU;
        let theta = self.ctx.random() * params.rotation_angular_variance;
        let direction = Vec3::new(
            theta.sin() * phi.cos(),
            theta.cos(),
            theta.sin() * phi.sin(),
        );
        let speed = params.velocity_magnitude
            + (self.ctx.random() * 2.0 - 1.0) * params.velocity_magnitude_variance;
        p.velocity = params.rotation * (direction * speed);
        p.identity = self.ctx.random();

        if let Some(on_created) = params.on_created.as_mut() {
            on_created(&mut p);
        }
        p
    }

    fn update_particles(&mut self, dt: f32) {
        let EmitterParams {
            gravity,
            gravity_strength,
            drag_coefficient,
            attractors,
            on_step,
            on_destroy,
            ..
        } = &mut self.params;

        let ambient = if *gravity {
            GRAVITY * *gravity_strength
        } else {
            Vec3::ZERO
        };

        for p in &mut self.particles {
            p.age = (p.age + dt).min(p.max_life);

            let mut forces = ambient;
            forces -= p.velocity * *drag_coefficient;
            for attractor in attractors.iter() {
                forces += attractor.force_at(p.position);
            }

            p.velocity += forces * dt;
            p.position += p.velocity * dt;

            if let Some(on_step) = on_step.as_mut() {
                on_step(p);
            }
            // A particle crossing its lifetime boundary sees both hooks
            // this step; it is retired after the sweep, not
            // mid-integration.
            if p.is_expired() {
                if let Some(on_destroy) = on_destroy.as_mut() {
                    on_destroy(p);
                }
            }
        }

        self.particles.retain(|p| !p.is_expired());
    }

    fn publish(&mut self, elapsed: f32) {
        if self.params.sink.is_none() {
            return;
        }
        let uniforms = SinkUniforms {
            elapsed_time: elapsed,
            spin_speed: self.params.spin_speed,
        };
        pack_attributes(&self.particles, &mut self.scratch);
        if let Some(sink) = self.params.sink.as_mut() {
            sink.publish(&self.scratch, uniforms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_params() -> EmitterParams {
        EmitterParams::new()
            .with_drag_coefficient(0.0)
            .with_seed(1)
    }

    #[test]
    fn test_rejects_bad_config() {
        let params = EmitterParams::new().with_emission_rate(0.0);
        assert_eq!(
            Emitter::new(params).err(),
            Some(ConfigError::EmissionRate(0.0))
        );

        let params = EmitterParams::new().with_max_life(-1.0);
        assert_eq!(Emitter::new(params).err(), Some(ConfigError::MaxLife(-1.0)));

        let params =
            EmitterParams::new().with_attractor(ParticleAttractor::new(Vec3::ZERO, 1.0, 0.0));
        assert!(matches!(
            Emitter::new(params).err(),
            Some(ConfigError::AttractorRadius { index: 0, .. })
        ));
    }

    #[test]
    fn test_pool_cap_limits_spawns_and_banks_budget() {
        let params = quiet_params()
            .with_emission_rate(10.0)
            .with_max_particles(5)
            .with_max_emission(1_000);
        let mut emitter = Emitter::new(params).unwrap();

        emitter.step(1.0, 1.0);

        assert_eq!(emitter.particles().len(), 5);
        assert_eq!(emitter.num_spawned(), 5);
        assert!((emitter.emission_time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_pool_never_exceeds_capacity() {
        let params = quiet_params()
            .with_emission_rate(100.0)
            .with_max_particles(7)
            .with_max_emission(u32::MAX)
            .with_max_life(0.2);
        let mut emitter = Emitter::new(params).unwrap();

        let mut elapsed = 0.0;
        for _ in 0..100 {
            elapsed += 0.05;
            emitter.step(0.05, elapsed);
            assert!(emitter.particles().len() <= 7);
        }
    }

    #[test]
    fn test_spawn_budget_is_honored() {
        let params = quiet_params()
            .with_emission_rate(100.0)
            .with_max_particles(1_000)
            .with_max_emission(12);
        let mut emitter = Emitter::new(params).unwrap();

        emitter.step(10.0, 10.0);
        assert_eq!(emitter.num_spawned(), 12);
        emitter.step(10.0, 20.0);
        assert_eq!(emitter.num_spawned(), 12);
    }

    #[test]
    fn test_zero_forces_give_linear_motion() {
        let params = quiet_params()
            .with_emission_rate(1.0)
            .with_max_emission(1)
            .with_on_created(|p| p.velocity = Vec3::new(1.0, 0.0, 0.0));
        let mut emitter = Emitter::new(params).unwrap();

        emitter.step(2.0, 2.0);

        let p = &emitter.particles()[0];
        assert_eq!(p.position, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(p.velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_attractor_force_magnitude_at_radius() {
        // Particle spawns at distance 1 from an intensity-1, radius-1
        // attractor: force magnitude 1 / (1 + 1) = 0.5 toward it.
        let params = quiet_params()
            .with_shape(PointShape::new(Vec3::new(1.0, 0.0, 0.0)))
            .with_emission_rate(1.0)
            .with_max_emission(1)
            .with_attractor(ParticleAttractor::new(Vec3::ZERO, 1.0, 1.0));
        let mut emitter = Emitter::new(params).unwrap();

        emitter.step(1.0, 1.0);

        let p = &emitter.particles()[0];
        assert!((p.velocity - Vec3::new(-0.5, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_attractor_is_finite_at_zero_distance() {
        let params = quiet_params()
            .with_emission_rate(1.0)
            .with_max_emission(1)
            .with_attractor(ParticleAttractor::new(Vec3::ZERO, 5.0, 1.0));
        let mut emitter = Emitter::new(params).unwrap();

        emitter.step(1.0, 1.0);

        let p = &emitter.particles()[0];
        assert!(p.velocity.is_finite());
        assert_eq!(p.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_age_is_clamped_to_max_life() {
        let params = quiet_params()
            .with_emission_rate(1.0)
            .with_max_emission(1)
            .with_max_life(0.5)
            .with_on_step(|p| assert!(p.age <= p.max_life));
        let mut emitter = Emitter::new(params).unwrap();

        // A single big step overshoots the lifetime; the clamp holds
        // and the particle is retired the same step.
        emitter.step(3.0, 3.0);
        assert!(emitter.particles().is_empty());
    }

    #[test]
    fn test_drag_opposes_velocity() {
        let params = EmitterParams::new()
            .with_seed(3)
            .with_emission_rate(1.0)
            .with_max_emission(1)
            .with_drag_coefficient(0.5)
            .with_on_created(|p| p.velocity = Vec3::new(2.0, 0.0, 0.0));
        let mut emitter = Emitter::new(params).unwrap();

        emitter.step(1.0, 1.0);

        // force = -0.5 * (2, 0, 0); velocity = 2 - 1 = 1.
        let p = &emitter.particles()[0];
        assert!((p.velocity.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lifecycle_active_draining_dead() {
        let params = quiet_params()
            .with_emission_rate(10.0)
            .with_max_emission(5)
            .with_max_life(1.0);
        let mut emitter = Emitter::new(params).unwrap();

        emitter.step(0.5, 0.5);
        assert!(emitter.still_active());

        // Budget exhausted, particles draining.
        emitter.step(0.4, 0.9);
        assert_eq!(emitter.num_spawned(), 5);
        assert!(emitter.still_active());

        // All particles age out.
        emitter.step(2.0, 2.9);
        assert!(emitter.particles().is_empty());
        assert!(!emitter.still_active());
    }

    #[test]
    fn test_stop_halts_spawning_but_keeps_survivors() {
        let params = quiet_params()
            .with_emission_rate(10.0)
            .with_max_emission(u32::MAX)
            .with_max_life(10.0);
        let mut emitter = Emitter::new(params).unwrap();

        emitter.step(1.0, 1.0);
        let live = emitter.particles().len();
        assert!(live > 0);

        emitter.stop();
        emitter.step(1.0, 2.0);
        assert_eq!(emitter.particles().len(), live);
        assert!(emitter.still_active());
    }

    #[test]
    fn test_identity_is_stable_and_in_unit_range() {
        let params = quiet_params().with_emission_rate(10.0).with_max_emission(5);
        let mut emitter = Emitter::new(params).unwrap();

        emitter.step(1.0, 1.0);
        let ids: Vec<f32> = emitter.particles().iter().map(|p| p.identity).collect();
        for &id in &ids {
            assert!((0.0..1.0).contains(&id));
        }

        emitter.step(0.01, 1.01);
        let after: Vec<f32> = emitter.particles().iter().map(|p| p.identity).collect();
        assert_eq!(ids, after);
    }

    #[test]
    fn test_seeded_emitters_are_deterministic() {
        let build = || {
            Emitter::new(
                EmitterParams::new()
                    .with_seed(99)
                    .with_shape(PointShape::new(Vec3::ZERO).with_radius_variance(1.0))
                    .with_emission_rate(50.0)
                    .with_max_emission(u32::MAX)
                    .with_velocity_magnitude(2.0)
                    .with_velocity_magnitude_variance(0.5)
                    .with_rotation_angular_variance(1.0)
                    .with_gravity(true),
            )
            .unwrap()
        };
        let mut a = build();
        let mut b = build();

        let mut elapsed = 0.0;
        for _ in 0..20 {
            elapsed += 1.0 / 60.0;
            a.step(1.0 / 60.0, elapsed);
            b.step(1.0 / 60.0, elapsed);
        }
        assert_eq!(a.particles(), b.particles());
    }
}
