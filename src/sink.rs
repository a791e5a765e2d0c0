//! The renderer feed: per-frame attribute buffers and the sink contract.
//!
//! The engine does not render. Each step, an emitter packs its live
//! particles into a compact attribute buffer and hands it to whatever
//! [`AttributeSink`] the host attached. The records are plain old data,
//! so a renderer can copy the published slice straight into a vertex
//! buffer.

use bytemuck::{Pod, Zeroable};

use crate::particle::Particle;

/// Per-particle attributes published to a sink each step.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ParticleAttributes {
    /// World-space position.
    pub position: [f32; 3],
    /// Age over lifetime, in `[0, 1]`.
    pub normalized_age: f32,
    /// The particle's stable random seed, in `[0, 1)`.
    pub identity: f32,
}

/// Emitter-level values published alongside the particle attributes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SinkUniforms {
    /// Host-supplied total elapsed time, seconds.
    pub elapsed_time: f32,
    /// The emitter's spin speed, radians per second, for renderers that
    /// rotate their sprites.
    pub spin_speed: f32,
}

/// Consumer of per-frame particle snapshots, implemented by the
/// renderer.
///
/// `publish` fires once per emitter step with between zero and
/// `max_particles` records; the count varies frame to frame as particles
/// spawn and expire. The slice is a snapshot valid only for the duration
/// of the call: copy out what you need before returning, because the
/// live set is mutated again on the next step.
pub trait AttributeSink {
    /// Called once when the emitter is built, with its particle
    /// capacity.
    fn initialize(&mut self, max_particles: usize);

    /// Receive the current live-particle attributes and emitter
    /// uniforms.
    fn publish(&mut self, particles: &[ParticleAttributes], uniforms: SinkUniforms);

    /// Release renderer-side resources. Called exactly once, when the
    /// emitter is disposed.
    fn release(&mut self);
}

/// Pack live particles into the attribute buffer published to sinks.
///
/// Clears and refills `out`, reusing its allocation across frames.
pub fn pack_attributes(particles: &[Particle], out: &mut Vec<ParticleAttributes>) {
    out.clear();
    out.reserve(particles.len());
    for p in particles {
        out.push(ParticleAttributes {
            position: p.position.to_array(),
            normalized_age: p.normalized_age(),
            identity: p.identity,
        });
    }
}
