//! The simulation root: a collection of emitters stepped together.

use crate::emitter::Emitter;

/// Owns a set of emitters and advances them in lockstep.
///
/// The host clock drives [`step`](ParticleSystem::step) once per frame;
/// emitters whose lifecycle has ended are disposed and removed as part
/// of the same call. Emitters are unordered; each one steps
/// independently and there is no priority between them.
///
/// A system and its emitters belong to a single step driver. There is
/// no internal threading, and the whole simulation is deterministic for
/// a fixed sequence of `(dt, elapsed)` inputs and fixed emitter seeds.
///
/// # Example
///
/// ```
/// use flurry::{Emitter, EmitterParams, ParticleSystem};
///
/// let mut system = ParticleSystem::new();
/// system.add_emitter(
///     Emitter::new(EmitterParams::new().with_seed(1)).unwrap(),
/// );
///
/// // Host loop: one step per frame.
/// system.step(1.0 / 60.0, 0.0);
/// assert!(system.still_active());
/// ```
#[derive(Default)]
pub struct ParticleSystem {
    emitters: Vec<Emitter>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            emitters: Vec::new(),
        }
    }

    /// Add an emitter to the system.
    pub fn add_emitter(&mut self, emitter: Emitter) {
        self.emitters.push(emitter);
    }

    /// Whether any owned emitter is still live.
    pub fn still_active(&self) -> bool {
        self.emitters.iter().any(Emitter::still_active)
    }

    /// Number of emitters currently owned.
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// The owned emitters.
    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    /// Mutable access to the owned emitters, for host-side control like
    /// [`stop`](Emitter::stop) and [`kill`](Emitter::kill).
    pub fn emitters_mut(&mut self) -> &mut [Emitter] {
        &mut self.emitters
    }

    /// Advance every emitter by `dt` seconds, then reap the ones whose
    /// lifecycle ended.
    ///
    /// `elapsed` is the host's total clock, monotonically
    /// non-decreasing; it is forwarded to each emitter's sink.
    pub fn step(&mut self, dt: f32, elapsed: f32) {
        let mut finished = 0usize;
        for emitter in &mut self.emitters {
            emitter.step(dt, elapsed);
            if !emitter.still_active() {
                emitter.dispose();
                finished += 1;
            }
        }
        if finished > 0 {
            log::debug!("reaping {} finished emitters", finished);
            self.emitters.retain(Emitter::still_active);
        }
    }

    /// Release every emitter's resources immediately, without waiting
    /// for natural expiry. For scene teardown.
    pub fn dispose(&mut self) {
        for emitter in &mut self.emitters {
            emitter.dispose();
        }
        self.emitters.clear();
    }
}
