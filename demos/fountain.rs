//! A fountain: jittered point spray in an upward cone, bent sideways by
//! an attractor, then stopped and drained to show the emitter
//! lifecycle.
//!
//! Run with: `cargo run --example fountain`

use flurry::prelude::*;

fn main() {
    let params = EmitterParams::new()
        .with_shape(PointShape::new(Vec3::ZERO).with_radius_variance(0.1))
        .with_max_life(2.0)
        .with_max_particles(500)
        .with_emission_rate(250.0)
        .with_max_emission(u32::MAX)
        .with_velocity_magnitude(4.0)
        .with_velocity_magnitude_variance(0.5)
        .with_rotation_angular_variance(0.35)
        .with_gravity(true)
        .with_drag_coefficient(0.1)
        .with_attractor(ParticleAttractor::new(Vec3::new(3.0, 2.0, 0.0), 2.0, 1.5))
        .with_seed(42);

    let mut system = ParticleSystem::new();
    system.add_emitter(Emitter::new(params).expect("valid emitter config"));

    let dt = 1.0 / 60.0;
    let mut elapsed = 0.0;

    // Two seconds of spray.
    for frame in 0..120 {
        elapsed += dt;
        system.step(dt, elapsed);
        if frame % 30 == 29 {
            let live: usize = system.emitters().iter().map(|e| e.particles().len()).sum();
            println!("t = {:.1}s: {} droplets", elapsed, live);
        }
    }

    // Shut the valve; survivors keep falling until they age out and the
    // system reaps the emitter.
    for emitter in system.emitters_mut() {
        emitter.stop();
    }
    println!("emission stopped, draining");

    while system.still_active() {
        elapsed += dt;
        system.step(dt, elapsed);
    }
    println!(
        "drained at t = {:.1}s, {} emitters left",
        elapsed,
        system.emitter_count()
    );
}
