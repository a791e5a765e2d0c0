//! Falling snow: a wide plane high above the origin sheds slow, heavily
//! dragged particles. A printing sink stands in for the renderer.
//!
//! Run with: `cargo run --example snow`

use flurry::prelude::*;

struct PrintSink {
    frames: u32,
}

impl AttributeSink for PrintSink {
    fn initialize(&mut self, max_particles: usize) {
        println!("sink ready for up to {} particles", max_particles);
    }

    fn publish(&mut self, particles: &[ParticleAttributes], uniforms: SinkUniforms) {
        self.frames += 1;
        if self.frames % 60 == 0 {
            println!(
                "t = {:.1}s: {} flakes in the air",
                uniforms.elapsed_time,
                particles.len()
            );
        }
    }

    fn release(&mut self) {
        println!("sink released");
    }
}

fn main() {
    // Over-life curves for the renderer: constant size and alpha here,
    // but the tables are baked the same way for any authored curve.
    let size_over_life = Interpolant::new(vec![
        Keyframe::new(0.0, 1500.0_f32),
        Keyframe::new(5.0, 1500.0),
    ])
    .expect("valid size curve");
    let alpha_over_life =
        Interpolant::new(vec![Keyframe::new(0.0, 1.0_f32), Keyframe::new(5.0, 1.0)])
            .expect("valid alpha curve");
    let color_over_life = Interpolant::new(vec![
        Keyframe::new(0.0, Vec3::ONE),
        Keyframe::new(5.0, Vec3::ONE),
    ])
    .expect("valid color curve");

    let size_table = size_over_life.bake();
    let color_table = color_over_life.bake_with_alpha(&alpha_over_life);
    println!(
        "baked tables: size {}x{}, color {}x{}",
        size_table.width(),
        size_table.channels(),
        color_table.width(),
        color_table.channels()
    );

    // A 30x30 plane at y = 20, shedding 200 flakes a second.
    let plane_transform = Mat4::from_scale_rotation_translation(
        Vec3::splat(15.0),
        Quat::IDENTITY,
        Vec3::new(0.0, 20.0, 0.0),
    );
    let params = EmitterParams::new()
        .with_shape(PlaneShape::new(Vec2::ONE, plane_transform))
        .with_max_life(6.0)
        .with_max_particles(2_000)
        .with_emission_rate(200.0)
        .with_max_emission(u32::MAX)
        .with_gravity(true)
        .with_drag_coefficient(2.0)
        .with_spin_speed(std::f32::consts::FRAC_PI_2)
        .with_seed(2024)
        .with_sink(PrintSink { frames: 0 });

    let mut system = ParticleSystem::new();
    system.add_emitter(Emitter::new(params).expect("valid emitter config"));

    // Ten simulated seconds at a fixed 60 Hz.
    let mut time = Time::new();
    time.set_fixed_delta(Some(1.0 / 60.0));
    for _ in 0..600 {
        let (elapsed, dt) = time.update();
        system.step(dt, elapsed);
    }

    system.dispose();
}
