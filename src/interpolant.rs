//! Piecewise-linear keyframe curves and lookup-table baking.
//!
//! An [`Interpolant`] is an ordered set of `(time, value)` keyframes,
//! evaluable at any time. Renderers do not sample curves per particle:
//! curves are baked once into fixed-resolution [`BakedTable`]s that the
//! host uploads as 1D float textures (or indexes as plain arrays) and
//! samples uniformly over `[0, max_frame_time]`.
//!
//! Baking sizes the table adaptively: the narrowest gap between interior
//! keyframes sets the sampling cadence, so tightly spaced keys are
//! resolved without over-allocating for sparse curves.
//!
//! # Example
//!
//! ```
//! use flurry::{Interpolant, Keyframe};
//!
//! let alpha = Interpolant::new(vec![
//!     Keyframe::new(0.0, 0.0_f32),
//!     Keyframe::new(2.0, 4.0),
//! ]).unwrap();
//!
//! assert_eq!(alpha.evaluate(1.0), 2.0);
//! // Outside the keyframe span, values clamp to the boundary.
//! assert_eq!(alpha.evaluate(-1.0), 0.0);
//! assert_eq!(alpha.evaluate(9.0), 4.0);
//! ```

use glam::{Vec3, Vec4};

use crate::error::CurveError;

/// Default floor for the normalized keyframe gap used to size tables.
///
/// A curve with no interior keyframes bakes at this cadence: three
/// samples across its span.
pub const DEFAULT_RESOLUTION_HINT: f32 = 0.5;

/// A single `(time, value)` pair on a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    /// Absolute keyframe time in seconds.
    pub time: f32,
    /// Value the curve passes through at `time`.
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Value types a curve can carry.
pub trait Interpolate: Copy {
    /// Linear blend between two values.
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        crate::math::lerp(a, b, t)
    }
}

impl Interpolate for Vec3 {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

impl Interpolate for Vec4 {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

/// Piecewise-linear curve over keyframe time.
///
/// Scalar curves (`Interpolant<f32>`) carry sizes, alphas, twinkle
/// amounts; `Interpolant<Vec3>` carries colors and vector parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolant<T: Interpolate> {
    frames: Vec<Keyframe<T>>,
}

impl<T: Interpolate> Interpolant<T> {
    /// Build a curve from keyframes.
    ///
    /// Returns [`CurveError::Empty`] for zero keyframes and
    /// [`CurveError::NonIncreasing`] when the times fail to strictly
    /// increase.
    pub fn new(frames: Vec<Keyframe<T>>) -> Result<Self, CurveError> {
        if frames.is_empty() {
            return Err(CurveError::Empty);
        }
        for i in 1..frames.len() {
            if frames[i].time <= frames[i - 1].time {
                return Err(CurveError::NonIncreasing { index: i });
            }
        }
        Ok(Self { frames })
    }

    /// The keyframes, in time order.
    pub fn frames(&self) -> &[Keyframe<T>] {
        &self.frames
    }

    /// Time of the last keyframe.
    pub fn last_time(&self) -> f32 {
        self.frames[self.frames.len() - 1].time
    }

    /// Evaluate the curve at `time`.
    ///
    /// Linear between bracketing keyframes, exact at keyframe times, and
    /// clamped to the boundary keyframe's value outside the span (no
    /// extrapolation).
    pub fn evaluate(&self, time: f32) -> T {
        let frames = &self.frames;
        if time <= frames[0].time {
            return frames[0].value;
        }
        let last = &frames[frames.len() - 1];
        if time >= last.time {
            return last.value;
        }
        // First keyframe strictly past `time`; the clamps above
        // guarantee it exists and has a predecessor.
        let hi = frames.partition_point(|f| f.time <= time);
        let a = &frames[hi - 1];
        let b = &frames[hi];
        let t = (time - a.time) / (b.time - a.time);
        T::lerp(a.value, b.value, t)
    }
}

/// Fold a curve's interior keyframe gaps, normalized by
/// `max_frame_time`, into the running smallest step.
///
/// Only gaps ending at an interior keyframe count; a curve with two or
/// fewer keyframes leaves `smallest` untouched.
fn fold_smallest_step<T: Interpolate>(
    frames: &[Keyframe<T>],
    max_frame_time: f32,
    mut smallest: f32,
) -> f32 {
    for i in 1..frames.len().saturating_sub(1) {
        let step = (frames[i].time - frames[i - 1].time) / max_frame_time;
        smallest = smallest.min(step);
    }
    smallest
}

fn table_segments(smallest_step: f32) -> u32 {
    (1.0 / smallest_step).ceil().max(1.0) as u32
}

impl Interpolant<f32> {
    /// Bake to a one-channel table at the default resolution hint.
    pub fn bake(&self) -> BakedTable {
        self.bake_with_hint(DEFAULT_RESOLUTION_HINT)
    }

    /// Bake to a one-channel table.
    ///
    /// `hint` caps the normalized sampling step: the table resolves the
    /// narrowest interior keyframe gap or `hint`, whichever is smaller.
    pub fn bake_with_hint(&self, hint: f32) -> BakedTable {
        debug_assert!(hint > 0.0, "resolution hint must be positive");
        let max_frame_time = self.last_time();
        let smallest = fold_smallest_step(&self.frames, max_frame_time, hint);
        let segments = table_segments(smallest);
        let width = segments + 1;

        let mut data = Vec::with_capacity(width as usize);
        for i in 0..width {
            let t = i as f32 / segments as f32;
            data.push(self.evaluate(t * max_frame_time));
        }

        BakedTable {
            width,
            channels: 1,
            max_frame_time,
            data,
        }
    }
}

impl Interpolant<Vec3> {
    /// Bake a color curve and an alpha curve onto one shared
    /// four-channel table, at the default resolution hint.
    pub fn bake_with_alpha(&self, alpha: &Interpolant<f32>) -> BakedTable {
        self.bake_with_alpha_hint(alpha, DEFAULT_RESOLUTION_HINT)
    }

    /// Bake a color curve and an alpha curve onto one shared
    /// four-channel table.
    ///
    /// The curves may have different durations and keyframe spacings:
    /// the table spans the longer of the two and samples at the finest
    /// cadence found in either, with each curve clamping past its own
    /// last keyframe. Every sample packs `[r, g, b, a]` evaluated at the
    /// same absolute time.
    pub fn bake_with_alpha_hint(&self, alpha: &Interpolant<f32>, hint: f32) -> BakedTable {
        debug_assert!(hint > 0.0, "resolution hint must be positive");
        let max_frame_time = self.last_time().max(alpha.last_time());
        let mut smallest = fold_smallest_step(&self.frames, max_frame_time, hint);
        smallest = fold_smallest_step(&alpha.frames, max_frame_time, smallest);
        let segments = table_segments(smallest);
        let width = segments + 1;

        let mut data = Vec::with_capacity((width * 4) as usize);
        for i in 0..width {
            let t = i as f32 / segments as f32 * max_frame_time;
            let color = self.evaluate(t);
            data.extend_from_slice(&[color.x, color.y, color.z, alpha.evaluate(t)]);
        }

        BakedTable {
            width,
            channels: 4,
            max_frame_time,
            data,
        }
    }
}

/// A fixed-resolution lookup table baked from one or two curves.
///
/// `width * channels` floats, row-major, sampled uniformly over
/// `[0, max_frame_time]`. [`as_bytes`](BakedTable::as_bytes) exposes the
/// buffer ready for a 1D float-texture upload; how it is sampled and
/// shaded is the host renderer's business.
#[derive(Debug, Clone, PartialEq)]
pub struct BakedTable {
    width: u32,
    channels: u32,
    max_frame_time: f32,
    data: Vec<f32>,
}

impl BakedTable {
    /// Number of samples along the table.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Floats per sample: 1 for scalar tables, 4 for rgba tables.
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Time mapped to the last sample.
    pub fn max_frame_time(&self) -> f32 {
        self.max_frame_time
    }

    /// Flat sample buffer, `width * channels` floats.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Raw bytes of the sample buffer, for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Sample the table at an absolute time.
    ///
    /// Maps `t` to the nearest sample index over `[0, max_frame_time]`,
    /// clamped at both ends. Returns one sample's channels.
    pub fn sample(&self, t: f32) -> &[f32] {
        let index = if self.max_frame_time > 0.0 {
            let scaled = t / self.max_frame_time * (self.width - 1) as f32;
            (scaled.round().max(0.0) as u32).min(self.width - 1)
        } else {
            0
        };
        let start = (index * self.channels) as usize;
        &self.data[start..start + self.channels as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(frames: &[(f32, f32)]) -> Interpolant<f32> {
        Interpolant::new(frames.iter().map(|&(t, v)| Keyframe::new(t, v)).collect()).unwrap()
    }

    #[test]
    fn test_rejects_empty_and_unordered() {
        assert_eq!(
            Interpolant::<f32>::new(Vec::new()).unwrap_err(),
            CurveError::Empty
        );
        let frames = vec![Keyframe::new(0.0, 1.0), Keyframe::new(0.0, 2.0)];
        assert_eq!(
            Interpolant::new(frames).unwrap_err(),
            CurveError::NonIncreasing { index: 1 }
        );
    }

    #[test]
    fn test_evaluate_exact_at_keyframes() {
        let curve = scalar(&[(0.0, 1.0), (1.0, 3.0), (4.0, -2.0)]);
        assert_eq!(curve.evaluate(0.0), 1.0);
        assert_eq!(curve.evaluate(1.0), 3.0);
        assert_eq!(curve.evaluate(4.0), -2.0);
    }

    #[test]
    fn test_evaluate_interpolates_and_clamps() {
        let curve = scalar(&[(0.0, 0.0), (2.0, 4.0)]);
        assert_eq!(curve.evaluate(0.5), 1.0);
        assert_eq!(curve.evaluate(-10.0), 0.0);
        assert_eq!(curve.evaluate(10.0), 4.0);
    }

    #[test]
    fn test_evaluate_vec3() {
        let curve = Interpolant::new(vec![
            Keyframe::new(0.0, Vec3::ZERO),
            Keyframe::new(1.0, Vec3::ONE),
        ])
        .unwrap();
        assert_eq!(curve.evaluate(0.5), Vec3::splat(0.5));
    }

    #[test]
    fn test_flat_curve_bakes_to_ones() {
        let table = scalar(&[(0.0, 1.0), (5.0, 1.0)]).bake();
        // No interior keyframes, so the default hint stands: 3 samples.
        assert_eq!(table.width(), 3);
        assert_eq!(table.channels(), 1);
        assert!(table.data().iter().all(|&v| v == 1.0));
        assert_eq!(table.sample(2.5), &[1.0]);
    }

    #[test]
    fn test_bake_width_tracks_narrowest_gap() {
        // Interior gap 1.25 / 5.0 = 0.25 of the span -> 4 segments.
        let table = scalar(&[(0.0, 0.0), (1.25, 1.0), (5.0, 0.0)]).bake();
        assert_eq!(table.width(), 5);
        assert_eq!(table.max_frame_time(), 5.0);
    }

    #[test]
    fn test_bake_is_idempotent() {
        let curve = scalar(&[(0.0, 0.0), (0.5, 2.0), (3.0, 1.0)]);
        assert_eq!(curve.bake(), curve.bake());
    }

    #[test]
    fn test_single_keyframe_bakes_without_panic() {
        let table = scalar(&[(0.0, 7.0)]).bake();
        assert_eq!(table.width(), 3);
        assert!(table.data().iter().all(|&v| v == 7.0));
        // Zero-duration table still samples.
        assert_eq!(table.sample(1.0), &[7.0]);
    }

    #[test]
    fn test_bake_with_alpha_packs_rgba() {
        let color = Interpolant::new(vec![
            Keyframe::new(0.0, Vec3::new(1.0, 0.5, 0.0)),
            Keyframe::new(2.0, Vec3::new(1.0, 0.5, 0.0)),
        ])
        .unwrap();
        let alpha = scalar(&[(0.0, 1.0), (4.0, 0.0)]);

        let table = color.bake_with_alpha(&alpha);
        assert_eq!(table.channels(), 4);
        // The table spans the longer curve.
        assert_eq!(table.max_frame_time(), 4.0);
        assert_eq!(table.width(), 3);

        // First sample: full alpha. Last: faded out, color clamped.
        assert_eq!(table.sample(0.0), &[1.0, 0.5, 0.0, 1.0]);
        assert_eq!(table.sample(4.0), &[1.0, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_bake_with_alpha_uses_finest_cadence_of_both() {
        let color = Interpolant::new(vec![
            Keyframe::new(0.0, Vec3::ONE),
            Keyframe::new(4.0, Vec3::ONE),
        ])
        .unwrap();
        // Alpha has an interior keyframe at 1.0 of a 4.0 span: gap 0.25.
        let alpha = scalar(&[(0.0, 1.0), (1.0, 0.5), (4.0, 0.0)]);

        let table = color.bake_with_alpha(&alpha);
        assert_eq!(table.width(), 5);
    }

    #[test]
    fn test_sample_rounds_to_nearest_and_clamps() {
        let table = scalar(&[(0.0, 0.0), (0.5, 1.0), (2.0, 4.0)]).bake();
        // width = ceil(1 / 0.25) + 1 = 5 over [0, 2].
        assert_eq!(table.width(), 5);
        assert_eq!(table.sample(-1.0)[0], table.data()[0]);
        let last = table.data()[table.data().len() - 1];
        assert_eq!(table.sample(99.0)[0], last);
    }

    #[test]
    fn test_as_bytes_length() {
        let table = scalar(&[(0.0, 1.0), (5.0, 1.0)]).bake();
        assert_eq!(table.as_bytes().len(), table.data().len() * 4);
    }
}
