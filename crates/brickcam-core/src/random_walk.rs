//! Smoothed, bounded random walks for camera drift and shake.
//!
//! A walk is built from i.i.d. steps that are integrated `smoothing_order`
//! times, averaged over a trailing window and finally clamped. Integrating
//! once gives a position-like walk; integrating twice makes the steps behave
//! like accelerations, which reads as a slow, heavy camera wobble.

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};

/// Distribution of the raw steps before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepDistribution {
    /// Uniform on `[-1, 1]`.
    #[default]
    Uniform,
    /// Standard normal.
    Normal,
}

/// Parameters of a single random walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkParams {
    /// Scale applied to every raw step.
    pub step_magnitude: f64,
    /// Number of samples in the trailing moving average.
    pub window_size: usize,
    /// Inclusive `[lo, hi]` bounds applied to every component.
    pub interval: [f64; 2],
    /// Distribution of the raw steps.
    pub distribution: StepDistribution,
    /// Number of cumulative-sum passes.
    pub smoothing_order: u32,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            step_magnitude: 1.0,
            window_size: 1,
            interval: [-1.0, 1.0],
            distribution: StepDistribution::Uniform,
            smoothing_order: 1,
        }
    }
}

impl WalkParams {
    /// Small translational drift of the look-at point.
    pub fn look_at_drift() -> Self {
        Self {
            step_magnitude: 0.005,
            window_size: 5,
            interval: [-0.03, 0.03],
            ..Self::default()
        }
    }

    /// Angle of the rotational camera shake, in radians.
    pub fn shake_angle() -> Self {
        use std::f64::consts::PI;
        Self {
            step_magnitude: PI / 32.0,
            window_size: 5,
            interval: [-PI / 6.0, PI / 6.0],
            smoothing_order: 2,
            ..Self::default()
        }
    }

    /// Axis of the rotational camera shake (normalized by the caller).
    pub fn shake_axis() -> Self {
        Self {
            window_size: 10,
            distribution: StepDistribution::Normal,
            ..Self::default()
        }
    }

    /// Sets the step magnitude.
    #[must_use]
    pub fn with_step_magnitude(mut self, step_magnitude: f64) -> Self {
        self.step_magnitude = step_magnitude;
        self
    }

    /// Sets the moving-average window.
    #[must_use]
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Sets the clamp interval.
    #[must_use]
    pub fn with_interval(mut self, lo: f64, hi: f64) -> Self {
        self.interval = [lo, hi];
        self
    }

    /// Sets the step distribution.
    #[must_use]
    pub fn with_distribution(mut self, distribution: StepDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Sets the number of integration passes.
    #[must_use]
    pub fn with_smoothing_order(mut self, smoothing_order: u32) -> Self {
        self.smoothing_order = smoothing_order;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.step_magnitude.is_finite() || self.step_magnitude < 0.0 {
            return Err(CaptureError::invalid_parameter(format!(
                "step magnitude must be finite and >= 0, got {}",
                self.step_magnitude
            )));
        }
        if self.window_size == 0 {
            return Err(CaptureError::invalid_parameter("window size must be >= 1"));
        }
        let [lo, hi] = self.interval;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(CaptureError::invalid_parameter(format!(
                "clamp interval must satisfy lo < hi, got [{lo}, {hi}]"
            )));
        }
        Ok(())
    }
}

/// An ordered sequence of equally sized sample vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomWalkSeries {
    dims: usize,
    rows: Vec<Vec<f64>>,
}

impl RandomWalkSeries {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of components per sample.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Returns sample `index`.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterates over the samples in order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// First component of sample `index`.
    pub fn scalar(&self, index: usize) -> Option<f64> {
        self.rows.get(index).and_then(|r| r.first().copied())
    }

    /// Sample `index` as a 3-vector; missing components are zero.
    pub fn vec3(&self, index: usize) -> Option<DVec3> {
        self.rows.get(index).map(|r| {
            let at = |i: usize| r.get(i).copied().unwrap_or(0.0);
            DVec3::new(at(0), at(1), at(2))
        })
    }

    /// Scales every sample to unit length.
    ///
    /// Zero-length samples are left as they are; callers that need a direction
    /// from them must check for it.
    #[must_use]
    pub fn normalize_rows(mut self) -> Self {
        for row in &mut self.rows {
            let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.iter_mut().for_each(|v| *v /= norm);
            }
        }
        self
    }
}

/// Random walk generator owning its own random state.
///
/// Each capture session should own one sampler; samplers are never shared.
#[derive(Debug, Clone)]
pub struct WalkSampler {
    rng: StdRng,
}

impl WalkSampler {
    /// Creates a sampler whose output is fully determined by `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a sampler seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a seeded sampler, or an entropy-seeded one when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    /// Gives access to the underlying generator for other per-session draws.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Produces a smoothed random walk of `length` samples of `dims` components.
    ///
    /// A window larger than `length` is truncated to `length`. The average at
    /// sample `i` covers samples `max(0, i + 1 - window)..=i`.
    pub fn random_walk(
        &mut self,
        length: usize,
        dims: usize,
        params: &WalkParams,
    ) -> Result<RandomWalkSeries> {
        if length == 0 {
            return Err(CaptureError::invalid_parameter("walk length must be >= 1"));
        }
        if dims == 0 {
            return Err(CaptureError::invalid_parameter("walk dims must be >= 1"));
        }
        params.validate()?;

        let mut rows: Vec<Vec<f64>> = (0..length)
            .map(|_| {
                (0..dims)
                    .map(|_| {
                        saturate(self.raw_step(params.distribution) * params.step_magnitude)
                    })
                    .collect()
            })
            .collect();

        for _ in 0..params.smoothing_order {
            integrate(&mut rows);
        }

        let window = params.window_size.min(length);
        if window > 1 {
            rows = moving_average(&rows, window);
        }

        let [lo, hi] = params.interval;
        for value in rows.iter_mut().flatten() {
            *value = value.clamp(lo, hi);
        }

        log::debug!(
            "random walk: length={length} dims={dims} order={} window={window}",
            params.smoothing_order
        );

        Ok(RandomWalkSeries { dims, rows })
    }

    fn raw_step(&mut self, distribution: StepDistribution) -> f64 {
        match distribution {
            StepDistribution::Uniform => self.rng.gen_range(-1.0..=1.0),
            StepDistribution::Normal => self.rng.sample(StandardNormal),
        }
    }
}

/// Running sum along the time axis, per component.
fn integrate(rows: &mut [Vec<f64>]) {
    for i in 1..rows.len() {
        let (done, rest) = rows.split_at_mut(i);
        let prev = &done[i - 1];
        for (value, p) in rest[0].iter_mut().zip(prev) {
            *value = saturate(*value + p);
        }
    }
}

/// Trailing moving average, truncated at the start of the sequence.
///
/// Each mean is summed as `v / count` so finite inputs give finite outputs.
fn moving_average(rows: &[Vec<f64>], window: usize) -> Vec<Vec<f64>> {
    let dims = rows.first().map_or(0, Vec::len);

    (0..rows.len())
        .map(|i| {
            let span = &rows[(i + 1).saturating_sub(window)..=i];
            #[allow(clippy::cast_precision_loss)]
            let count = span.len() as f64;
            (0..dims)
                .map(|d| saturate(span.iter().map(|row| row[d] / count).sum()))
                .collect()
        })
        .collect()
}

/// Pins overflowed values to the largest finite magnitude.
fn saturate(value: f64) -> f64 {
    value.clamp(-f64::MAX, f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_sample_zero_step() {
        let mut sampler = WalkSampler::seeded(7);
        let params = WalkParams::default()
            .with_step_magnitude(0.0)
            .with_window_size(5)
            .with_smoothing_order(0);
        let walk = sampler.random_walk(1, 3, &params).unwrap();
        assert_eq!(walk.len(), 1);
        assert_eq!(walk.row(0).unwrap(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_same_seed_same_walk() {
        let params = WalkParams::shake_angle();
        let a = WalkSampler::seeded(42).random_walk(20, 1, &params).unwrap();
        let b = WalkSampler::seeded(42).random_walk(20, 1, &params).unwrap();
        assert_eq!(a, b);

        let c = WalkSampler::seeded(43).random_walk(20, 1, &params).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_raw_samples_are_clamped_draws() {
        let params = WalkParams::default()
            .with_step_magnitude(5.0)
            .with_smoothing_order(0)
            .with_window_size(1);
        let walk = WalkSampler::seeded(3).random_walk(50, 2, &params).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let mut hit_bound = false;
        for row in walk.iter() {
            for v in row {
                let expected = (rng.gen_range(-1.0..=1.0) * 5.0_f64).clamp(-1.0, 1.0);
                assert_eq!(*v, expected);
                hit_bound |= v.abs() == 1.0;
            }
        }
        assert!(hit_bound);
    }

    #[test]
    fn test_huge_steps_stay_in_interval() {
        let params = WalkParams::default()
            .with_step_magnitude(1e308)
            .with_window_size(2)
            .with_smoothing_order(3);
        for distribution in [StepDistribution::Uniform, StepDistribution::Normal] {
            let walk = WalkSampler::seeded(0)
                .random_walk(20, 1, &params.with_distribution(distribution))
                .unwrap();
            for row in walk.iter() {
                assert!((-1.0..=1.0).contains(&row[0]), "escaped the interval: {}", row[0]);
            }
        }
    }

    #[test]
    fn test_integrate_and_average() {
        let mut rows = vec![vec![1.0], vec![2.0], vec![3.0]];
        integrate(&mut rows);
        assert_eq!(rows, vec![vec![1.0], vec![3.0], vec![6.0]]);

        let avg = moving_average(&rows, 2);
        assert_eq!(avg, vec![vec![1.0], vec![2.0], vec![4.5]]);
    }

    #[test]
    fn test_invalid_parameters() {
        let mut sampler = WalkSampler::seeded(0);
        let params = WalkParams::default();
        assert!(sampler.random_walk(0, 1, &params).is_err());
        assert!(sampler.random_walk(1, 0, &params).is_err());
        assert!(sampler
            .random_walk(4, 1, &params.with_window_size(0))
            .is_err());
        assert!(sampler
            .random_walk(4, 1, &params.with_interval(1.0, 1.0))
            .is_err());
        assert!(sampler
            .random_walk(4, 1, &params.with_step_magnitude(-1.0))
            .is_err());
    }

    #[test]
    fn test_window_longer_than_walk() {
        let params = WalkParams::default().with_window_size(10);
        let walk = WalkSampler::seeded(5).random_walk(3, 2, &params).unwrap();
        assert_eq!(walk.len(), 3);
        assert_eq!(walk.dims(), 2);
    }

    #[test]
    fn test_normalize_rows() {
        let walk = WalkSampler::seeded(11)
            .random_walk(8, 3, &WalkParams::shake_axis())
            .unwrap()
            .normalize_rows();
        for i in 0..walk.len() {
            let axis = walk.vec3(i).unwrap();
            assert!((axis.length() - 1.0).abs() < 1e-12);
        }
    }

    fn arb_distribution() -> impl Strategy<Value = StepDistribution> {
        prop_oneof![Just(StepDistribution::Uniform), Just(StepDistribution::Normal)]
    }

    proptest! {
        #[test]
        fn prop_walk_stays_in_interval(
            seed in any::<u64>(),
            length in 1usize..40,
            dims in 1usize..4,
            step in 0.0..5.0_f64,
            window in 1usize..8,
            order in 0u32..3,
            (lo, width) in (-2.0..0.0_f64, 0.01..3.0_f64),
            distribution in arb_distribution(),
        ) {
            let params = WalkParams {
                step_magnitude: step,
                window_size: window,
                interval: [lo, lo + width],
                distribution,
                smoothing_order: order,
            };
            let walk = WalkSampler::seeded(seed).random_walk(length, dims, &params).unwrap();
            prop_assert_eq!(walk.len(), length);
            for row in walk.iter() {
                prop_assert_eq!(row.len(), dims);
                for v in row {
                    prop_assert!(*v >= lo && *v <= lo + width);
                }
            }
        }
    }
}
