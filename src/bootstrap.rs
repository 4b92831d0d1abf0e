//! A percentile bootstrap: resample a sample with replacement, evaluate a
//! statistic on every resample, and read confidence intervals straight off
//! the sorted resampled distribution.
//!
//! The estimator is generic over the element type so that a sample of
//! multi-field rows resamples row-wise: all fields of a selected row move
//! together, which is what a statistic over aligned columns needs. For the
//! common case the element is just `f64` and the statistic is [`mean`].
//!
//! Resampling is driven by a caller-supplied random source; seed it if the
//! run has to be reproducible (the `extract` binary always does).

use rand::Rng;

/// The arithmetic mean, the statistic used for every study summary.
pub fn mean(sample: &[f64]) -> f64 {
    sample.iter().sum::<f64>() / sample.len() as f64
}

/// The sorted distribution of a statistic over bootstrap resamples, ready
/// to be queried for confidence intervals at any level.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    distribution: Vec<f64>,
}

impl Estimate {
    /// Draw `iterations` resamples of `sample` (each of the original size,
    /// uniform, with replacement), evaluate `statistic` on each, and keep
    /// the sorted results.
    ///
    /// `sample` must be non-empty and `iterations` non-zero.
    pub fn new<T, F>(sample: &[T], iterations: usize, rng: &mut impl Rng, statistic: F) -> Self
    where
        T: Clone,
        F: Fn(&[T]) -> f64,
    {
        assert!(!sample.is_empty(), "cannot bootstrap an empty sample");
        assert!(iterations > 0, "cannot bootstrap with zero iterations");

        let mut distribution = Vec::with_capacity(iterations);
        let mut resample = Vec::with_capacity(sample.len());
        for _ in 0..iterations {
            resample.clear();
            for _ in 0..sample.len() {
                resample.push(sample[rng.gen_range(0..sample.len())].clone());
            }
            distribution.push(statistic(&resample));
        }
        distribution.sort_by(f64::total_cmp);

        Self { distribution }
    }

    /// The two-sided interval at `confidence`, which is clamped into
    /// [0, 1]. Both bounds are values of the resampled distribution, so
    /// they always lie within the range the statistic produced.
    pub fn interval(&self, confidence: f64) -> (f64, f64) {
        let n = self.distribution.len();
        let p = confidence.clamp(0.0, 1.0);

        let upper_p = (1.0 + p) / 2.0;
        let lower_p = 1.0 - upper_p;
        // At confidence 1.0 the upper index would run off the end.
        let upper_idx = ((n as f64 * upper_p).floor() as usize).min(n - 1);
        let lower_idx = (n as f64 * lower_p).floor() as usize;

        (self.distribution[lower_idx], self.distribution[upper_idx])
    }

    /// The interval at `confidence` in `(center, half_width)` form, the
    /// shape the bar charts and summary lines want.
    pub fn mean_half_width(&self, confidence: f64) -> (f64, f64) {
        let (lo, hi) = self.interval(confidence);
        ((lo + hi) / 2.0, (hi - lo) / 2.0)
    }
}
