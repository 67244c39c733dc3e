//! Bounded time-series sample storage
//!
//! A [`GraphSeries`] is a ring buffer of `f32` samples plus the display
//! configuration used when plotting it. Memory is bounded by trimming the
//! oldest samples whenever the buffer exceeds `max_samples`; the most
//! recently pushed value is tracked separately so it stays readable even
//! after eviction (including with `max_samples == 0`, which keeps history
//! permanently empty).

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of samples retained per series
pub const DEFAULT_MAX_SAMPLES: usize = 240;

/// Display configuration for a graph series
///
/// Never validated: a zero `max_samples` just means no history, and a
/// zero-width manual range is padded at plot time. See
/// [`GraphSeries::plot_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Maximum number of samples retained (oldest dropped on overflow)
    pub max_samples: usize,
    /// Derive plot bounds from the stored samples instead of the manual range
    pub auto_scale: bool,
    /// Lower plot bound when `auto_scale` is false
    pub manual_min: f32,
    /// Upper plot bound when `auto_scale` is false
    pub manual_max: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_samples: DEFAULT_MAX_SAMPLES,
            auto_scale: true,
            manual_min: 0.0,
            manual_max: 1.0,
        }
    }
}

/// A bounded, time-ordered sample buffer with display configuration
#[derive(Debug, Clone)]
pub struct GraphSeries {
    config: GraphConfig,
    samples: VecDeque<f32>,
    latest: f32,
}

impl Default for GraphSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphSeries {
    /// Create an empty series with the default configuration
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Create an empty series with the given configuration
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            samples: VecDeque::new(),
            latest: 0.0,
        }
    }

    /// Current display configuration
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Replace the configuration and re-trim the buffer immediately
    pub fn configure(&mut self, config: GraphConfig) {
        self.config = config;
        self.trim();
    }

    /// Append one sample, trimming the oldest entries past `max_samples`
    pub fn push(&mut self, sample: f32) {
        self.latest = sample;
        self.samples.push_back(sample);
        self.trim();
    }

    /// Append samples one by one
    ///
    /// Equivalent to sequential [`push`](Self::push) calls: trimming is
    /// incremental per element, so with `max_samples = k` only the last
    /// `k` of the appended samples survive.
    pub fn extend(&mut self, samples: impl IntoIterator<Item = f32>) {
        for sample in samples {
            self.push(sample);
        }
    }

    /// Stored samples, oldest first
    pub fn samples(&self) -> &VecDeque<f32> {
        &self.samples
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples are stored
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The most recently pushed sample, even if it was trimmed from history
    ///
    /// Returns 0.0 before the first push.
    pub fn latest(&self) -> f32 {
        self.latest
    }

    /// Resolve the vertical plot bounds for this series
    ///
    /// `None` when the buffer is empty (nothing to plot). With
    /// `auto_scale` the bounds are the stored min/max, expanded by ±1.0
    /// when they coincide so a flat line still has a visible range;
    /// otherwise the manual range is returned as-is.
    pub fn plot_bounds(&self) -> Option<(f32, f32)> {
        if self.samples.is_empty() {
            return None;
        }
        if !self.config.auto_scale {
            return Some((self.config.manual_min, self.config.manual_max));
        }
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for &s in &self.samples {
            min = min.min(s);
            max = max.max(s);
        }
        if min == max {
            min -= 1.0;
            max += 1.0;
        }
        Some((min, max))
    }

    fn trim(&mut self) {
        if self.config.max_samples == 0 {
            self.samples.clear();
            return;
        }
        while self.samples.len() > self.config.max_samples {
            self.samples.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_trims_oldest_first() {
        let mut series = GraphSeries::with_config(GraphConfig {
            max_samples: 4,
            ..Default::default()
        });
        for s in [60.0, 58.0, 59.0, 61.0, 62.0] {
            series.push(s);
        }
        let stored: Vec<f32> = series.samples().iter().copied().collect();
        assert_eq!(stored, vec![58.0, 59.0, 61.0, 62.0]);
        assert_eq!(series.latest(), 62.0);
    }

    #[test]
    fn test_extend_trims_incrementally() {
        let mut series = GraphSeries::with_config(GraphConfig {
            max_samples: 2,
            ..Default::default()
        });
        series.extend([1.0, 2.0, 3.0]);
        let stored: Vec<f32> = series.samples().iter().copied().collect();
        assert_eq!(stored, vec![2.0, 3.0]);
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut series = GraphSeries::with_config(GraphConfig {
            max_samples: 0,
            ..Default::default()
        });
        series.push(5.0);
        series.push(7.0);
        assert!(series.is_empty());
        assert_eq!(series.latest(), 7.0);
    }

    #[test]
    fn test_reconfigure_retrims() {
        let mut series = GraphSeries::new();
        series.extend((0..10).map(|i| i as f32));
        assert_eq!(series.len(), 10);

        series.configure(GraphConfig {
            max_samples: 3,
            ..Default::default()
        });
        let stored: Vec<f32> = series.samples().iter().copied().collect();
        assert_eq!(stored, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_plot_bounds_auto_scale() {
        let mut series = GraphSeries::new();
        assert_eq!(series.plot_bounds(), None);

        series.extend([2.0, 8.0, 5.0]);
        assert_eq!(series.plot_bounds(), Some((2.0, 8.0)));
    }

    #[test]
    fn test_plot_bounds_degenerate_padded() {
        let mut series = GraphSeries::new();
        series.extend([3.0, 3.0, 3.0]);
        assert_eq!(series.plot_bounds(), Some((2.0, 4.0)));
    }

    #[test]
    fn test_plot_bounds_manual() {
        let mut series = GraphSeries::with_config(GraphConfig {
            auto_scale: false,
            manual_min: -10.0,
            manual_max: 10.0,
            ..Default::default()
        });
        series.push(100.0);
        assert_eq!(series.plot_bounds(), Some((-10.0, 10.0)));
    }

    // Property-based tests using proptest
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_buffer_is_suffix_of_pushes(
            samples in prop::collection::vec(-1e6f32..1e6, 0..200),
            max_samples in 0usize..50
        ) {
            let mut series = GraphSeries::with_config(GraphConfig {
                max_samples,
                ..Default::default()
            });
            for &s in &samples {
                series.push(s);
            }

            // Property: the buffer holds the last min(n, k) samples in order
            let expected_len = samples.len().min(max_samples);
            let expected: Vec<f32> = samples[samples.len() - expected_len..].to_vec();
            let stored: Vec<f32> = series.samples().iter().copied().collect();
            prop_assert_eq!(stored, expected);

            // Property: latest always equals the final push
            if let Some(&last) = samples.last() {
                prop_assert_eq!(series.latest(), last);
            }
        }
    }
}
