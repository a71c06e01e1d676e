// Mock time-series generation
//
// Produces a deterministic-shape, randomized-value series: uniform noise on a
// base level, a linear trend and an optional single-index spike. The random
// source is always supplied by the caller so tests can seed it.

use crate::models::MetricPoint;
use rand::Rng;

/// Parameters for one generated series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    /// Number of points to emit
    pub point_count: usize,
    /// Level every point starts from
    pub base: f64,
    /// Width of the uniform noise added to each point
    pub variance: f64,
    /// Amount added per index
    pub trend: f64,
    /// Index that receives an extra `2 * base`; out-of-range means no spike
    pub spike_index: Option<usize>,
    /// Suffix appended to the index to form the time label
    pub time_unit: String,
}

impl SeriesSpec {
    pub fn new(point_count: usize, base: f64, variance: f64) -> Self {
        Self {
            point_count,
            base,
            variance,
            trend: 0.0,
            spike_index: None,
            time_unit: "s".to_string(),
        }
    }

    pub fn with_trend(mut self, trend: f64) -> Self {
        self.trend = trend;
        self
    }

    pub fn with_spike(mut self, index: usize) -> Self {
        self.spike_index = Some(index);
        self
    }

    pub fn with_time_unit(mut self, unit: &str) -> Self {
        self.time_unit = unit.to_string();
        self
    }
}

/// Round to one decimal place
#[inline]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Uniform sample in `[0, width)`; zero width yields zero
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, width: f64) -> f64 {
    rng.gen::<f64>() * width
}

/// Time label for a point: index followed by the unit suffix
pub fn time_label(index: usize, unit: &str) -> String {
    format!("{}{}", index, unit)
}

/// Generate `spec.point_count` points in ascending index order.
///
/// Point `i` has `value = base + U(0, variance) + i * trend` (plus `2 * base`
/// at the spike index), floored at zero, and
/// `optimized = 0.4 * value + U(0, 0.2 * variance)`, floored at zero.
/// Both are rounded to one decimal place.
pub fn generate_series<R: Rng + ?Sized>(spec: &SeriesSpec, rng: &mut R) -> Vec<MetricPoint> {
    (0..spec.point_count)
        .map(|i| {
            let mut value = spec.base + uniform(rng, spec.variance) + i as f64 * spec.trend;
            if spec.spike_index == Some(i) {
                value += spec.base * 2.0;
            }
            let value = value.max(0.0);

            let optimized = (value * 0.4 + uniform(rng, spec.variance * 0.2)).max(0.0);

            MetricPoint {
                time: time_label(i, &spec.time_unit),
                value: round1(value),
                optimized_value: round1(optimized),
            }
        })
        .collect()
}
