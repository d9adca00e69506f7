use std::sync::{Arc, RwLock};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Name under which the live body count is published
pub const REMAINING_PARTICLES: &str = "remaining_particles";

/// Name under which the mean body speed is published
pub const SYSTEM_AVERAGE_SPEED: &str = "system_average_speed";

/// Aggregate metrics recomputed after every step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Statistics {
    /// Number of live bodies
    pub remaining_particles: usize,

    /// Mean speed of the live bodies; `None` when there are none
    pub system_average_speed: Option<f64>,
}

/// A single published metric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Count(usize),
    Real(Option<f64>),
}

impl Statistics {
    /// Computes statistics from a set of speeds
    ///
    /// Speeds that are not finite are left out of the mean but the body still
    /// counts towards `remaining_particles`.
    pub fn from_speeds<I>(speeds: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0;
        let mut sampled = 0;
        let mut sum = 0.0;

        for speed in speeds {
            count += 1;
            if speed.is_finite() {
                sampled += 1;
                sum += speed;
            }
        }

        Self {
            remaining_particles: count,
            system_average_speed: if sampled > 0 { Some(sum / sampled as f64) } else { None },
        }
    }

    /// Looks up a metric by its published name
    pub fn metric(&self, name: &str) -> Option<MetricValue> {
        match name {
            REMAINING_PARTICLES => Some(MetricValue::Count(self.remaining_particles)),
            SYSTEM_AVERAGE_SPEED => Some(MetricValue::Real(self.system_average_speed)),
            _ => None,
        }
    }

    /// All metrics as `(name, value)` pairs
    pub fn metrics(&self) -> [(&'static str, MetricValue); 2] {
        [
            (REMAINING_PARTICLES, MetricValue::Count(self.remaining_particles)),
            (SYSTEM_AVERAGE_SPEED, MetricValue::Real(self.system_average_speed)),
        ]
    }
}

/// Read-only, cloneable view of the world's latest statistics
///
/// Readers on other threads may poll at any cadence. A snapshot taken during a
/// reset may reflect either the old or the new population.
#[derive(Debug, Clone, Default)]
pub struct StatisticsFeed {
    inner: Arc<RwLock<Statistics>>,
}

impl StatisticsFeed {
    /// Creates a feed holding empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the latest published statistics
    pub fn snapshot(&self) -> Statistics {
        match self.inner.read() {
            Ok(stats) => *stats,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub(crate) fn publish(&self, statistics: Statistics) {
        match self.inner.write() {
            Ok(mut stats) => *stats = statistics,
            Err(poisoned) => *poisoned.into_inner() = statistics,
        }
    }
}
