use crate::collision::MergeRadiusPolicy;
use crate::error::PhysicsError;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Fraction of the global radius that an out-of-range initial distance is clamped to
pub const INITIAL_DISTANCE_CLAMP: f64 = 0.99;

/// An inclusive `[min, max]` range used for sampled body properties
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Creates a new range
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `min` and `max` are finite, positive and ordered
    pub fn is_positive_range(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }

    /// Returns true if the value lies inside the range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Configuration parameters for the simulation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Signed force constant; negative values attract
    pub gravitational_constant: f64,

    /// Radius of the sphere that bodies are seeded inside
    pub global_radius: f64,

    /// Minimum distance from the origin at which bodies are seeded
    pub initial_distance_from_origin: f64,

    /// Bound of the uniform initial speed per axis; zero seeds bodies at rest
    pub initial_speed_bound: f64,

    /// Number of bodies seeded on construction and reset
    pub particle_count: usize,

    /// Range of seeded masses
    pub mass_bounds: Bounds,

    /// Range of seeded densities
    pub density_bounds: Bounds,

    /// Selects the volume-conserving merge radius instead of the approximate one
    pub enlarge_radius_after_bonding: bool,

    /// Seed for reproducible populations; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: -1.0,
            global_radius: 1000.0,
            initial_distance_from_origin: 100.0,
            initial_speed_bound: 0.0,
            particle_count: 1000,
            mass_bounds: Bounds::new(10.0, 500.0),
            density_bounds: Bounds::new(1.0, 22.5), // water to osmium
            enlarge_radius_after_bonding: true,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Returns the merge radius policy selected by `enlarge_radius_after_bonding`
    pub fn merge_radius_policy(&self) -> MergeRadiusPolicy {
        if self.enlarge_radius_after_bonding {
            MergeRadiusPolicy::VolumeConserving
        } else {
            MergeRadiusPolicy::Approximate
        }
    }

    /// Checks every field and returns the normalized configuration
    ///
    /// The only adjustment made is the initial-distance clamp: a distance at or
    /// beyond the global radius becomes `0.99 × global_radius`. Everything else
    /// that is out of range is rejected.
    pub fn validate(&self) -> Result<SimulationConfig> {
        if !self.gravitational_constant.is_finite() {
            return Err(invalid("gravitational_constant", "must be finite"));
        }
        if !(self.global_radius.is_finite() && self.global_radius > 0.0) {
            return Err(invalid("global_radius", "must be positive and finite"));
        }
        if !(self.initial_distance_from_origin.is_finite() && self.initial_distance_from_origin >= 0.0) {
            return Err(invalid("initial_distance_from_origin", "must be non-negative and finite"));
        }
        if !(self.initial_speed_bound.is_finite() && self.initial_speed_bound >= 0.0) {
            return Err(invalid("initial_speed_bound", "must be non-negative and finite"));
        }
        if self.particle_count == 0 {
            return Err(invalid("particle_count", "must be at least 1"));
        }
        if !self.mass_bounds.is_positive_range() {
            return Err(invalid("mass_bounds", "must satisfy 0 < min <= max"));
        }
        if !self.density_bounds.is_positive_range() {
            return Err(invalid("density_bounds", "must satisfy 0 < min <= max"));
        }

        let mut normalized = self.clone();
        if normalized.initial_distance_from_origin >= normalized.global_radius {
            let clamped = normalized.global_radius * INITIAL_DISTANCE_CLAMP;
            log::warn!(
                "initial distance {} is not inside global radius {}, using {}",
                normalized.initial_distance_from_origin,
                normalized.global_radius,
                clamped
            );
            normalized.initial_distance_from_origin = clamped;
        }

        Ok(normalized)
    }
}

fn invalid(field: &str, reason: &str) -> PhysicsError {
    PhysicsError::InvalidConfiguration(format!("{} {}", field, reason))
}

/// A partial configuration change; omitted fields keep their current value
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ConfigUpdate {
    pub gravitational_constant: Option<f64>,
    pub global_radius: Option<f64>,
    pub initial_distance_from_origin: Option<f64>,
    pub initial_speed_bound: Option<f64>,
    pub particle_count: Option<usize>,
    pub mass_bounds: Option<Bounds>,
    pub density_bounds: Option<Bounds>,
    pub enlarge_radius_after_bonding: Option<bool>,
    pub seed: Option<u64>,
}

impl ConfigUpdate {
    /// Creates an update that changes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial distance as a percentage of `global_radius`
    pub fn initial_distance_percent(mut self, percent: f64, global_radius: f64) -> Self {
        self.initial_distance_from_origin = Some(crate::math::percent_of(global_radius, percent));
        self
    }

    /// Sets the mass range with the minimum expressed as a percentage of the maximum
    pub fn mass_range_percent(mut self, max: f64, min_percent: f64) -> Self {
        self.mass_bounds = Some(Bounds::new(crate::math::percent_of(max, min_percent), max));
        self
    }

    /// Returns true if no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges this update over `base`
    pub fn apply_to(&self, base: &SimulationConfig) -> SimulationConfig {
        SimulationConfig {
            gravitational_constant: self.gravitational_constant.unwrap_or(base.gravitational_constant),
            global_radius: self.global_radius.unwrap_or(base.global_radius),
            initial_distance_from_origin: self
                .initial_distance_from_origin
                .unwrap_or(base.initial_distance_from_origin),
            initial_speed_bound: self.initial_speed_bound.unwrap_or(base.initial_speed_bound),
            particle_count: self.particle_count.unwrap_or(base.particle_count),
            mass_bounds: self.mass_bounds.unwrap_or(base.mass_bounds),
            density_bounds: self.density_bounds.unwrap_or(base.density_bounds),
            enlarge_radius_after_bonding: self
                .enlarge_radius_after_bonding
                .unwrap_or(base.enlarge_radius_after_bonding),
            seed: self.seed.or(base.seed),
        }
    }
}
