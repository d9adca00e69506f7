//! Perfectly inelastic coalescence of overlapping bodies
//!
//! Two bodies become one that keeps:
//! - Total mass: m = m_a + m_b
//! - Total momentum: v = (m_a v_a + m_b v_b) / m
//! - The centre of mass as its position
//!
//! The radius of the product depends on the configured [`MergeRadiusPolicy`].

use std::collections::HashSet;

use crate::bodies::Body;
use crate::core::BodyHandle;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// How the radius of a merge product is derived from its parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum MergeRadiusPolicy {
    /// `r = cbrt(r_a³ + r_b³)`, the sphere holding both volumes
    #[default]
    VolumeConserving,

    /// `r = max(r_a, r_b) + min(r_a, r_b) / 10`
    Approximate,
}

impl MergeRadiusPolicy {
    /// Radius of the product of two spheres with radii `a` and `b`
    pub fn combined_radius(&self, a: f64, b: f64) -> f64 {
        match self {
            MergeRadiusPolicy::VolumeConserving => (a.powi(3) + b.powi(3)).cbrt(),
            MergeRadiusPolicy::Approximate => a.max(b) + a.min(b) / 10.0,
        }
    }
}

/// Merges two bodies into one
///
/// The product carries the `MERGED` flag and a generation one past the older
/// of its parents.
pub fn merge_bodies(a: &Body, b: &Body, policy: MergeRadiusPolicy) -> Body {
    let total_mass = a.get_mass() + b.get_mass();

    let position = (a.get_position() * a.get_mass() + b.get_position() * b.get_mass()) / total_mass;
    let velocity = (a.momentum() + b.momentum()) / total_mass;
    let radius = policy.combined_radius(a.get_radius(), b.get_radius());
    let generation = a.get_generation().max(b.get_generation()) + 1;

    Body::merged(position, velocity, total_mass, radius, generation)
}

/// Applies merges for one pass, consuming each body at most once
#[derive(Debug, Clone)]
pub struct MergeResolver {
    policy: MergeRadiusPolicy,
    consumed: HashSet<BodyHandle>,
}

impl MergeResolver {
    /// Creates a resolver with nothing consumed yet
    pub fn new(policy: MergeRadiusPolicy) -> Self {
        Self {
            policy,
            consumed: HashSet::new(),
        }
    }

    /// Returns the radius policy in use
    pub fn policy(&self) -> MergeRadiusPolicy {
        self.policy
    }

    /// Returns true if the body was already merged during this pass
    pub fn is_consumed(&self, handle: BodyHandle) -> bool {
        self.consumed.contains(&handle)
    }

    /// Number of bodies consumed so far
    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }

    /// Handles of all consumed bodies
    pub fn consumed(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.consumed.iter().copied()
    }

    /// Merges the pair unless it is degenerate or already handled
    ///
    /// Returns `None` when both handles are the same or when either body was
    /// consumed earlier in this pass. Otherwise both are marked consumed and
    /// the product is returned.
    pub fn try_merge(&mut self, handle_a: BodyHandle, a: &Body, handle_b: BodyHandle, b: &Body) -> Option<Body> {
        if handle_a == handle_b || self.is_consumed(handle_a) || self.is_consumed(handle_b) {
            return None;
        }

        self.consumed.insert(handle_a);
        self.consumed.insert(handle_b);
        Some(merge_bodies(a, b, self.policy))
    }
}
