use crate::bodies::Body;
use crate::collision;
use crate::core::{BodyHandle, BodyStorage};
use crate::math::Vector3;
use crate::Result;

/// Outcome of evaluating one body against the rest of the population
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// The body overlaps this partner (the first one found in iteration order)
    Collision(BodyHandle),

    /// The body overlaps nothing; this is the net force on it
    Force(Vector3),
}

/// Force exerted on `target` by `source`
///
/// `F = G · m_t · m_s · (x_t − x_s) / |x_t − x_s|³` with no softening. With a
/// negative `G` the force points from `target` towards `source`. Very small
/// separations give very large forces; overlapping pairs never reach this
/// function through [`PairwiseGravity::evaluate`].
#[inline]
pub fn gravitational_force(target: &Body, source: &Body, gravitational_constant: f64) -> Vector3 {
    let offset = target.get_position() - source.get_position();
    let distance_cubed = offset.length().powi(3);
    offset * (gravitational_constant * target.get_mass() * source.get_mass() / distance_cubed)
}

/// Direct-summation gravity between every pair of bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairwiseGravity {
    /// The signed force constant
    gravitational_constant: f64,
}

impl PairwiseGravity {
    /// Creates a new evaluator with the given constant
    pub fn new(gravitational_constant: f64) -> Self {
        Self { gravitational_constant }
    }

    /// Gets the gravitational constant
    pub fn get_gravitational_constant(&self) -> f64 {
        self.gravitational_constant
    }

    /// Evaluates a stored body against every other stored body
    pub fn evaluate(&self, target: BodyHandle, bodies: &BodyStorage<Body>) -> Result<Interaction> {
        let body = bodies.get_body(target)?;
        Ok(self.evaluate_against(target, body, bodies.iter()))
    }

    /// Evaluates `body` against `others`
    ///
    /// Any overlap wins: the first overlapping partner in iteration order is
    /// reported and the force gathered so far is discarded. Entries carrying
    /// the target's own handle are skipped.
    pub fn evaluate_against<'a, I>(&self, target: BodyHandle, body: &Body, others: I) -> Interaction
    where
        I: IntoIterator<Item = (BodyHandle, &'a Body)>,
    {
        let mut force = Vector3::zero();
        for (handle, other) in others {
            if handle == target {
                continue;
            }
            if collision::overlaps(body, other) {
                return Interaction::Collision(handle);
            }
            force += gravitational_force(body, other, self.gravitational_constant);
        }

        Interaction::Force(force)
    }
}
