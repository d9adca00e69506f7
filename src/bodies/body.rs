use nalgebra as na;

use crate::bodies::{BodyFlags, Material};
use crate::error::PhysicsError;
use crate::math::{self, Vector3};
use crate::Result;

/// Colour hint for bodies placed by population seeding
pub const SEEDED_COLOR: u32 = 0xff0000;

/// Colour hint for bodies produced by a merge
pub const MERGED_COLOR: u32 = 0x34ebba;

/// One simulated sphere: kinematics, mass, radius and the force gathered this step
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Position of the centre in world space
    position: Vector3,

    /// Linear velocity
    velocity: Vector3,

    /// Acceleration derived from the accumulated force at the last update
    acceleration: Vector3,

    /// Force accumulated for the current step
    force: Vector3,

    /// Mass, always positive
    mass: f64,

    /// Radius, always positive
    radius: f64,

    /// Origin flags
    flags: BodyFlags,

    /// Number of merges in this body's ancestry (0 for seeded bodies)
    generation: u32,

    /// Opaque colour hint for renderers
    color: u32,
}

/// What a renderer needs to draw one body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderHint {
    /// Centre of the sphere
    pub position: na::Point3<f64>,

    /// Sphere radius
    pub radius: f64,

    /// Colour hint (0xRRGGBB)
    pub color: u32,

    /// Merge generation, 0 for bodies that never merged
    pub generation: u32,
}

impl Body {
    /// Creates a body with zero force and acceleration
    pub fn new(position: Vector3, velocity: Vector3, mass: f64, radius: f64) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "body mass must be positive and finite, got {}",
                mass
            )));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "body radius must be positive and finite, got {}",
                radius
            )));
        }
        if !position.is_finite() || !velocity.is_finite() {
            return Err(PhysicsError::InvalidParameter(
                "body position and velocity must be finite".to_string(),
            ));
        }

        Ok(Self {
            position,
            velocity,
            acceleration: Vector3::zero(),
            force: Vector3::zero(),
            mass,
            radius,
            flags: BodyFlags::empty(),
            generation: 0,
            color: SEEDED_COLOR,
        })
    }

    /// Creates a body whose radius follows from its mass and the material density
    pub fn with_material(position: Vector3, velocity: Vector3, mass: f64, material: Material) -> Result<Self> {
        if !(material.density.is_finite() && material.density > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "material density must be positive and finite, got {}",
                material.density
            )));
        }
        let radius = math::sphere_radius_for(mass, material.density);
        Self::new(position, velocity, mass, radius)
    }

    /// Creates a merge product; only the resolver builds bodies this way
    pub(crate) fn merged(position: Vector3, velocity: Vector3, mass: f64, radius: f64, generation: u32) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector3::zero(),
            force: Vector3::zero(),
            mass,
            radius,
            flags: BodyFlags::MERGED,
            generation,
            color: MERGED_COLOR,
        }
    }

    /// Marks the body as placed by population seeding
    pub(crate) fn mark_seeded(&mut self) {
        self.flags.insert(BodyFlags::SEEDED);
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vector3 {
        self.position
    }

    /// Sets the body's position
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Returns the body's velocity
    pub fn get_velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Sets the body's velocity
    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    /// Returns the acceleration used by the last integration
    pub fn get_acceleration(&self) -> Vector3 {
        self.acceleration
    }

    /// Returns the force accumulated for the current step
    pub fn get_force(&self) -> Vector3 {
        self.force
    }

    /// Returns the body's mass
    pub fn get_mass(&self) -> f64 {
        self.mass
    }

    /// Returns the body's radius
    pub fn get_radius(&self) -> f64 {
        self.radius
    }

    /// Returns the body's origin flags
    pub fn get_flags(&self) -> BodyFlags {
        self.flags
    }

    /// Returns how many merges produced this body
    pub fn get_generation(&self) -> u32 {
        self.generation
    }

    /// Returns the colour hint
    pub fn get_color(&self) -> u32 {
        self.color
    }

    /// Returns true if this body is the product of a merge
    pub fn is_merge_product(&self) -> bool {
        self.flags.contains(BodyFlags::MERGED)
    }

    /// Adds a force to the accumulator
    pub fn apply_force(&mut self, force: Vector3) {
        self.force += force;
    }

    /// Replaces the accumulated force
    pub fn set_force(&mut self, force: Vector3) {
        self.force = force;
    }

    /// Clears the accumulated force
    pub fn clear_forces(&mut self) {
        self.force = Vector3::zero();
    }

    /// Recomputes `acceleration = force / mass`
    pub fn update_acceleration(&mut self) {
        self.acceleration = self.force / self.mass;
    }

    /// Advances velocity then position by `dt`
    ///
    /// `v += a·dt` is applied first and the position update uses the new
    /// velocity: `x += v·dt + ½·a·dt²`. The force accumulator is untouched.
    pub fn integrate(&mut self, dt: f64) {
        let a = self.acceleration;
        self.velocity += a * dt;
        self.position += self.velocity * dt + a * (0.5 * dt * dt);
    }

    /// Euclidean norm of the velocity
    pub fn instant_speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Linear momentum `m·v`
    pub fn momentum(&self) -> Vector3 {
        self.velocity * self.mass
    }

    /// Volume of the sphere
    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * std::f64::consts::PI * self.radius.powi(3)
    }

    /// Returns true if the two spheres overlap
    ///
    /// Centres closer than the sum of radii overlap; touching spheres do not.
    /// A body never overlaps itself.
    pub fn overlaps(&self, other: &Body) -> bool {
        if std::ptr::eq(self, other) {
            return false;
        }
        self.position.distance(&other.position) < self.radius + other.radius
    }

    /// Snapshot for the presentation layer
    pub fn render_hint(&self) -> RenderHint {
        RenderHint {
            position: self.position.to_point(),
            radius: self.radius,
            color: self.color,
            generation: self.generation,
        }
    }
}
