//! Random sampling and coordinate helpers used when seeding a population.

use std::f64::consts::PI;

use rand::Rng;

use crate::math::Vector3;

/// Draws a uniform sample from `[min + epsilon, max - epsilon)`
///
/// With `epsilon = 0` the result can equal `min` but never `max`. A positive
/// `epsilon` keeps samples strictly away from both ends, which is how polar
/// angles avoid the exact poles.
pub fn random_in_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64, epsilon: f64) -> f64 {
    let low = min + epsilon;
    let high = max - epsilon;
    let u: f64 = rng.gen();
    u * (high - low) + low
}

/// Converts spherical coordinates to a Cartesian position
///
/// `theta` is measured from the +z axis and `phi` is the azimuth in the xy
/// plane: `x = r sinθ cosφ`, `y = r sinθ sinφ`, `z = r cosθ`.
pub fn spherical_to_cartesian(r: f64, theta: f64, phi: f64) -> Vector3 {
    Vector3::new(
        r * theta.sin() * phi.cos(),
        r * theta.sin() * phi.sin(),
        r * theta.cos(),
    )
}

/// Radius of a homogeneous sphere of the given mass and density
pub fn sphere_radius_for(mass: f64, density: f64) -> f64 {
    (mass / (4.0 / 3.0 * PI * density)).cbrt()
}

/// Converts a percentage slider value into absolute units, rounding down
///
/// Used by control surfaces that express the initial distance as a percentage
/// of the global radius and the minimum mass as a percentage of the maximum.
pub fn percent_of(value: f64, percent: f64) -> f64 {
    (value * (percent / 100.0)).floor()
}
