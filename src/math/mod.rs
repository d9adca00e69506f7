mod vector;
pub mod sampling;

pub use vector::Vector3;
pub use sampling::{random_in_range, spherical_to_cartesian, sphere_radius_for, percent_of};

/// Constant for a very small number, used for comparisons
pub const EPSILON: f64 = 1.0e-12;

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f64) -> bool {
    a.abs() < EPSILON
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: &Vector3, b: &Vector3) -> f64 {
    a.distance(b)
}
