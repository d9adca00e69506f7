/// Density presets for seeded bodies
///
/// Densities are in the simulation's own units where water is `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Density used to derive a body's radius from its mass
    pub density: f64,
}

impl Material {
    /// Creates a new material with the given density
    pub fn new(density: f64) -> Self {
        Self { density }
    }

    /// Water, the least dense preset and the default lower density bound
    pub fn water() -> Self {
        Self { density: 1.0 }
    }

    /// Osmium, the densest natural element and the default upper density bound
    pub fn osmium() -> Self {
        Self { density: 22.5 }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::water()
    }
}
