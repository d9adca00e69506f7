pub mod math;
pub mod core;
pub mod bodies;
pub mod collision;
pub mod forces;

/// Re-export common types for easier usage
pub use crate::core::{World, SimulationConfig, ConfigUpdate, Statistics, Stepper, BodyHandle};
pub use crate::bodies::{Body, Material, RenderHint};
pub use crate::collision::MergeRadiusPolicy;
pub use crate::math::Vector3;

/// Error types for the engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        #[error("Invalid configuration: {0}")]
        InvalidConfiguration(String),

        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        #[error("Simulation error: {0}")]
        SimulationError(String),
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;
