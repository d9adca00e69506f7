mod gravity;

pub use self::gravity::{gravitational_force, Interaction, PairwiseGravity};
