pub mod detection;
pub mod merge;

pub use self::detection::{overlaps, first_overlap};
pub use self::merge::{merge_bodies, MergeRadiusPolicy, MergeResolver};
