mod body;
mod material;

pub use self::body::{Body, RenderHint, SEEDED_COLOR, MERGED_COLOR};
pub use self::material::Material;
pub use self::body_flags::BodyFlags;

/// Flags describing where a body came from
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Origin flags carried by every body
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
        pub struct BodyFlags: u32 {
            /// Body was placed by population seeding
            const SEEDED = 0x01;

            /// Body is the product of an inelastic merge
            const MERGED = 0x02;
        }
    }
}
