pub mod world;
pub mod config;
pub mod storage;
pub mod events;
pub mod statistics;
pub mod stepper;

pub use self::world::{World, StepReport};
pub use self::config::{SimulationConfig, ConfigUpdate, Bounds};
pub use self::storage::BodyStorage;
pub use self::events::{EventQueue, BodyEvent, BodyEventType, MergeEvent};
pub use self::statistics::{Statistics, StatisticsFeed, MetricValue};
pub use self::stepper::{Stepper, Clock, SystemClock, FixedClock};

/// A unique identifier for a body in the world
///
/// Handles are never reused, so a handle to a merged-away body stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u64);

impl BodyHandle {
    /// The raw identifier
    pub fn id(&self) -> u64 {
        self.0
    }
}
