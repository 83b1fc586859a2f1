//! Display schedulers: the workers that actually print alarms.

mod registry;
mod rotation;
mod scheduler;
mod snapshot;

pub use registry::DisplayRegistry;
pub use rotation::Rotation;
pub use scheduler::{DisplayScheduler, SLOTS_PER_SCHEDULER};
pub use snapshot::{SlotOutcome, Snapshot};
