pub mod counters;
pub mod loader;
pub mod types;

pub use counters::{AdoptionCounts, Counters, FleetCounters, LegacyCounts, ReprovisionCounts};
pub use loader::load_records;
pub use types::DeviceRecord;
