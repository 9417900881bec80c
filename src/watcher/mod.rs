//! PR watching subsystem - periodic scheduler plus the one-shot broadcast pass

mod broadcast;
mod check;
mod scheduler;

pub use broadcast::{broadcast, BroadcastReport};
pub use check::{observe, Observation};
pub use scheduler::{CheckOutcome, CycleReport, WatchOutcome, WatchSettings, Watcher};
