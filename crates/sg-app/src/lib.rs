//! Serigy application layer
//!
//! Use cases and the services that own runtime state: the slot store, the
//! ingestion queue and the expiry sweeper. Everything talks to the outside
//! world through `sg_core::ports`.

pub mod deps;
pub mod engine;
pub mod queue;
pub mod store;
pub mod sweeper;
pub mod usecases;

#[cfg(test)]
mod test_support;

pub use deps::AppDeps;
pub use engine::ClipboardEngine;
pub use queue::{ClipboardItemProcessor, IngestionQueue};
pub use store::SlotStore;
pub use sweeper::{ExpirySweeper, SweepOutcome};
pub use usecases::SlotCommand;
