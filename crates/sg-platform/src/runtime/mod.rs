pub mod event_bus;
#[allow(clippy::module_inception)]
mod runtime;

pub use runtime::{PlatformRuntime, DEFAULT_POLL_INTERVAL};
