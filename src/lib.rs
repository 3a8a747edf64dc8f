//! Serigy: a clipboard history that keeps the last few copies in a fixed
//! grid of slots.
//!
//! The engine lives in the workspace crates; this crate only resolves
//! configuration, sets up tracing and wires adapters together.

pub mod adapters;
pub mod bootstrap;
