//! Shared building blocks for the data modules.

pub mod handle;
