//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates. Host applications can depend on `appservices-bridge` and
//! enable `desktop-shims` (reqwest backend, console logger) or `headless`
//! (bring your own backend and host logger) without wiring each crate
//! individually.

#[cfg(any(feature = "desktop-shims", feature = "headless"))]
pub use core_service::*;
