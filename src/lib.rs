//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the
//! individual workspace crates (e.g., `core-service`). Host applications can
//! depend on `fieldphoto-workspace` and enable the documented features
//! without needing to wire each crate individually.
//!
//! ## Features
//!
//! - `desktop-shims` (default): pulls `core-service` with its desktop HTTP
//!   default so a session only needs an endpoint URL and a settings store.

#[cfg(feature = "desktop-shims")]
pub use core_service;
