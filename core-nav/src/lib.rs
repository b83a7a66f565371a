//! # Navigation Core
//!
//! The navigation state machine of the Field Photo Core, plus the
//! last-location cache and the folder naming conventions it navigates by.
//!
//! ## Overview
//!
//! - [`Navigator`] owns the breadcrumb stack, loads children through the
//!   [`FolderStore`](bridge_traits::storage::FolderStore) bridge, redirects
//!   into photos folders, runs the one-shot auto-selection cascade and
//!   resolves the upload target for the current path.
//! - [`LocationCache`] persists the navigated path with a 10 hour TTL so an
//!   interrupted session resumes where it stopped.
//! - [`conventions`] holds the literal folder names and the visit naming
//!   pattern.
//!
//! Navigation is strictly sequential: transitions take `&mut self`, so a
//! superseding navigation can only start after the previous load pass has
//! returned, and stale responses are unrepresentable.

pub mod cache;
pub mod conventions;
pub mod error;
pub mod navigator;
pub mod types;

pub use cache::{LocationCache, SavedLocation, LOCATION_KEY, LOCATION_TTL_MILLIS};
pub use error::{NavError, Result};
pub use navigator::Navigator;
pub use types::{Breadcrumb, FileItem, FolderItem, NavView, TargetFolder};
