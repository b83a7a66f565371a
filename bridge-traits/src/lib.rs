//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and
//! platform-specific implementations. Each trait represents a capability the
//! core requires but that must be implemented differently per host (desktop,
//! mobile webview, tests).
//!
//! ## Traits
//!
//! ### Networking & Remote Store
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with retry and TLS
//! - [`FolderStore`](storage::FolderStore) - The remote hierarchical folder store
//!
//! ### Local Persistence
//! - [`SettingsStore`](storage::SettingsStore) - Key-value persistence for the
//!   last-location snapshot and preferences
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Fail-Fast Strategy
//!
//! The core should fail fast with descriptive errors when a required
//! capability is missing:
//!
//! ```ignore
//! let settings_store = config.settings_store
//!     .ok_or_else(|| CoreError::CapabilityMissing {
//!         capability: "SettingsStore".to_string(),
//!         message: "No settings store provided. \
//!                  Desktop: enable the desktop-shims feature. \
//!                  Other hosts: inject a platform adapter.".to_string()
//!     })?;
//! ```
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Platform implementations should convert platform-specific errors to
//! `BridgeError` and preserve the remote status code in
//! [`BridgeError::Remote`](error::BridgeError::Remote) so callers can
//! distinguish naming conflicts (409) from generic failures.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks.

pub mod error;
pub mod http;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use storage::{ChildItem, CreatedItem, FolderStore, SettingsStore};
pub use time::{Clock, SystemClock};
