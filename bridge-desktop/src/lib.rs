//! # Desktop Bridge Implementations
//!
//! Desktop adapters for the bridge traits:
//! - [`ReqwestHttpClient`] - HTTP via reqwest with connection pooling and retry
//! - [`SqliteSettingsStore`] - key-value persistence via SQLite

pub mod http;
pub mod settings;

pub use http::ReqwestHttpClient;
pub use settings::{default_settings_path, SqliteSettingsStore};
