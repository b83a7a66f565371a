//! # Core Runtime
//!
//! Shared runtime services for the Field Photo Core:
//! - [`events`] - typed event bus (`tokio::sync::broadcast`) connecting the
//!   domain state machines to presentation-layer observers
//! - [`logging`] - `tracing`/`tracing-subscriber` initialization

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus, NavEvent, UploadEvent};
pub use logging::{init_logging, LogFormat, LoggingConfig};
