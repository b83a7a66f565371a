//! # Upload Core
//!
//! The photo intake queue and upload orchestrator of the Field Photo Core.
//!
//! ## Overview
//!
//! - [`IntakeQueue`] owns the staged photos, assigns default integer names
//!   above everything already uploaded or queued, and normalizes each photo
//!   on intake through the transcode pipeline.
//! - [`UploadOrchestrator`] lazily creates the photos folder (exactly once
//!   per batch), submits all photos concurrently, settles each one
//!   independently and reports an aggregate [`BatchReport`].
//!
//! A batch always runs to completion of all its item settlements; there is
//! no cancellation, and retry of failed photos is user-initiated.

pub mod error;
pub mod orchestrator;
pub mod queue;
pub mod types;

pub use error::{Result, UploadError};
pub use orchestrator::{BatchOutcome, BatchReport, UploadOrchestrator};
pub use queue::IntakeQueue;
pub use types::{IntakePhoto, PhotoStatus, SourcePhoto};
