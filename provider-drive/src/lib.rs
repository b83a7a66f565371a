//! # Drive Provider
//!
//! Implements the `FolderStore` trait for the site-visit folder webhook.
//!
//! ## Overview
//!
//! This crate provides:
//! - Folder listing with folder/file partitioning data (child counts)
//! - Folder creation, item rename and delete
//! - Base64 file upload
//! - Thumbnail reference fetch
//! - Status-code mapping (409 rename conflicts surface distinctly)

pub mod client;
pub mod error;
pub mod types;

pub use client::DriveClient;
pub use error::{DriveError, Result};
