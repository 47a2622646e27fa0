// SPDX-License-Identifier: MPL-2.0

//! stillcam - camera capture session with still review and submission
//!
//! # Architecture
//!
//! - [`app`]: capture session state machine and the UI-side app model
//! - [`backends`]: camera provider abstraction (GStreamer, test pattern)
//! - [`pipelines`]: still capture and PNG encoding
//! - [`submission`]: best-effort upload of reviewed stills
//! - [`storage`]: saving stills to disk
//! - [`config`]: user configuration handling
//! - [`terminal`]: terminal front end

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod pipelines;
pub mod storage;
pub mod submission;
pub mod terminal;

// Re-export commonly used types
pub use app::{CaptureApp, CaptureSession, Command, Message};
pub use config::Config;
pub use errors::{AppError, AppResult};
