// SPDX-License-Identifier: MPL-2.0

//! Capture application model
//!
//! # Architecture
//!
//! - `session`: the camera capture session (permission, presentation, stream)
//! - `state`: state types, `Message` and `Command`
//! - `toast`: notification queue
//! - `view`: front-end independent view model
//! - `update`: message dispatch into the `handlers` submodules
//!
//! The model never awaits anything itself. `update()` returns a [`Command`]
//! and the front end runs it, feeding acquisition results back as messages.

mod handlers;
pub mod session;
mod state;
pub mod toast;
mod update;
pub mod view;

pub use session::{AccessOutcome, AcquireRequest, AcquireTicket, CaptureSession, RequestTrigger};
pub use state::{CaptureApp, Command, Message, PermissionState, Presentation, SessionState};
pub use toast::{Toast, ToastAction, ToastMessage, Toasts};
pub use view::{Control, SessionView, StatusLine};

use crate::backends::camera::MediaProvider;
use crate::config::Config;
use crate::pipelines::photo::CapturedFrame;
use crate::submission::Uploader;
use std::sync::Arc;

impl<P: MediaProvider> CaptureApp<P> {
    pub fn new(provider: Arc<P>, uploader: Arc<dyn Uploader>, config: &Config) -> Self {
        Self {
            session: CaptureSession::new(
                provider,
                config.constraints(),
                config.auto_full_screen,
            ),
            uploader,
            acquire: config.acquire,
            photo_dir: config.photo_directory(),
            pending: None,
            review_open: false,
            toasts: Toasts::default(),
        }
    }

    pub fn session(&self) -> &CaptureSession<P> {
        &self.session
    }

    /// Still waiting for review, if any
    pub fn pending_frame(&self) -> Option<&CapturedFrame> {
        self.pending.as_ref()
    }

    pub fn is_review_open(&self) -> bool {
        self.review_open
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }
}
