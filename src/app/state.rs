// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::session::{AcquireRequest, AcquireTicket, CaptureSession};
use crate::app::toast::Toasts;
use crate::backends::camera::{BackendResult, MediaProvider};
use crate::config::AcquireTrigger;
use crate::pipelines::photo::CapturedFrame;
use crate::submission::Uploader;
use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Permission as the user sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    NotRequested,
    Requesting,
    Granted,
    Denied,
}

/// How the live preview is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presentation {
    #[default]
    Inline,
    FullScreen,
}

/// Permission and presentation in one state machine
///
/// The stream lives inside `Granted`, so a stream exists exactly when access
/// is granted, and full screen cannot be entered without one.
pub enum SessionState<S> {
    /// Nothing requested yet, or the camera was closed
    Idle,
    /// Waiting for the provider; `attempt` identifies the request in flight
    Requesting { attempt: u64 },
    Granted {
        stream: S,
        presentation: Presentation,
    },
    /// Acquisition failed; `message` is what the user is shown
    Denied { message: String },
}

impl<S> Default for SessionState<S> {
    fn default() -> Self {
        SessionState::Idle
    }
}

impl<S> std::fmt::Debug for SessionState<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Requesting { attempt } => {
                f.debug_struct("Requesting").field("attempt", attempt).finish()
            }
            SessionState::Granted { presentation, .. } => f
                .debug_struct("Granted")
                .field("presentation", presentation)
                .finish_non_exhaustive(),
            SessionState::Denied { message } => {
                f.debug_struct("Denied").field("message", message).finish()
            }
        }
    }
}

impl<S> SessionState<S> {
    pub fn permission(&self) -> PermissionState {
        match self {
            SessionState::Idle => PermissionState::NotRequested,
            SessionState::Requesting { .. } => PermissionState::Requesting,
            SessionState::Granted { .. } => PermissionState::Granted,
            SessionState::Denied { .. } => PermissionState::Denied,
        }
    }

    /// Current presentation; anything but a granted full-screen session is inline
    pub fn presentation(&self) -> Presentation {
        match self {
            SessionState::Granted { presentation, .. } => *presentation,
            _ => Presentation::Inline,
        }
    }

    pub fn stream(&self) -> Option<&S> {
        match self {
            SessionState::Granted { stream, .. } => Some(stream),
            _ => None,
        }
    }

    /// Error message, only present while denied
    pub fn last_error(&self) -> Option<&str> {
        match self {
            SessionState::Denied { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, SessionState::Granted { .. })
    }
}

/// Everything the front end can tell the app
pub enum Message<S> {
    /// Session mounted
    Start,
    /// User pressed "Open Camera"
    OpenCamera,
    /// An acquisition finished
    CameraAcquired(AcquireTicket, BackendResult<S>),
    TakeStill,
    /// Toast action: open the review dialog for this frame
    Inspect(Uuid),
    DismissToast(u64),
    Discard,
    Submit,
    /// Save the pending still to the photo directory
    SaveStill,
    EnterFullScreen,
    ExitFullScreen,
    /// Stop the camera and return to the inline idle view
    Close,
    Tick(Instant),
    /// The front end is going away
    Shutdown,
}

impl<S> std::fmt::Debug for Message<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Start => write!(f, "Start"),
            Message::OpenCamera => write!(f, "OpenCamera"),
            Message::CameraAcquired(ticket, result) => f
                .debug_tuple("CameraAcquired")
                .field(ticket)
                .field(&result.as_ref().map(|_| "stream"))
                .finish(),
            Message::TakeStill => write!(f, "TakeStill"),
            Message::Inspect(id) => f.debug_tuple("Inspect").field(id).finish(),
            Message::DismissToast(id) => f.debug_tuple("DismissToast").field(id).finish(),
            Message::Discard => write!(f, "Discard"),
            Message::Submit => write!(f, "Submit"),
            Message::SaveStill => write!(f, "SaveStill"),
            Message::EnterFullScreen => write!(f, "EnterFullScreen"),
            Message::ExitFullScreen => write!(f, "ExitFullScreen"),
            Message::Close => write!(f, "Close"),
            Message::Tick(at) => f.debug_tuple("Tick").field(at).finish(),
            Message::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// Async work requested by `update`, run by the front end's runtime
#[must_use]
pub enum Command<S> {
    None,
    /// Await the request and feed the result back as [`Message::CameraAcquired`]
    Acquire(AcquireRequest<S>),
    /// Fire and forget
    Upload(BoxFuture<'static, ()>),
}

impl<S> Command<S> {
    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

impl<S> std::fmt::Debug for Command<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::None => write!(f, "None"),
            Command::Acquire(request) => f.debug_tuple("Acquire").field(&request.ticket).finish(),
            Command::Upload(_) => write!(f, "Upload"),
        }
    }
}

/// UI-side model around the capture session
pub struct CaptureApp<P: MediaProvider> {
    pub(crate) session: CaptureSession<P>,
    pub(crate) uploader: Arc<dyn Uploader>,
    pub(crate) acquire: AcquireTrigger,
    pub(crate) photo_dir: PathBuf,
    /// At most one still waits for review
    pub(crate) pending: Option<CapturedFrame>,
    pub(crate) review_open: bool,
    pub(crate) toasts: Toasts,
}
