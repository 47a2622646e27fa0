// SPDX-License-Identifier: GPL-3.0-only

//! View model
//!
//! A front-end independent description of what should be on screen. The
//! terminal front end renders it; tests assert against it.

use crate::app::state::{CaptureApp, PermissionState, Presentation};
use crate::app::toast::Toast;
use crate::backends::camera::MediaProvider;
use crate::fl;
use crate::pipelines::photo::CapturedFrame;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Requesting,
    Error(String),
}

impl StatusLine {
    pub fn text(&self) -> String {
        match self {
            StatusLine::Requesting => fl!("requesting-camera"),
            StatusLine::Error(message) => message.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    OpenCamera,
    TakeStill,
    EnterFullScreen,
    Close,
    /// Reopen the review for the still that is waiting
    Review,
}

impl Control {
    pub fn label(&self) -> String {
        match self {
            Control::OpenCamera => fl!("open-camera"),
            Control::TakeStill => fl!("take-still"),
            Control::EnterFullScreen => fl!("full-screen"),
            Control::Close => fl!("close-camera"),
            Control::Review => fl!("review-still"),
        }
    }
}

/// Everything one frame of UI needs
#[derive(Debug)]
pub struct SessionView<'a> {
    pub title: String,
    pub status: Option<StatusLine>,
    /// Where the live preview goes; `None` when no stream is attached
    pub preview: Option<Presentation>,
    pub controls: Vec<Control>,
    pub toast: Option<&'a Toast>,
    /// Still waiting for a decision, whether or not the dialog is open
    pub pending: Option<Uuid>,
    /// Frame shown by the review dialog when it is open
    pub review: Option<&'a CapturedFrame>,
}

impl SessionView<'_> {
    pub fn has_control(&self, control: Control) -> bool {
        self.controls.contains(&control)
    }
}

impl<P: MediaProvider> CaptureApp<P> {
    pub fn view(&self) -> SessionView<'_> {
        let state = self.session.state();

        let status = match state.permission() {
            PermissionState::Requesting => Some(StatusLine::Requesting),
            PermissionState::Denied => state
                .last_error()
                .map(|message| StatusLine::Error(message.to_string())),
            _ => None,
        };

        let preview = state.is_granted().then(|| state.presentation());

        let mut controls = match (state.permission(), state.presentation()) {
            (PermissionState::NotRequested | PermissionState::Denied, _) => {
                vec![Control::OpenCamera]
            }
            (PermissionState::Requesting, _) => Vec::new(),
            (PermissionState::Granted, Presentation::Inline) => {
                vec![Control::TakeStill, Control::EnterFullScreen, Control::Close]
            }
            (PermissionState::Granted, Presentation::FullScreen) => {
                vec![Control::TakeStill, Control::Close]
            }
        };
        if self.pending.is_some() && !self.review_open {
            controls.push(Control::Review);
        }

        SessionView {
            title: fl!("app-title"),
            status,
            preview,
            controls,
            toast: self.toasts.front(),
            pending: self.pending.as_ref().map(|frame| frame.id),
            review: self.pending.as_ref().filter(|_| self.review_open),
        }
    }
}
