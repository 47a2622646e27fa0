// SPDX-License-Identifier: GPL-3.0-only

//! Camera capture session
//!
//! Owns the permission/presentation state machine and the live stream.
//!
//! ```text
//!            request (mount or user)
//!   Idle ─────────────────────────────▶ Requesting
//!    ▲                                  │        │
//!    │ close / teardown         granted │        │ failed
//!    │                                  ▼        ▼
//!    └──────────────────────────── Granted    Denied
//!                                             │
//!                 user "Open Camera" ─────────┘ (back to Requesting)
//! ```
//!
//! Every request carries an [`AcquireTicket`]. Close and teardown invalidate
//! outstanding tickets, so a stream that arrives late is stopped on arrival
//! instead of being attached.

use crate::app::state::{PermissionState, Presentation, SessionState};
use crate::backends::camera::{BackendResult, MediaProvider, MediaStream, StreamConstraints};
use crate::errors::CaptureError;
use crate::pipelines::photo::{self, CapturedFrame};
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identifies one acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcquireTicket(u64);

/// A pending acquisition to be awaited outside the session
pub struct AcquireRequest<S> {
    pub ticket: AcquireTicket,
    pub future: BoxFuture<'static, BackendResult<S>>,
}

impl<S> AcquireRequest<S> {
    /// Wait for the provider and pair the result with its ticket
    pub async fn resolve(self) -> (AcquireTicket, BackendResult<S>) {
        let result = self.future.await;
        (self.ticket, result)
    }
}

/// Who asked for the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTrigger {
    /// Automatic request when the session starts
    Mount,
    /// Explicit "Open Camera"
    User,
}

/// What [`CaptureSession::complete_access`] did with a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    Granted,
    Denied,
    /// The ticket was outdated; any delivered stream was stopped
    Stale,
}

pub struct CaptureSession<P: MediaProvider> {
    provider: Arc<P>,
    constraints: StreamConstraints,
    auto_full_screen: bool,
    state: SessionState<P::Stream>,
    attempt: u64,
}

impl<P: MediaProvider> CaptureSession<P> {
    pub fn new(provider: Arc<P>, constraints: StreamConstraints, auto_full_screen: bool) -> Self {
        Self {
            provider,
            constraints,
            auto_full_screen,
            state: SessionState::Idle,
            attempt: 0,
        }
    }

    pub fn state(&self) -> &SessionState<P::Stream> {
        &self.state
    }

    pub fn permission(&self) -> PermissionState {
        self.state.permission()
    }

    pub fn presentation(&self) -> Presentation {
        self.state.presentation()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error()
    }

    pub fn stream(&self) -> Option<&P::Stream> {
        self.state.stream()
    }

    /// Start an acquisition if the current state allows one
    ///
    /// A mount request only starts from `Idle`; a user request also retries
    /// after a denial. While requesting or granted this returns `None`.
    pub fn request_access(
        &mut self,
        trigger: RequestTrigger,
    ) -> Option<AcquireRequest<P::Stream>> {
        let allowed = match (&self.state, trigger) {
            (SessionState::Idle, _) => true,
            (SessionState::Denied { .. }, RequestTrigger::User) => true,
            _ => false,
        };
        if !allowed {
            debug!(state = ?self.state, ?trigger, "Access request ignored");
            return None;
        }

        self.attempt += 1;
        self.state = SessionState::Requesting {
            attempt: self.attempt,
        };
        info!(
            attempt = self.attempt,
            ?trigger,
            facing = %self.constraints.facing_mode,
            "Requesting camera access"
        );

        Some(AcquireRequest {
            ticket: AcquireTicket(self.attempt),
            future: self.provider.acquire_stream(self.constraints),
        })
    }

    /// Apply the result of an acquisition
    pub fn complete_access(
        &mut self,
        ticket: AcquireTicket,
        result: BackendResult<P::Stream>,
    ) -> AccessOutcome {
        let current = matches!(
            self.state,
            SessionState::Requesting { attempt } if attempt == ticket.0
        );
        if !current {
            if let Ok(mut stream) = result {
                stream.stop_tracks();
            }
            debug!(ticket = ticket.0, "Discarded outdated acquisition");
            return AccessOutcome::Stale;
        }

        match result {
            Ok(stream) => {
                let settings = stream.settings();
                let presentation = if self.auto_full_screen {
                    Presentation::FullScreen
                } else {
                    Presentation::Inline
                };
                info!(
                    device = %settings.device_label,
                    width = settings.width,
                    height = settings.height,
                    ?presentation,
                    "Camera access granted"
                );
                self.state = SessionState::Granted {
                    stream,
                    presentation,
                };
                AccessOutcome::Granted
            }
            Err(cause) => {
                warn!(error = %cause, "Camera acquisition failed");
                self.state = SessionState::Denied {
                    message: CaptureError::CameraUnavailable(cause).to_string(),
                };
                AccessOutcome::Denied
            }
        }
    }

    /// Request access and wait for the outcome in place
    pub async fn open(&mut self, trigger: RequestTrigger) -> Option<AccessOutcome> {
        let (ticket, result) = self.request_access(trigger)?.resolve().await;
        Some(self.complete_access(ticket, result))
    }

    /// Encode the frame currently shown by the preview
    pub fn capture_still(&self) -> Result<CapturedFrame, CaptureError> {
        let stream = self.state.stream().ok_or(CaptureError::NotGranted)?;
        Ok(photo::capture_still(stream)?)
    }

    /// Returns false when not granted
    pub fn enter_full_screen(&mut self) -> bool {
        self.set_presentation(Presentation::FullScreen)
    }

    pub fn exit_full_screen(&mut self) -> bool {
        self.set_presentation(Presentation::Inline)
    }

    fn set_presentation(&mut self, value: Presentation) -> bool {
        match &mut self.state {
            SessionState::Granted { presentation, .. } => {
                *presentation = value;
                true
            }
            _ => false,
        }
    }

    /// Stop the camera and return to the inline idle view
    pub fn close(&mut self) {
        info!("Closing camera");
        self.teardown();
    }

    /// Stop all tracks whatever the state and invalidate pending requests
    pub fn teardown(&mut self) {
        self.attempt += 1;
        if let SessionState::Granted { mut stream, .. } = std::mem::take(&mut self.state) {
            stream.stop_tracks();
            debug!("Camera stream released");
        }
    }
}

impl<P: MediaProvider> Drop for CaptureSession<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::test_pattern::TestPatternProvider;
    use crate::constants::CAMERA_UNAVAILABLE_MESSAGE;

    fn session(provider: &TestPatternProvider) -> CaptureSession<TestPatternProvider> {
        CaptureSession::new(
            Arc::new(provider.clone()),
            StreamConstraints::default(),
            true,
        )
    }

    #[tokio::test]
    async fn test_grant_enters_full_screen() {
        let provider = TestPatternProvider::new(16, 16);
        let mut session = session(&provider);

        assert_eq!(
            session.open(RequestTrigger::Mount).await,
            Some(AccessOutcome::Granted)
        );
        assert_eq!(session.permission(), PermissionState::Granted);
        assert_eq!(session.presentation(), Presentation::FullScreen);
        assert!(session.stream().is_some());
    }

    #[tokio::test]
    async fn test_failure_shows_fixed_message() {
        let provider = TestPatternProvider::new(16, 16).failing();
        let mut session = session(&provider);

        session.open(RequestTrigger::Mount).await;
        assert_eq!(session.permission(), PermissionState::Denied);
        assert_eq!(session.last_error(), Some(CAMERA_UNAVAILABLE_MESSAGE));
        assert_eq!(session.presentation(), Presentation::Inline);
        assert!(session.stream().is_none());
    }

    #[tokio::test]
    async fn test_mount_does_not_retry_after_denial() {
        let provider = TestPatternProvider::new(16, 16).failing();
        let mut session = session(&provider);

        session.open(RequestTrigger::Mount).await;
        assert!(session.request_access(RequestTrigger::Mount).is_none());
        assert!(session.request_access(RequestTrigger::User).is_some());
        assert_eq!(provider.acquisitions(), 2);
    }

    #[tokio::test]
    async fn test_request_while_requesting_is_ignored() {
        let provider = TestPatternProvider::new(16, 16).gated();
        let mut session = session(&provider);

        let request = session.request_access(RequestTrigger::User).unwrap();
        assert!(session.request_access(RequestTrigger::User).is_none());
        assert_eq!(provider.acquisitions(), 1);

        provider.release();
        let (ticket, result) = request.resolve().await;
        assert_eq!(session.complete_access(ticket, result), AccessOutcome::Granted);
        assert!(session.request_access(RequestTrigger::User).is_none());
    }

    #[tokio::test]
    async fn test_late_grant_after_close_is_stopped() {
        let provider = TestPatternProvider::new(16, 16).gated();
        let mut session = session(&provider);

        let request = session.request_access(RequestTrigger::Mount).unwrap();
        session.close();
        provider.release();

        let (ticket, result) = request.resolve().await;
        assert_eq!(session.complete_access(ticket, result), AccessOutcome::Stale);
        assert_eq!(session.permission(), PermissionState::NotRequested);
        assert_eq!(provider.live_track_count(), 0);
    }

    #[tokio::test]
    async fn test_full_screen_toggles_without_touching_stream() {
        let provider = TestPatternProvider::new(16, 16);
        let mut session = CaptureSession::new(
            Arc::new(provider.clone()),
            StreamConstraints::default(),
            false,
        );
        assert!(!session.enter_full_screen());

        session.open(RequestTrigger::User).await;
        assert_eq!(session.presentation(), Presentation::Inline);
        assert!(session.enter_full_screen());
        assert_eq!(session.presentation(), Presentation::FullScreen);
        assert!(session.exit_full_screen());
        assert_eq!(session.presentation(), Presentation::Inline);
        assert_eq!(provider.live_track_count(), 1);
    }

    #[test]
    fn test_capture_requires_grant() {
        let provider = TestPatternProvider::new(16, 16);
        let session = session(&provider);
        assert!(matches!(
            session.capture_still(),
            Err(CaptureError::NotGranted)
        ));
    }
}
