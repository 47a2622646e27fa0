// SPDX-License-Identifier: GPL-3.0-only

//! Camera lifecycle handlers

use crate::app::session::{AccessOutcome, AcquireTicket, RequestTrigger};
use crate::app::state::{CaptureApp, Command};
use crate::backends::camera::{BackendResult, MediaProvider};
use crate::config::AcquireTrigger;
use tracing::{debug, info};

impl<P: MediaProvider> CaptureApp<P> {
    pub(crate) fn handle_start(&mut self) -> Command<P::Stream> {
        match self.acquire {
            AcquireTrigger::OnStart => self.request_camera(RequestTrigger::Mount),
            AcquireTrigger::OnDemand => {
                debug!("Waiting for user to open the camera");
                Command::None
            }
        }
    }

    pub(crate) fn handle_open_camera(&mut self) -> Command<P::Stream> {
        self.request_camera(RequestTrigger::User)
    }

    fn request_camera(&mut self, trigger: RequestTrigger) -> Command<P::Stream> {
        match self.session.request_access(trigger) {
            Some(request) => Command::Acquire(request),
            None => Command::None,
        }
    }

    pub(crate) fn handle_camera_acquired(
        &mut self,
        ticket: AcquireTicket,
        result: BackendResult<P::Stream>,
    ) -> Command<P::Stream> {
        if self.session.complete_access(ticket, result) == AccessOutcome::Stale {
            debug!(?ticket, "Acquisition finished after the session moved on");
        }
        Command::None
    }

    pub(crate) fn handle_enter_full_screen(&mut self) -> Command<P::Stream> {
        self.session.enter_full_screen();
        Command::None
    }

    pub(crate) fn handle_exit_full_screen(&mut self) -> Command<P::Stream> {
        self.session.exit_full_screen();
        Command::None
    }

    pub(crate) fn handle_close(&mut self) -> Command<P::Stream> {
        self.session.close();
        Command::None
    }

    pub(crate) fn handle_shutdown(&mut self) -> Command<P::Stream> {
        info!("Shutting down capture session");
        self.session.teardown();
        self.review_open = false;
        self.pending = None;
        self.toasts.clear();
        Command::None
    }
}
