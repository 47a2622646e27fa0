// SPDX-License-Identifier: GPL-3.0-only

//! Toast and review dialog handlers

use crate::app::state::{CaptureApp, Command};
use crate::app::toast::ToastAction;
use crate::backends::camera::MediaProvider;
use crate::submission::{UploadPayload, submit_best_effort};
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

impl<P: MediaProvider> CaptureApp<P> {
    /// Open the review dialog, unless the frame is no longer pending
    pub(crate) fn handle_inspect(&mut self, id: Uuid) -> Command<P::Stream> {
        self.toasts.dismiss_action(ToastAction::Inspect(id));

        if self.pending.as_ref().is_some_and(|frame| frame.id == id) {
            self.review_open = true;
        } else {
            debug!(%id, "Inspect for a still that is gone");
        }
        Command::None
    }

    pub(crate) fn handle_dismiss_toast(&mut self, id: u64) -> Command<P::Stream> {
        self.toasts.dismiss(id);
        Command::None
    }

    pub(crate) fn handle_tick(&mut self, now: Instant) -> Command<P::Stream> {
        self.toasts.expire(now);
        Command::None
    }

    pub(crate) fn handle_discard(&mut self) -> Command<P::Stream> {
        if let Some(frame) = self.pending.take() {
            info!(id = %frame.id, "Still discarded");
            self.toasts.dismiss_action(ToastAction::Inspect(frame.id));
        }
        self.review_open = false;
        Command::None
    }

    /// Start one upload, then forget the still whatever the outcome
    pub(crate) fn handle_submit(&mut self) -> Command<P::Stream> {
        self.review_open = false;
        let Some(frame) = self.pending.take() else {
            return Command::None;
        };

        self.toasts.dismiss_action(ToastAction::Inspect(frame.id));
        info!(id = %frame.id, "Submitting still");

        let payload = UploadPayload {
            image: frame.data_url(),
        };
        Command::Upload(submit_best_effort(self.uploader.as_ref(), payload))
    }
}
