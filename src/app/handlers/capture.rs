// SPDX-License-Identifier: GPL-3.0-only

//! Still capture handlers

use crate::app::state::{CaptureApp, Command};
use crate::app::toast::{ToastAction, ToastMessage};
use crate::backends::camera::MediaProvider;
use crate::storage;
use std::time::Instant;
use tracing::{error, info, warn};

impl<P: MediaProvider> CaptureApp<P> {
    /// Capture the current preview frame
    ///
    /// A new still replaces the one waiting for review. If the review dialog
    /// is open it stays open and shows the new still.
    pub(crate) fn handle_take_still(&mut self) -> Command<P::Stream> {
        match self.session.capture_still() {
            Ok(frame) => {
                if let Some(previous) = self.pending.take() {
                    info!(replaced = %previous.id, "Pending still replaced");
                    self.toasts.dismiss_action(ToastAction::Inspect(previous.id));
                }
                self.toasts.push(
                    ToastMessage::StillCaptured,
                    Some(ToastAction::Inspect(frame.id)),
                    Instant::now(),
                );
                self.pending = Some(frame);
            }
            Err(e) => warn!(error = %e, "Still capture failed"),
        }
        Command::None
    }

    /// Write the pending still into the photo directory
    pub(crate) fn handle_save_still(&mut self) -> Command<P::Stream> {
        let Some(frame) = &self.pending else {
            return Command::None;
        };

        let message = match storage::save_still(frame, &self.photo_dir) {
            Ok(path) => ToastMessage::StillSaved(path),
            Err(e) => {
                error!(error = %e, dir = %self.photo_dir.display(), "Failed to save still");
                ToastMessage::StillSaveFailed
            }
        };
        self.toasts.push(message, None, Instant::now());
        Command::None
    }
}
