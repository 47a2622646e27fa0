// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! `update()` only dispatches; the handlers live in the `handlers` submodules
//! grouped by domain:
//!
//! - `handlers::camera`: acquisition, presentation, close and shutdown
//! - `handlers::capture`: still capture and saving
//! - `handlers::review`: toasts, review dialog, discard and submit

use crate::app::state::{CaptureApp, Command, Message};
use crate::backends::camera::MediaProvider;
use tracing::debug;

impl<P: MediaProvider> CaptureApp<P> {
    pub fn update(&mut self, message: Message<P::Stream>) -> Command<P::Stream> {
        debug!(?message, "update");

        match message {
            // ===== Camera =====
            Message::Start => self.handle_start(),
            Message::OpenCamera => self.handle_open_camera(),
            Message::CameraAcquired(ticket, result) => self.handle_camera_acquired(ticket, result),
            Message::EnterFullScreen => self.handle_enter_full_screen(),
            Message::ExitFullScreen => self.handle_exit_full_screen(),
            Message::Close => self.handle_close(),
            Message::Shutdown => self.handle_shutdown(),

            // ===== Capture =====
            Message::TakeStill => self.handle_take_still(),
            Message::SaveStill => self.handle_save_still(),

            // ===== Review =====
            Message::Inspect(id) => self.handle_inspect(id),
            Message::DismissToast(id) => self.handle_dismiss_toast(id),
            Message::Discard => self.handle_discard(),
            Message::Submit => self.handle_submit(),
            Message::Tick(now) => self.handle_tick(now),
        }
    }
}
