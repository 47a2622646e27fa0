// SPDX-License-Identifier: MPL-2.0

//! Photo capture from a live stream
//!
//! Grabs the frame the preview is currently showing. The stream keeps
//! running; nothing here touches its tracks.

use crate::backends::camera::{CameraFrame, MediaStream};
use crate::errors::PhotoError;
use tracing::debug;

/// Photo capture handler
pub struct PhotoCapture;

impl PhotoCapture {
    /// Take the current preview frame at the stream's native resolution
    pub fn capture_from_stream<S: MediaStream>(stream: &S) -> Result<CameraFrame, PhotoError> {
        let frame = stream
            .current_frame()
            .ok_or(PhotoError::NoFrameAvailable)?;

        debug!(
            width = frame.width,
            height = frame.height,
            age_ms = frame.captured_at.elapsed().as_millis() as u64,
            "Frame taken from preview"
        );

        Ok(frame)
    }
}
