// SPDX-License-Identifier: MPL-2.0

//! Still capture pipeline
//!
//! ```text
//! Live stream → Capture (current frame) → PNG encoding → CapturedFrame
//!      ↓
//! Preview continues uninterrupted
//! ```

pub mod capture;
pub mod encoding;

pub use capture::PhotoCapture;
pub use encoding::{EncodedImage, PhotoEncoder, png_data_url};

use crate::backends::camera::MediaStream;
use crate::errors::PhotoError;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// A still taken from the live preview, held until submitted or discarded
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub id: Uuid,
    pub width: u32,
    pub height: u32,
    /// PNG-encoded image
    pub png: Arc<[u8]>,
    pub captured_at: DateTime<Local>,
}

impl CapturedFrame {
    pub fn data_url(&self) -> String {
        png_data_url(&self.png)
    }
}

impl From<EncodedImage> for CapturedFrame {
    fn from(encoded: EncodedImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            width: encoded.width,
            height: encoded.height,
            png: Arc::from(encoded.data),
            captured_at: Local::now(),
        }
    }
}

/// Capture and encode the stream's current frame
pub fn capture_still<S: MediaStream>(stream: &S) -> Result<CapturedFrame, PhotoError> {
    let frame = PhotoCapture::capture_from_stream(stream)?;
    let encoded = PhotoEncoder::encode_png(&frame)?;
    let captured = CapturedFrame::from(encoded);

    info!(
        id = %captured.id,
        width = captured.width,
        height = captured.height,
        bytes = captured.png.len(),
        "Still captured"
    );
    Ok(captured)
}
