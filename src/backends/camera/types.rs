// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use crate::errors::PhotoError;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Which way the requested camera should face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear camera, pointing away from the user
    #[default]
    Environment,
    /// Front camera, pointing at the user
    User,
}

impl FacingMode {
    /// Whether a sensor mounted at `location` satisfies this preference
    pub fn matches(&self, location: CameraLocation) -> bool {
        matches!(
            (self, location),
            (FacingMode::Environment, CameraLocation::Back)
                | (FacingMode::User, CameraLocation::Front)
        )
    }
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacingMode::Environment => write!(f, "environment"),
            FacingMode::User => write!(f, "user"),
        }
    }
}

/// Physical mounting of a camera as reported by libcamera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraLocation {
    Front,
    Back,
    External,
}

impl CameraLocation {
    /// Parse the `api.libcamera.location` property value
    pub fn from_property(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "front" => Some(CameraLocation::Front),
            "back" => Some(CameraLocation::Back),
            "external" => Some(CameraLocation::External),
            _ => None,
        }
    }
}

impl std::fmt::Display for CameraLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraLocation::Front => write!(f, "front"),
            CameraLocation::Back => write!(f, "back"),
            CameraLocation::External => write!(f, "external"),
        }
    }
}

/// Parameters of a stream request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamConstraints {
    /// Preferred facing; falls back to any camera when none matches
    pub facing_mode: FacingMode,
    /// Hint asking for continuous autofocus where the device supports it
    pub continuous_focus: bool,
}

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    pub path: Option<String>,             // Device node or PipeWire object path, if known
    pub location: Option<CameraLocation>, // Mounting reported by libcamera
}

/// Pick the device that best satisfies a facing preference
///
/// Returns the index of the first device mounted the preferred way, or the
/// first device when no location matches.
pub fn select_device(devices: &[CameraDevice], facing: FacingMode) -> Option<usize> {
    devices
        .iter()
        .position(|device| device.location.is_some_and(|loc| facing.matches(loc)))
        .or_else(|| (!devices.is_empty()).then_some(0))
}

/// What a live stream reports about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSettings {
    pub width: u32,
    pub height: u32,
    pub device_label: String,
}

/// A single RGBA frame from the camera
///
/// `stride` is the number of bytes per row and may include padding.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    pub stride: u32,
    /// Timestamp when frame was captured
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Wrap tightly packed RGBA pixels
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data),
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::from_rgba(width, height, image.into_raw())
    }

    /// RGB of the pixel at (x, y), clamped to the frame bounds
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, 0);
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = (y * self.stride + x * 4) as usize;
        match self.data.get(idx..idx + 3) {
            Some(px) => (px[0], px[1], px[2]),
            None => (0, 0, 0),
        }
    }

    /// Copy into a tightly packed image, dropping any row padding
    pub fn to_rgba_image(&self) -> Result<RgbaImage, PhotoError> {
        let row_bytes = self.width as usize * 4;
        let stride = self.stride as usize;
        let expected = if self.height == 0 {
            0
        } else {
            stride * (self.height as usize - 1) + row_bytes
        };
        if stride < row_bytes || self.data.len() < expected {
            return Err(PhotoError::TruncatedFrame {
                expected,
                actual: self.data.len(),
            });
        }

        if row_bytes == 0 || self.height == 0 {
            return Ok(RgbaImage::new(self.width, self.height));
        }

        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.data.chunks(stride).take(self.height as usize) {
            pixels.extend_from_slice(&row[..row_bytes]);
        }

        RgbaImage::from_raw(self.width, self.height, pixels).ok_or(PhotoError::TruncatedFrame {
            expected,
            actual: self.data.len(),
        })
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Error, Debug, Clone)]
pub enum BackendError {
    #[error("Backend not available: {0}")]
    NotAvailable(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("No frame within {0:?}")]
    Timeout(Duration),
}
