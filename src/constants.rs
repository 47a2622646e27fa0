// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Message shown whenever the camera cannot be acquired.
///
/// The underlying cause is only logged.
pub const CAMERA_UNAVAILABLE_MESSAGE: &str = "Camera access denied or unavailable.";

/// Endpoint that receives submitted stills unless configured otherwise
pub const DEFAULT_UPLOAD_URL: &str = "https://httpbin.org/post";

/// Environment variable overriding the configured upload endpoint
pub const UPLOAD_URL_ENV: &str = "STILLCAM_UPLOAD_URL";

/// How long a toast stays visible before it expires on its own
pub const TOAST_DURATION: Duration = Duration::from_secs(5);

/// Maximum number of toasts kept in the queue; older ones are dropped first
pub const MAX_TOASTS: usize = 3;

/// Default folder name for saved stills
pub const DEFAULT_SAVE_FOLDER: &str = "stillcam";

/// GStreamer pipeline constants
pub mod pipeline {
    /// Appsink queue size; only the newest frame matters for preview and capture
    pub const MAX_BUFFERS: u32 = 1;

    /// Output pixel format for appsink
    pub const OUTPUT_FORMAT: &str = "RGBA";

    /// Device class used to look up cameras through the device monitor
    pub const VIDEO_SOURCE_CLASS: &str = "Video/Source";

    /// Device property carrying the physical mounting of a libcamera sensor
    pub const LOCATION_PROPERTY: &str = "api.libcamera.location";
}

/// Timing constants
pub mod timing {
    use std::time::Duration;

    /// How long acquisition waits for the first frame before giving up
    pub const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(5);

    /// Poll interval while waiting for the first frame
    pub const FIRST_FRAME_POLL: Duration = Duration::from_millis(20);

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Default HTTP timeout for a still submission
    pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;

    /// Terminal UI input poll interval (also paces preview redraws)
    pub const UI_POLL: Duration = Duration::from_millis(16);

    /// Frame interval of the synthetic test-pattern source (~30 fps)
    pub const TEST_PATTERN_FRAME: Duration = Duration::from_millis(33);
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// User agent sent with still submissions
    pub fn user_agent() -> String {
        format!("{}/{}", env!("CARGO_PKG_NAME"), version())
    }
}
