// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! The capture session never touches devices directly. It talks to a
//! [`MediaProvider`], which hands out [`MediaStream`]s:
//!
//! ```text
//! ┌─────────────────────┐
//! │   CaptureSession    │  ← permission / presentation state machine
//! └──────────┬──────────┘
//!            │ acquire_stream(constraints)
//!            ▼
//! ┌─────────────────────┐
//! │ MediaProvider trait │
//! └──────────┬──────────┘
//!            │
//!      ┌─────┴──────┐
//!      ▼            ▼
//! ┌─────────┐ ┌─────────────┐
//! │ Native  │ │ Test pattern│
//! └─────────┘ └─────────────┘
//! ```

pub mod native;
pub mod test_pattern;
pub mod types;

pub use types::*;

use futures::future::BoxFuture;

/// Source of live camera streams
pub trait MediaProvider: Send + Sync + 'static {
    /// Stream handle produced by this provider
    type Stream: MediaStream;

    /// Ask for a live stream matching `constraints`
    ///
    /// The returned future is `'static` so it can be spawned on a runtime
    /// while the session keeps handling events. Any failure (denied, no
    /// device, device busy) resolves to an error.
    fn acquire_stream(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, BackendResult<Self::Stream>>;
}

/// A live camera stream with one or more tracks
pub trait MediaStream: Send + 'static {
    /// Reported resolution and device label
    fn settings(&self) -> StreamSettings;

    /// Latest frame shown by the preview, if one has arrived
    fn current_frame(&self) -> Option<CameraFrame>;

    /// Stop every track and release the device
    ///
    /// Must be idempotent.
    fn stop_tracks(&mut self);

    /// Number of tracks still running
    fn live_tracks(&self) -> usize;
}
