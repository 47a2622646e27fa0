// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic camera used when no real device is wanted
//!
//! Produces SMPTE-style colour bars with a scrolling marker so a running
//! preview is visibly live. The provider can be told to fail, to hold
//! acquisitions until released, or to deliver a stream without frames, which
//! makes it the fake that session tests drive.

use super::types::{BackendError, BackendResult, CameraFrame, StreamConstraints, StreamSettings};
use super::{MediaProvider, MediaStream};
use crate::constants::timing;
use futures::channel::oneshot;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::debug;

const LABEL: &str = "Test pattern";

const BARS: [[u8; 3]; 7] = [
    [192, 192, 192],
    [192, 192, 0],
    [0, 192, 192],
    [0, 192, 0],
    [192, 0, 192],
    [192, 0, 0],
    [0, 0, 192],
];

#[derive(Default)]
struct Shared {
    live_tracks: Arc<AtomicUsize>,
    acquisitions: AtomicUsize,
    last_constraints: Mutex<Option<StreamConstraints>>,
    held: Mutex<Vec<oneshot::Sender<()>>>,
}

/// Provider of synthetic streams
#[derive(Clone)]
pub struct TestPatternProvider {
    width: u32,
    height: u32,
    fail: bool,
    gated: bool,
    frames: bool,
    shared: Arc<Shared>,
}

impl TestPatternProvider {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fail: false,
            gated: false,
            frames: true,
            shared: Arc::new(Shared::default()),
        }
    }

    /// Every acquisition fails as if no device were present
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Acquisitions stay pending until [`release`](Self::release) is called
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    /// Streams start but never deliver a frame
    pub fn without_frames(mut self) -> Self {
        self.frames = false;
        self
    }

    /// Let every held acquisition resolve; returns how many were released
    pub fn release(&self) -> usize {
        let held: Vec<_> = self
            .shared
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        let count = held.len();
        for sender in held {
            let _ = sender.send(());
        }
        count
    }

    /// Tracks currently running across every stream this provider handed out
    pub fn live_track_count(&self) -> usize {
        self.shared.live_tracks.load(Ordering::SeqCst)
    }

    pub fn acquisitions(&self) -> usize {
        self.shared.acquisitions.load(Ordering::SeqCst)
    }

    pub fn last_constraints(&self) -> Option<StreamConstraints> {
        *self
            .shared
            .last_constraints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl MediaProvider for TestPatternProvider {
    type Stream = TestPatternStream;

    fn acquire_stream(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, BackendResult<TestPatternStream>> {
        self.shared.acquisitions.fetch_add(1, Ordering::SeqCst);
        *self
            .shared
            .last_constraints
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(constraints);

        let gate = self.gated.then(|| {
            let (sender, receiver) = oneshot::channel();
            self.shared
                .held
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(sender);
            receiver
        });

        let (width, height, fail, frames) = (self.width, self.height, self.fail, self.frames);
        let live_tracks = Arc::clone(&self.shared.live_tracks);

        Box::pin(async move {
            if let Some(gate) = gate {
                // A dropped sender releases the acquisition as well
                let _ = gate.await;
            }
            if fail {
                return Err(BackendError::DeviceNotFound(
                    "test pattern configured to fail".to_string(),
                ));
            }

            live_tracks.fetch_add(1, Ordering::SeqCst);
            debug!(width, height, facing = %constraints.facing_mode, "Test pattern started");

            Ok(TestPatternStream {
                width,
                height,
                frames,
                started: Instant::now(),
                live_tracks,
                running: true,
            })
        })
    }
}

/// Stream of generated colour bars
pub struct TestPatternStream {
    width: u32,
    height: u32,
    frames: bool,
    started: Instant,
    live_tracks: Arc<AtomicUsize>,
    running: bool,
}

impl TestPatternStream {
    fn frame_number(&self) -> u64 {
        let interval = timing::TEST_PATTERN_FRAME.as_millis().max(1);
        (self.started.elapsed().as_millis() / interval) as u64
    }
}

impl MediaStream for TestPatternStream {
    fn settings(&self) -> StreamSettings {
        StreamSettings {
            width: self.width,
            height: self.height,
            device_label: LABEL.to_string(),
        }
    }

    fn current_frame(&self) -> Option<CameraFrame> {
        (self.running && self.frames)
            .then(|| render_bars(self.width, self.height, self.frame_number()))
    }

    fn stop_tracks(&mut self) {
        if self.running {
            self.running = false;
            self.live_tracks.fetch_sub(1, Ordering::SeqCst);
            debug!("Test pattern stopped");
        }
    }

    fn live_tracks(&self) -> usize {
        usize::from(self.running)
    }
}

impl Drop for TestPatternStream {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}

/// Colour bars on the top three quarters, a scrolling grey ramp below
fn render_bars(width: u32, height: u32, frame_number: u64) -> CameraFrame {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    let ramp_start = height - height / 4;
    let shift = (frame_number * 4) as u32;

    for y in 0..height {
        for x in 0..width {
            let [r, g, b] = if y < ramp_start {
                BARS[(x as usize * BARS.len()) / width as usize]
            } else {
                let level = ((x.wrapping_add(shift) % width) * 255 / width.max(1)) as u8;
                [level; 3]
            };
            data.extend_from_slice(&[r, g, b, 255]);
        }
    }

    CameraFrame::from_rgba(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stream_reports_configured_size() {
        let provider = TestPatternProvider::new(64, 48);
        let stream = provider
            .acquire_stream(StreamConstraints::default())
            .await
            .unwrap();

        let frame = stream.current_frame().unwrap();
        assert_eq!((frame.width, frame.height), (64, 48));
        assert_eq!(stream.settings().width, 64);
        assert_eq!(frame.rgb_at(0, 0), (192, 192, 192));
    }

    #[tokio::test]
    async fn test_drop_stops_tracks() {
        let provider = TestPatternProvider::new(8, 8);
        let mut stream = provider
            .acquire_stream(StreamConstraints::default())
            .await
            .unwrap();
        assert_eq!(provider.live_track_count(), 1);

        stream.stop_tracks();
        stream.stop_tracks();
        assert_eq!(provider.live_track_count(), 0);
        assert!(stream.current_frame().is_none());

        let stream = provider
            .acquire_stream(StreamConstraints::default())
            .await
            .unwrap();
        assert_eq!(provider.live_track_count(), 1);
        drop(stream);
        assert_eq!(provider.live_track_count(), 0);
    }

    #[tokio::test]
    async fn test_gated_acquisition_waits_for_release() {
        let provider = TestPatternProvider::new(8, 8).gated();
        let pending = tokio::spawn(provider.acquire_stream(StreamConstraints::default()));

        tokio::task::yield_now().await;
        assert!(!pending.is_finished());
        assert_eq!(provider.release(), 1);

        let stream = pending.await.unwrap().unwrap();
        assert_eq!(stream.live_tracks(), 1);
    }

    #[tokio::test]
    async fn test_failing_provider_starts_nothing() {
        let provider = TestPatternProvider::new(8, 8).failing();
        let result = provider.acquire_stream(StreamConstraints::default()).await;

        assert!(matches!(result, Err(BackendError::DeviceNotFound(_))));
        assert_eq!(provider.live_track_count(), 0);
        assert_eq!(provider.acquisitions(), 1);
    }
}
