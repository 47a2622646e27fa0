// SPDX-License-Identifier: MPL-2.0

//! GStreamer preview pipeline
//!
//! ```text
//! <device source> ! videoconvert ! video/x-raw,format=RGBA ! appsink
//! ```
//!
//! The appsink keeps a single buffer and drops older ones; the newest frame is
//! parked in a shared slot that both the preview and still capture read from.

use super::super::types::{BackendError, BackendResult, CameraFrame, StreamConstraints};
use super::enumeration::DiscoveredCamera;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Control that enables continuous autofocus on V4L2 devices
const CONTINUOUS_FOCUS_CONTROL: &str = "focus_automatic_continuous";

type FrameSlot = Arc<Mutex<Option<CameraFrame>>>;

/// Running preview pipeline for one camera
pub struct PreviewPipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    latest: FrameSlot,
    frames: Arc<AtomicU64>,
    stopped: bool,
}

impl PreviewPipeline {
    /// Build the pipeline for `camera` and set it to PLAYING
    pub fn new(camera: &DiscoveredCamera, constraints: &StreamConstraints) -> BackendResult<Self> {
        info!(device = %camera.info.name, "Creating preview pipeline");

        let source = camera
            .device
            .create_element(Some("camera-source"))
            .map_err(|e| {
                BackendError::InitializationFailed(format!(
                    "Failed to create source for {}: {}",
                    camera.info.name, e
                ))
            })?;

        if constraints.continuous_focus {
            apply_focus_hint(&source);
        }

        let convert = gstreamer::ElementFactory::make("videoconvert")
            .build()
            .map_err(|e| BackendError::NotAvailable(format!("videoconvert: {}", e)))?;

        let caps = gstreamer::Caps::builder("video/x-raw")
            .field("format", pipeline::OUTPUT_FORMAT)
            .build();
        let appsink = AppSink::builder()
            .caps(&caps)
            .max_buffers(pipeline::MAX_BUFFERS)
            .drop(true)
            .build();
        // Preview wants the newest frame, not clock-synchronised playback
        appsink.set_property("sync", false);

        let gst_pipeline = gstreamer::Pipeline::new();
        gst_pipeline
            .add_many([&source, &convert, appsink.upcast_ref()])
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?;
        gstreamer::Element::link_many([&source, &convert, appsink.upcast_ref()])
            .map_err(|e| BackendError::InitializationFailed(format!("Failed to link: {}", e)))?;

        let mut preview = Self {
            pipeline: gst_pipeline,
            appsink,
            latest: Arc::new(Mutex::new(None)),
            frames: Arc::new(AtomicU64::new(0)),
            stopped: false,
        };
        preview.install_frame_callback();

        // On failure `preview` is dropped, which resets the pipeline to NULL
        preview
            .pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| {
                BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e))
            })?;

        debug!("Preview pipeline set to PLAYING");
        Ok(preview)
    }

    fn install_frame_callback(&mut self) {
        let latest = Arc::clone(&self.latest);
        let frames = Arc::clone(&self.frames);

        self.appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |sink| {
                    let sample = sink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;
                    let frame = frame_from_sample(&sample).ok_or(gstreamer::FlowError::Error)?;

                    if frames.fetch_add(1, Ordering::Relaxed) == 0 {
                        info!(
                            width = frame.width,
                            height = frame.height,
                            stride = frame.stride,
                            "First preview frame"
                        );
                    }

                    *latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame);
                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );
    }

    /// Newest frame delivered by the appsink
    pub fn latest_frame(&self) -> Option<CameraFrame> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn frames_received(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Pop the first error posted on the bus, if any
    pub fn take_error(&self) -> Option<String> {
        let bus = self.pipeline.bus()?;
        let message = bus.pop_filtered(&[gstreamer::MessageType::Error])?;
        match message.view() {
            gstreamer::MessageView::Error(err) => Some(err.error().to_string()),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    /// Reset to NULL, which releases the device
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        // Clear callbacks first so no frame lands after the slot is emptied
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = %e, "Failed to reset preview pipeline");
        }
        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        debug!(?result, ?state, "Preview pipeline stopped");

        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

impl Drop for PreviewPipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

fn frame_from_sample(sample: &gstreamer::Sample) -> Option<CameraFrame> {
    let buffer = sample.buffer()?;
    let info = VideoInfo::from_caps(sample.caps()?).ok()?;
    let map = buffer.map_readable().ok()?;

    Some(CameraFrame {
        width: info.width(),
        height: info.height(),
        data: Arc::from(map.as_slice()),
        stride: info.stride()[0] as u32,
        captured_at: Instant::now(),
    })
}

/// Ask V4L2 sources for continuous autofocus; other sources ignore the hint
fn apply_focus_hint(source: &gstreamer::Element) {
    let is_v4l2 = source
        .factory()
        .is_some_and(|factory| factory.name().as_str() == "v4l2src");
    if !is_v4l2 {
        debug!("Source does not take V4L2 controls, skipping focus hint");
        return;
    }

    let controls = gstreamer::Structure::builder("c")
        .field(CONTINUOUS_FOCUS_CONTROL, 1i32)
        .build();
    source.set_property("extra-controls", &controls);
    debug!("Continuous autofocus requested");
}
