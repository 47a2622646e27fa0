// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer camera backend
//!
//! Devices are discovered through the GStreamer device monitor and opened with
//! the source element the device provider creates, so V4L2, PipeWire and
//! libcamera cameras all go through the same pipeline.

mod enumeration;
mod pipeline;

pub use enumeration::{DiscoveredCamera, enumerate_cameras};

use super::types::{
    BackendError, BackendResult, CameraDevice, CameraFrame, StreamConstraints, StreamSettings,
    select_device,
};
use super::{MediaProvider, MediaStream};
use crate::constants::timing;
use futures::future::BoxFuture;
use pipeline::PreviewPipeline;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Provider backed by real camera devices
#[derive(Debug, Clone, Default)]
pub struct NativeMediaProvider {
    /// Force a device by enumeration index instead of matching the facing mode
    device_index: Option<usize>,
}

impl NativeMediaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device_index(device_index: usize) -> Self {
        Self {
            device_index: Some(device_index),
        }
    }
}

impl MediaProvider for NativeMediaProvider {
    type Stream = NativeStream;

    fn acquire_stream(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, BackendResult<NativeStream>> {
        let device_index = self.device_index;
        Box::pin(async move {
            // Device enumeration and the state change to PLAYING block
            let stream =
                tokio::task::spawn_blocking(move || NativeStream::open(constraints, device_index))
                    .await
                    .map_err(|e| {
                        BackendError::InitializationFailed(format!("Camera task failed: {}", e))
                    })??;

            stream
                .wait_for_first_frame(timing::FIRST_FRAME_TIMEOUT)
                .await?;
            Ok(stream)
        })
    }
}

/// Live stream from a GStreamer pipeline
///
/// Dropping the stream stops the pipeline and releases the device.
pub struct NativeStream {
    pipeline: PreviewPipeline,
    label: String,
}

impl NativeStream {
    fn open(constraints: StreamConstraints, device_index: Option<usize>) -> BackendResult<Self> {
        let cameras = enumerate_cameras()?;
        let devices: Vec<CameraDevice> = cameras.iter().map(|c| c.info.clone()).collect();

        let index = match device_index {
            Some(index) if index < cameras.len() => index,
            Some(index) => {
                return Err(BackendError::DeviceNotFound(format!(
                    "camera index {} (found {})",
                    index,
                    cameras.len()
                )));
            }
            None => select_device(&devices, constraints.facing_mode).ok_or_else(|| {
                BackendError::DeviceNotFound("no video sources available".to_string())
            })?,
        };

        let camera = &cameras[index];
        info!(
            camera = %camera.info.name,
            facing = %constraints.facing_mode,
            location = ?camera.info.location,
            "Opening camera"
        );

        let pipeline = PreviewPipeline::new(camera, &constraints)?;
        Ok(Self {
            pipeline,
            label: camera.info.name.clone(),
        })
    }

    async fn wait_for_first_frame(&self, timeout: Duration) -> BackendResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.pipeline.frames_received() > 0 {
                return Ok(());
            }
            if let Some(message) = self.pipeline.take_error() {
                error!(error = %message, "Camera pipeline failed");
                return Err(BackendError::InitializationFailed(message));
            }
            if Instant::now() >= deadline {
                return Err(BackendError::Timeout(timeout));
            }
            tokio::time::sleep(timing::FIRST_FRAME_POLL).await;
        }
    }
}

impl MediaStream for NativeStream {
    fn settings(&self) -> StreamSettings {
        let (width, height) = self
            .pipeline
            .latest_frame()
            .map(|frame| (frame.width, frame.height))
            .unwrap_or((0, 0));
        StreamSettings {
            width,
            height,
            device_label: self.label.clone(),
        }
    }

    fn current_frame(&self) -> Option<CameraFrame> {
        self.pipeline.latest_frame()
    }

    fn stop_tracks(&mut self) {
        if self.pipeline.is_running() {
            info!(camera = %self.label, "Stopping camera");
            self.pipeline.stop();
        }
    }

    fn live_tracks(&self) -> usize {
        usize::from(self.pipeline.is_running())
    }
}
