// SPDX-License-Identifier: GPL-3.0-only

//! Camera discovery through the GStreamer device monitor
//!
//! The monitor aggregates every installed device provider (PipeWire,
//! libcamera, V4L2), so this works on desktops as well as on phones where
//! sensors are only reachable through libcamera.

use super::super::types::{BackendError, BackendResult, CameraDevice, CameraLocation};
use crate::constants::pipeline;
use gstreamer::prelude::*;
use tracing::{debug, info, warn};

/// Device properties that may hold the device node or object path
const PATH_PROPERTIES: &[&str] = &["api.v4l2.path", "device.path", "object.path"];

/// A discovered camera together with the GStreamer device that can open it
#[derive(Debug, Clone)]
pub struct DiscoveredCamera {
    pub info: CameraDevice,
    pub device: gstreamer::Device,
}

/// Enumerate video sources known to GStreamer
pub fn enumerate_cameras() -> BackendResult<Vec<DiscoveredCamera>> {
    gstreamer::init().map_err(|e| BackendError::NotAvailable(e.to_string()))?;

    let monitor = gstreamer::DeviceMonitor::new();
    monitor.add_filter(Some(pipeline::VIDEO_SOURCE_CLASS), None);
    monitor
        .start()
        .map_err(|e| BackendError::NotAvailable(format!("Device monitor failed: {}", e)))?;

    let cameras: Vec<DiscoveredCamera> = monitor
        .devices()
        .into_iter()
        .map(|device| DiscoveredCamera {
            info: describe_device(&device),
            device,
        })
        .collect();

    monitor.stop();

    if cameras.is_empty() {
        warn!("Device monitor found no video sources");
    } else {
        info!(count = cameras.len(), "Cameras enumerated");
    }

    Ok(cameras)
}

fn describe_device(device: &gstreamer::Device) -> CameraDevice {
    let name = device.display_name().to_string();
    let properties = device.properties();

    let location = properties
        .as_ref()
        .and_then(|props| props.get::<String>(pipeline::LOCATION_PROPERTY).ok())
        .and_then(|value| CameraLocation::from_property(&value));

    let path = properties.as_ref().and_then(|props| {
        PATH_PROPERTIES
            .iter()
            .find_map(|key| props.get::<String>(*key).ok())
    });

    debug!(name = %name, ?path, ?location, "Found video source");

    CameraDevice {
        name,
        path,
        location,
    }
}
