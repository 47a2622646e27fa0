// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! - Listing available cameras
//! - Taking a single still, optionally submitting it

use chrono::Local;
use stillcam::app::{AccessOutcome, CaptureSession, RequestTrigger};
use stillcam::backends::camera::MediaProvider;
use stillcam::backends::camera::native::enumerate_cameras;
use stillcam::config::Config;
use stillcam::constants::CAMERA_UNAVAILABLE_MESSAGE;
use stillcam::errors::{AppError, AppResult};
use stillcam::storage;
use stillcam::submission::{HttpUploader, UploadPayload, Uploader};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// List all available cameras
pub fn list_cameras() -> AppResult<()> {
    let cameras = enumerate_cameras()?;

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.info.name);
        if let Some(location) = camera.info.location {
            println!("      Location: {}", location);
        }
        if let Some(path) = &camera.info.path {
            println!("      Path: {}", path);
        }
        println!();
    }

    Ok(())
}

/// Open the camera, take one still, then release the camera
pub fn snap<P: MediaProvider>(
    provider: P,
    config: &Config,
    output: Option<PathBuf>,
    submit: bool,
) -> AppResult<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        let mut session = CaptureSession::new(Arc::new(provider), config.constraints(), false);

        if session.open(RequestTrigger::User).await != Some(AccessOutcome::Granted) {
            let message = session.last_error().unwrap_or(CAMERA_UNAVAILABLE_MESSAGE);
            return Err(AppError::AccessDenied(message.to_string()));
        }

        let still = session.capture_still()?;
        session.close();

        let path = match output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, &still.png)?;
                path
            }
            None => storage::save_still(&still, &config.photo_directory())?,
        };
        println!(
            "Saved {}x{} still at {}: {}",
            still.width,
            still.height,
            Local::now().format("%H:%M:%S"),
            path.display()
        );

        if submit {
            let uploader = HttpUploader::from_config(config)?;
            info!(url = %uploader.endpoint(), "Submitting still");
            uploader
                .upload(UploadPayload {
                    image: still.data_url(),
                })
                .await?;
            println!("Submitted to {}", uploader.endpoint());
        }

        Ok(())
    })
}
