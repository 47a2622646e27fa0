// SPDX-License-Identifier: GPL-3.0-only

//! Shared fakes for the integration tests

#![allow(dead_code)]

use futures::future::BoxFuture;
use std::path::Path;
use std::sync::{Arc, Mutex};
use stillcam::backends::camera::test_pattern::{TestPatternProvider, TestPatternStream};
use stillcam::config::{AcquireTrigger, Config};
use stillcam::errors::UploadError;
use stillcam::submission::{UploadPayload, Uploader};
use stillcam::{CaptureApp, Command, Message};

pub const WIDTH: u32 = 64;
pub const HEIGHT: u32 = 48;

/// Uploader that records every call
#[derive(Default)]
pub struct RecordingUploader {
    calls: Mutex<Vec<UploadPayload>>,
    fail: bool,
}

impl RecordingUploader {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<UploadPayload> {
        self.calls.lock().unwrap().clone()
    }
}

impl Uploader for RecordingUploader {
    fn upload(&self, payload: UploadPayload) -> BoxFuture<'static, Result<(), UploadError>> {
        self.calls.lock().unwrap().push(payload);
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(UploadError::Status(
                    reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                ))
            } else {
                Ok(())
            }
        })
    }
}

pub fn config(photo_dir: &Path, acquire: AcquireTrigger) -> Config {
    Config {
        acquire,
        photo_dir: Some(photo_dir.to_path_buf()),
        ..Config::default()
    }
}

pub fn app(
    provider: &TestPatternProvider,
    uploader: Arc<RecordingUploader>,
    config: &Config,
) -> CaptureApp<TestPatternProvider> {
    CaptureApp::new(Arc::new(provider.clone()), uploader, config)
}

/// Apply a message and run whatever command it returns to completion
pub async fn send(app: &mut CaptureApp<TestPatternProvider>, message: Message<TestPatternStream>) {
    let command = app.update(message);
    run(app, command).await;
}

pub async fn run(app: &mut CaptureApp<TestPatternProvider>, command: Command<TestPatternStream>) {
    match command {
        Command::None => {}
        Command::Acquire(request) => {
            let (ticket, result) = request.resolve().await;
            let follow_up = app.update(Message::CameraAcquired(ticket, result));
            assert!(follow_up.is_none());
        }
        Command::Upload(upload) => upload.await,
    }
}
