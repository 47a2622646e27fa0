// SPDX-License-Identifier: GPL-3.0-only

//! Still submission to the upload endpoint
//!
//! A submission is one JSON POST of `{"image": "<data URL>"}`. There is no
//! retry and no queue; the caller fires it and forgets it.

use crate::config::Config;
use crate::constants::app_info;
use crate::errors::UploadError;
use futures::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Body of a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPayload {
    /// PNG still as a `data:image/png;base64,...` URL
    pub image: String,
}

/// Sink for submitted stills
pub trait Uploader: Send + Sync + 'static {
    /// Start one upload; the request is issued when the future is polled
    fn upload(&self, payload: UploadPayload) -> BoxFuture<'static, Result<(), UploadError>>;
}

/// Uploader posting JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpUploader {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, UploadError> {
        let endpoint =
            reqwest::Url::parse(endpoint).map_err(|e| UploadError::InvalidEndpoint {
                url: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(UploadError::InvalidEndpoint {
                url: endpoint.to_string(),
                reason: format!("unsupported scheme {}", endpoint.scheme()),
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(app_info::user_agent())
            .timeout(timeout)
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &Config) -> Result<Self, UploadError> {
        Self::new(&config.upload_url, config.upload_timeout())
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

impl Uploader for HttpUploader {
    fn upload(&self, payload: UploadPayload) -> BoxFuture<'static, Result<(), UploadError>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        Box::pin(async move {
            let body = serde_json::to_vec(&payload)?;
            debug!(url = %endpoint, bytes = body.len(), "Posting still");

            let response = client
                .post(endpoint)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(UploadError::Status(status));
            }
            Ok(())
        })
    }
}

/// Run one upload and log the outcome; never fails
pub fn submit_best_effort<U: Uploader + ?Sized>(
    uploader: &U,
    payload: UploadPayload,
) -> BoxFuture<'static, ()> {
    let upload = uploader.upload(payload);
    Box::pin(async move {
        match upload.await {
            Ok(()) => info!("Still submitted"),
            Err(e) => warn!(error = %e, "Still submission failed"),
        }
    })
}
