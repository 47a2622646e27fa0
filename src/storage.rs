// SPDX-License-Identifier: MPL-2.0

//! Storage utilities for saved stills

use crate::errors::PhotoError;
use crate::pipelines::photo::CapturedFrame;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name for a still, e.g. `IMG_20260101_120000.png`
pub fn still_file_name(frame: &CapturedFrame) -> String {
    format!("IMG_{}.png", frame.captured_at.format("%Y%m%d_%H%M%S"))
}

/// Write the still's PNG into `dir`, creating the directory when needed
///
/// A second still within the same second gets a numeric suffix instead of
/// overwriting the first.
pub fn save_still(frame: &CapturedFrame, dir: &Path) -> Result<PathBuf, PhotoError> {
    std::fs::create_dir_all(dir)?;

    let base = still_file_name(frame);
    let mut path = dir.join(&base);
    let mut suffix = 1;
    while path.exists() {
        let stem = base.trim_end_matches(".png");
        path = dir.join(format!("{}_{}.png", stem, suffix));
        suffix += 1;
    }

    std::fs::write(&path, &frame.png)?;
    info!(path = %path.display(), "Still saved");
    Ok(path)
}
