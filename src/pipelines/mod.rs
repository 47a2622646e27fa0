// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines
//!
//! - [`photo`]: still capture from the live preview and PNG encoding

pub mod photo;
