// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera access
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           App Layer (CaptureSession)         │
//! └────────────────────┬────────────────────────┘
//!                      │ MediaProvider / MediaStream
//! ┌────────────────────┴────────────────────────┐
//! │  ┌──────────────────┐  ┌─────────────────┐  │
//! │  │ Native camera    │  │  Test pattern   │  │
//! │  │ (GStreamer)      │  │  (synthetic)    │  │
//! │  └──────────────────┘  └─────────────────┘  │
//! └─────────────────────────────────────────────┘
//! ```

pub mod camera;
