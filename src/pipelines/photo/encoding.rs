// SPDX-License-Identifier: GPL-3.0-only

//! PNG encoding of captured frames

use crate::backends::camera::CameraFrame;
use crate::errors::PhotoError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use std::io::Cursor;
use tracing::debug;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encoded image data ready for upload or saving
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Wrap PNG bytes in a data URL
pub fn png_data_url(png: &[u8]) -> String {
    let mut url = String::with_capacity(DATA_URL_PREFIX.len() + png.len().div_ceil(3) * 4);
    url.push_str(DATA_URL_PREFIX);
    STANDARD.encode_string(png, &mut url);
    url
}

/// Photo encoder
pub struct PhotoEncoder;

impl PhotoEncoder {
    /// Encode a frame as lossless PNG, dropping any row padding
    pub fn encode_png(frame: &CameraFrame) -> Result<EncodedImage, PhotoError> {
        let image = frame.to_rgba_image()?;

        let mut data = Vec::new();
        image.write_to(&mut Cursor::new(&mut data), ImageFormat::Png)?;

        debug!(
            width = frame.width,
            height = frame.height,
            size = data.len(),
            "PNG encoding complete"
        );

        Ok(EncodedImage {
            data,
            width: frame.width,
            height: frame.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_encode_png_honours_stride() {
        // 3x2 red frame, rows padded to 16 bytes
        let mut data = Vec::new();
        for _ in 0..2 {
            for _ in 0..3 {
                data.extend_from_slice(&[255, 0, 0, 255]);
            }
            data.extend_from_slice(&[9, 9, 9, 9]);
        }
        let frame = CameraFrame {
            width: 3,
            height: 2,
            data: Arc::from(data),
            stride: 16,
            captured_at: Instant::now(),
        };

        let encoded = PhotoEncoder::encode_png(&frame).unwrap();
        let decoded = image::load_from_memory(&encoded.data).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert!(decoded.pixels().all(|p| p.0 == [255, 0, 0, 255]));
    }

    #[test]
    fn test_data_url_prefix() {
        let url = png_data_url(&[0x89, b'P', b'N', b'G']);
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }
}
