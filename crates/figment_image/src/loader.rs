//! Payload loading: turns an [`ImageSource`] into raw bytes

use base64::Engine;

use crate::error::{ImageError, Result};
use crate::source::ImageSource;

/// Raw bytes of one payload, not yet validated as an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub suggested_name: Option<String>,
}

impl ImageData {
    /// Load the bytes behind a source
    ///
    /// This performs blocking file IO; async callers should run it on a
    /// blocking thread.
    pub fn load(source: ImageSource) -> Result<Self> {
        let suggested_name = source.suggested_name();
        let bytes = match source {
            ImageSource::File(path) => {
                std::fs::read(&path).map_err(|source| ImageError::Io { path, source })?
            }
            ImageSource::Base64(data) => decode_base64(&data)?,
            ImageSource::Bytes(bytes) => bytes,
        };

        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        tracing::debug!(len = bytes.len(), ?suggested_name, "loaded image payload");
        Ok(Self {
            bytes,
            suggested_name,
        })
    }
}

fn decode_base64(data: &str) -> Result<Vec<u8>> {
    // Strip a data URI header if present
    let payload = match data.split_once(";base64,") {
        Some((header, rest)) if header.starts_with("data:") => rest,
        _ => data,
    };
    Ok(base64::engine::general_purpose::STANDARD.decode(payload.trim())?)
}
