//! Base64 encoding and data URL helpers

use base64::{engine::general_purpose::STANDARD, Engine};

/// Encode binary data to base64 string
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Prefix an already-encoded payload with an image media type.
///
/// The payload is not inspected; gallery shares are stored opaquely.
pub fn wrap_payload(payload: &str, format: &str) -> String {
    format!("data:image/{};base64,{}", format, payload)
}

/// Create a data URL from binary image data
pub fn create_data_url(data: &[u8], format: &str) -> String {
    wrap_payload(&encode(data), format)
}
