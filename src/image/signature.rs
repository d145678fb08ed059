//! JPEG signature check
//!
//! Only the leading bytes are inspected; the payload is not decoded.

/// Accepted JPEG start sequences: SOI followed by an APP0, APP2 or APP3 marker.
pub const JPEG_SIGNATURES: [[u8; 4]; 3] = [
    [0xFF, 0xD8, 0xFF, 0xE0],
    [0xFF, 0xD8, 0xFF, 0xE2],
    [0xFF, 0xD8, 0xFF, 0xE3],
];

/// Returns true if the payload starts with an accepted JPEG signature.
pub fn is_jpeg(data: &[u8]) -> bool {
    JPEG_SIGNATURES.iter().any(|sig| data.starts_with(sig))
}
