//! Error types for qrforge.

use thiserror::Error;

/// Result type for qrforge operations.
pub type Result<T> = std::result::Result<T, QrError>;

/// Everything that can go wrong while building segments or symbols.
///
/// Ways to handle [`QrError::DataOverCapacity`] include:
///
/// - Decrease the error correction level if it was greater than `QrCodeEcc::Low`.
/// - Increase the max version if it was less than `Version::MAX`.
/// - Split the text into better segments to reduce the number of bits required.
/// - Change the text to fit the character set of a particular segment mode (e.g. alphanumeric).
/// - Propagate the error upward to the caller/user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QrError {
    /// A segment (or the sum of all segments) is too long to be represented at all.
    #[error("segment too long")]
    SegmentTooLong,

    /// The encoded data does not fit in any version of the allowed range.
    #[error("data length = {used} bits, max capacity = {capacity} bits")]
    DataOverCapacity { used: usize, capacity: usize },

    /// Numeric mode accepts only the digits 0 to 9.
    #[error("string contains non-numeric characters")]
    InvalidNumeric,

    /// Alphanumeric mode accepts only the 45-character charset.
    #[error("character {ch:?} is not encodable in alphanumeric mode")]
    InvalidAlphanumeric { ch: char },

    /// ECI assignment values live in [0, 999999].
    #[error("ECI assignment value {0} out of range")]
    EciOutOfRange(u32),

    #[error("version number {0} out of range [1, 40]")]
    VersionOutOfRange(u8),

    #[error("mask value {0} out of range [0, 7]")]
    MaskOutOfRange(u8),

    #[error("invalid version range: min {min} > max {max}")]
    InvalidVersionRange { min: u8, max: u8 },

    /// The low-level constructor was handed the wrong number of data codewords.
    #[error("expected {expected} data codewords, got {actual}")]
    InvalidCodewordCount { expected: usize, actual: usize },

    /// Reed-Solomon divisor degrees live in [1, 255].
    #[error("Reed-Solomon degree {0} out of range [1, 255]")]
    DegreeOutOfRange(usize),

    /// SVG borders must be non-negative and keep the image side within `i32`.
    #[error("invalid border width {0}")]
    InvalidBorder(i32),

    /// The rasterized image side would not fit in a `u32` pixel count.
    #[error("image too large: border {border}, scale {scale}")]
    ImageTooLarge { border: u32, scale: u32 },
}
