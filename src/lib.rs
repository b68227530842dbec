//! # qrforge
//!
//! A Rust library for encoding text or binary data into QR Code symbols.
//!
//! `qrforge` adheres to the QR Code Model 2 specification (ISO/IEC 18004). It supports versions
//! 1 to 40, all four error correction levels, numeric/alphanumeric/byte/ECI segment modes, and
//! automatic or forced mask selection. The finished [`QrCode`] is an immutable grid of modules
//! that can be rendered as SVG, console text or a grayscale image.
//!
//! ## Features
//!
//! - Encode data in numeric, alphanumeric, byte, or ECI modes.
//! - Support four error correction levels: Low, Medium, Quartile, High.
//! - Pick the smallest version that fits, and raise the ECC level when it comes for free.
//! - Render QR codes as SVG, text, or in-memory image buffers.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! ```rust
//! use qrforge::{helper, QrCode, QrCodeEcc};
//!
//! let qr = QrCode::encode_text("https://example.com", QrCodeEcc::Medium).unwrap();
//! assert_eq!(qr.size(), qr.version().value() as i32 * 4 + 17);
//! let svg = helper::to_svg_string(&qr, 4).unwrap();
//! assert!(svg.ends_with("</svg>\n"));
//! ```
//!
//! Building segments by hand:
//!
//! ```rust
//! use qrforge::{EncodeOptions, Mask, QrCode, QrCodeEcc, QrSegment};
//!
//! let segs = vec![
//!     QrSegment::make_eci(26).unwrap(), // UTF-8
//!     QrSegment::make_bytes("Grüße".as_bytes()).unwrap(),
//! ];
//! let opts = EncodeOptions::default().with_mask(Mask::new(2).unwrap());
//! let qr = QrCode::encode_segments_with(&segs, QrCodeEcc::High, &opts).unwrap();
//! assert_eq!(qr.mask().value(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Symbol construction, masking and penalty scoring.
//! - [`segment`]: Data segments and their modes.
//! - [`version`]: Versions, masks, ECC levels and capacity tables.
//! - [`reed_solomon`]: Error correction codewords over GF(256).
//! - [`helper`]: Utilities for rendering QR codes in various formats.

#![forbid(unsafe_code)]

pub mod bits;
pub mod error;
pub mod helper;
pub mod options;
pub mod qrcode;
pub mod reed_solomon;
pub mod segment;
pub mod version;

pub use error::{QrError, Result};
pub use options::EncodeOptions;
pub use qrcode::QrCode;
pub use segment::{QrSegment, QrSegmentMode};
pub use version::{Mask, QrCodeEcc, Version};
