//! Rendering utilities: SVG markup, console art and raster images of a finished [`QrCode`].

use std::path::Path;

use image::error::{LimitError, LimitErrorKind};
use image::{ImageBuffer, ImageError, Luma};

use crate::error::{QrError, Result};
use crate::qrcode::QrCode;

/// Returns a string of SVG code for an image depicting
/// the given QR Code, with the given number of border modules.
/// The string always uses Unix newlines (\n), regardless of the platform.
pub fn to_svg_string(qr: &QrCode, border: i32) -> Result<String> {
    let dimension = Some(border)
        .filter(|&b| b >= 0)
        .and_then(|b| b.checked_mul(2))
        .and_then(|b| qr.size().checked_add(b))
        .ok_or(QrError::InvalidBorder(border))?;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        dimension
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
    result += "\t<path d=\"";
    let mut first = true;
    for y in 0..qr.size() {
        for x in 0..qr.size() {
            if qr.get_module(x, y) {
                if !first {
                    result += " ";
                }
                first = false;
                result += &format!("M{},{}h1v1h-1z", x + border, y + border);
            }
        }
    }
    result += "\" fill=\"#000000\"/>\n";
    result += "</svg>\n";
    Ok(result)
}

/// Renders the symbol as text, two characters per module, one line per row.
/// A negative border is treated as zero.
pub fn to_text(qr: &QrCode, border: i32) -> String {
    let border = border.max(0);
    let mut result = String::new();
    for y in -border..qr.size() + border {
        for x in -border..qr.size() + border {
            let c: char = if qr.get_module(x, y) { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    result
}

/// Rasterizes the QR Code into a grayscale image buffer.
///
/// Each module becomes a `scale`×`scale` block of pixels (black for dark, white for light),
/// surrounded by `border` light modules on every side. A `scale` of 0 is treated as 1.
///
/// # Errors
///
/// [`QrError::ImageTooLarge`] if the side length in pixels does not fit a `u32`.
///
/// # Example
///
/// ```
/// use qrforge::helper::to_image_buffer;
/// use qrforge::qrcode::QrCode;
/// use qrforge::version::QrCodeEcc;
///
/// let qr = QrCode::encode_text("Hello, world!", QrCodeEcc::Low).unwrap();
/// let img = to_image_buffer(&qr, 4, 1).unwrap();
/// assert_eq!(img.dimensions(), (29, 29));
/// ```
pub fn to_image_buffer(
    qr: &QrCode,
    border: u32,
    scale: u32,
) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>> {
    let scale = scale.max(1);
    let side = border
        .checked_mul(2)
        .and_then(|b| b.checked_add(qr.size() as u32))
        .and_then(|modules| modules.checked_mul(scale))
        .ok_or(QrError::ImageTooLarge { border, scale })?;
    // Pixel to module coordinate; anything outside the i32 range lands in the quiet zone
    let coord = |p: u32| i32::try_from(i64::from(p / scale) - i64::from(border)).unwrap_or(-1);
    Ok(ImageBuffer::from_fn(side, side, |x, y| {
        if qr.get_module(coord(x), coord(y)) {
            Luma([0u8]) // Black
        } else {
            Luma([255u8]) // White
        }
    }))
}

/// Rasterizes the QR Code and writes it as a PNG file at `path`.
///
/// The parent directory is created if it does not exist yet. An image too large to
/// rasterize is reported as a dimension limit error.
pub fn save_png<P: AsRef<Path>>(
    qr: &QrCode,
    border: u32,
    scale: u32,
    path: P,
) -> image::ImageResult<()> {
    let img = to_image_buffer(qr, border, scale)
        .map_err(|_| ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError)))?;
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    img.save_with_format(path, image::ImageFormat::Png)
}
