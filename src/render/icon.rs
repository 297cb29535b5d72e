use embedded_graphics::prelude::Size;
use image::imageops::FilterType;

use super::Frame;

/// Convert an encoded image (the weather icon) into a face frame.
///
/// The image is stretched to the display size and reduced to luma. An inverted icon lights every
/// pixel at or below `pixel_threshold` (dark ink on a light background), a plain one every pixel at
/// or above it.
pub fn icon_frame(
    encoded: &[u8],
    size: Size,
    invert: bool,
    pixel_threshold: u8,
) -> Result<Frame, image::ImageError> {
    let image = image::load_from_memory(encoded)?;
    let gray = image
        .resize_exact(size.width, size.height, FilterType::CatmullRom)
        .into_luma8();

    let mut frame = Frame::new(size);
    for (x, y, pixel) in gray.enumerate_pixels() {
        let luma = pixel.0[0];
        let lit = if invert {
            luma <= pixel_threshold
        } else {
            luma >= pixel_threshold
        };
        frame.set(x, y, lit);
    }

    tracing::debug!(lit = frame.lit_count(), ?size, "Converted icon to frame");
    Ok(frame)
}
