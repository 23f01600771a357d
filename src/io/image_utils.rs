// Copyright @yucwang 2026

use crate::math::bitmap::Bitmap;
use crate::renderers::progressive::RenderState;
use crate::renderers::renderer::RenderError;

use image::{Rgba, RgbaImage};

/// Converts a finalized bitmap (channels already in [0, 255]) to 8-bit RGBA
/// with opaque alpha. Channel 3 of the accumulator is ignored.
pub fn to_rgba_image(bitmap: &Bitmap) -> RgbaImage {
    let width = bitmap.width() as u32;
    let height = bitmap.height() as u32;
    RgbaImage::from_fn(width, height, |x, y| {
        let cell = bitmap[(x as usize, y as usize)];
        let byte = |v: f32| v.clamp(0.0, 255.0) as u8;
        Rgba([byte(cell[0]), byte(cell[1]), byte(cell[2]), 255])
    })
}

/// Only a finalized buffer holds display values; anything else is raw
/// linear radiance and is refused.
pub fn write_png(bitmap: &Bitmap, state: RenderState, file_path: &str) -> Result<(), RenderError> {
    if state != RenderState::Finalized {
        return Err(RenderError::NotFinalized);
    }
    log::info!("Starting writing png image: {}.", file_path);
    to_rgba_image(bitmap).save(file_path)?;
    log::info!("PNG written to: {}.", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector4f;

    #[test]
    fn test_rgba_conversion() {
        let mut bitmap = Bitmap::new(2, 1);
        bitmap[(0, 0)] = Vector4f::new(187.0, 0.0, 255.0, 0.0);
        bitmap[(1, 0)] = Vector4f::new(12.0, 300.0, -3.0, 7.0);
        let image = to_rgba_image(&bitmap);
        assert_eq!(image.get_pixel(0, 0), &Rgba([187, 0, 255, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([12, 255, 0, 255]));
    }

    #[test]
    fn test_refuses_unfinalized_buffer() {
        let bitmap = Bitmap::new(2, 2);
        assert!(matches!(write_png(&bitmap, RenderState::Running { pass: 3 }, "unused.png"), Err(RenderError::NotFinalized)));
    }
}
