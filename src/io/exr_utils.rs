/* Copyright 2020 @TwoCookingMice */

use crate::math::constants::Float;
use crate::renderers::renderer::RenderError;

use exr::prelude::*;

// Write a linear RGB image to an OpenEXR file
pub fn write_exr_to_file(image: &[(Float, Float, Float)],
                         width: usize,
                         height: usize,
                         file_path: &str) -> std::result::Result<(), RenderError> {
    if image.len() != width * height {
        return Err(RenderError::InvalidResolution { width, height });
    }
    log::info!("Starting writing openexr image: {}.", file_path);

    write_rgb_file(file_path, width, height, |x, y| {
        let (r, g, b) = image[y * width + x];
        (r, g, b)
    })?;

    log::info!("EXR written to: {}.", file_path);
    Ok(())
}
