// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Vector4f };

use std::ops;
use std::vec::Vec;

/// Row-major grid of 4-channel cells. Channels 0..3 carry radiance, the
/// fourth is reserved and never written by the renderer.
#[derive(Debug, Clone)]
pub struct Bitmap {
    data: Vec<Vector4f>,
    height: usize,
    width: usize
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = Vector4f;

    fn index(&self, index: (usize, usize)) -> &Vector4f {
        assert!(index.0 < self.width && index.1 < self.height);
        &self.data[index.0 + self.width * index.1]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Vector4f {
        assert!(index.0 < self.width && index.1 < self.height);
        &mut self.data[index.0 + self.width * index.1]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let pixel_number = width * height;
        Self { data: vec!(Vector4f::zeros(); pixel_number),
               width: width,
               height: height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Vector4f] {
        &self.data
    }

    pub fn cells_mut(&mut self) -> &mut [Vector4f] {
        &mut self.data
    }

    /// RGB channels scaled by `scale`, row-major.
    pub fn raw_copy(&self, scale: Float) -> Vec<(Float, Float, Float)> {
        self.data.iter()
            .map(|c| (c.x * scale, c.y * scale, c.z * scale))
            .collect()
    }
}

/* Test for Bitmap */
