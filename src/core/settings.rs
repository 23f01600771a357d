// Copyright @yucwang 2026

use crate::integrators::path::{DEFAULT_MAX_DEPTH, DEFAULT_RR_DEPTH};
use crate::math::constants::UInt;

pub const DEFAULT_WIDTH: usize = 512;
pub const DEFAULT_HEIGHT: usize = 512;
pub const DEFAULT_SAMPLES_PER_PIXEL: UInt = 400;
/// Tiles are square blocks of this many pixels per side.
pub const DEFAULT_BLOCK_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    pub width: usize,
    pub height: usize,
    /// Total planned passes; one sample per pixel per pass.
    pub samples_per_pixel: UInt,
    pub max_depth: UInt,
    pub rr_depth: UInt,
    pub block_size: usize,
    /// Worker threads; `None` uses the available parallelism.
    pub threads: Option<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            samples_per_pixel: DEFAULT_SAMPLES_PER_PIXEL,
            max_depth: DEFAULT_MAX_DEPTH,
            rr_depth: DEFAULT_RR_DEPTH,
            block_size: DEFAULT_BLOCK_SIZE,
            threads: None,
        }
    }
}

impl RenderSettings {
    pub fn with_resolution(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_samples_per_pixel(mut self, spp: UInt) -> Self {
        self.samples_per_pixel = spp;
        self
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }
}
