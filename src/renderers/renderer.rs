// Copyright @yucwang 2021

use crate::math::bitmap::Bitmap;
use crate::math::constants::UInt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no worker threads available: {0}")]
    BackendUnavailable(String),

    #[error("invalid resolution {width}x{height}")]
    InvalidResolution { width: usize, height: usize },

    #[error("samples per pixel must be at least 1")]
    InvalidSampleCount,

    #[error("block size must be at least 1")]
    InvalidBlockSize,

    #[error("accumulation is finalized, no further passes may run")]
    AlreadyFinalized,

    #[error("pass {pass} finished {completed} of {expected} blocks")]
    IncompletePass { pass: UInt, completed: usize, expected: usize },

    #[error("accumulation is not finalized yet")]
    NotFinalized,

    #[error("nothing accumulated yet")]
    NothingAccumulated,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("exr error: {0}")]
    Exr(#[from] exr::error::Error),
}

pub trait Renderer {
    /// Runs every remaining pass and returns the finalized buffer.
    fn render(&mut self) -> Result<&Bitmap, RenderError>;
}
