// Copyright @yucwang 2023

use crate::math::constants::{ INV_PI, Float, Vector2f, Vector3f };
use crate::math::frame::Frame;
use crate::math::warp::sample_cosine_hemisphere;

/// Lambertian BRDF with the albedo factored out; the path throughput
/// carries the albedo.
pub const NORMALIZED_BRDF: Float = INV_PI;

/// Cosine-weighted bounce direction around the oriented normal `nl`.
pub fn sample_direction(u: &Vector2f, nl: &Vector3f) -> Vector3f {
    let local = sample_cosine_hemisphere(u);
    Frame::from_z(*nl).from_local(local).normalize()
}
