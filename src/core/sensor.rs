// Copyright @yucwang 2026

use crate::math::constants::{UInt, Vector2u};
use crate::math::ray::Ray3f;

pub trait Sensor: Sync {
    /// Primary ray for `pixel` (row-major, row 0 at the top) in `pass`.
    fn sample_ray(&self, pixel: Vector2u, pass: UInt) -> Ray3f;
    fn resolution(&self) -> (usize, usize);
    fn describe(&self) -> String {
        String::from("Sensor")
    }
}
