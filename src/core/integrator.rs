// Copyright @yucwang 2026

use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::{UInt, Vector2u};
use crate::math::spectrum::RGBSpectrum;

pub trait Integrator: Sync {
    /// One radiance sample for `pixel` in `pass`. Must be a pure function of
    /// its arguments so passes can run on any number of threads.
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor, pixel: Vector2u, pass: UInt) -> RGBSpectrum;
    fn max_depth(&self) -> UInt;
}
