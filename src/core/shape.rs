// Copyright @yucwang 2023

use crate::materials::MaterialType;
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Appearance shared by every primitive kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceProperties {
    pub emission: RGBSpectrum,
    pub albedo: RGBSpectrum,
    pub material: MaterialType,
}

impl SurfaceProperties {
    pub fn new(emission: RGBSpectrum, albedo: RGBSpectrum, material: MaterialType) -> Self {
        Self { emission, albedo, material }
    }

    pub fn diffuse(albedo: RGBSpectrum) -> Self {
        Self::new(RGBSpectrum::default(), albedo, MaterialType::Diffuse)
    }

    pub fn is_emissive(&self) -> bool {
        !self.emission.is_black()
    }
}

pub trait Shape: Send + Sync {
    /// Parametric distance of the nearest valid hit beyond `EPSILON`.
    fn ray_intersection_t(&self, ray: &Ray3f) -> Option<Float>;
    /// Geometric normal at a point on the surface, not yet oriented
    /// against any ray.
    fn normal_at(&self, p: &Vector3f) -> Vector3f;
    fn surface(&self) -> &SurfaceProperties;
}
