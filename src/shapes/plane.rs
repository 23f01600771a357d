// Copyright @yucwang 2026

use crate::core::shape::{Shape, SurfaceProperties};
use crate::math::constants::{EPSILON, Float, Vector3f};
use crate::math::ray::Ray3f;

/// Implicit one-sided plane `dot(x, normal) = offset`. Only rays travelling
/// along the outward normal hit it, i.e. rays leaving the enclosed side.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vector3f,
    offset: Float,
    surface: SurfaceProperties,
}

impl Plane {
    pub fn new(normal: Vector3f, offset: Float, surface: SurfaceProperties) -> Self {
        Self { normal, offset, surface }
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    pub fn offset(&self) -> Float {
        self.offset
    }
}

impl Shape for Plane {
    fn ray_intersection_t(&self, ray: &Ray3f) -> Option<Float> {
        let denom = ray.dir().dot(&self.normal);
        if denom <= EPSILON {
            return None;
        }

        let t = (self.offset - ray.origin().dot(&self.normal)) / denom;
        if t > EPSILON {
            Some(t)
        } else {
            None
        }
    }

    fn normal_at(&self, _p: &Vector3f) -> Vector3f {
        self.normal
    }

    fn surface(&self) -> &SurfaceProperties {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::spectrum::RGBSpectrum;

    fn floor() -> Plane {
        // y = -2, enclosed side above.
        Plane::new(Vector3f::new(0.0, -1.0, 0.0), 2.0, SurfaceProperties::diffuse(RGBSpectrum::splat(0.75)))
    }

    #[test]
    fn test_plane_hit_from_inside() {
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, -1.0, 0.0));
        let t = floor().ray_intersection_t(&ray).expect("expected a hit");
        assert!((t - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_plane_parallel_ray_misses() {
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0));
        assert!(floor().ray_intersection_t(&ray).is_none());
        let almost = Ray3f::new(Vector3f::zeros(), Vector3f::new(1.0, -1e-6, 0.0));
        assert!(floor().ray_intersection_t(&almost).is_none());
    }

    #[test]
    fn test_plane_is_one_sided() {
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0));
        assert!(floor().ray_intersection_t(&ray).is_none());
        // Origin already beyond the boundary: the root lies behind the ray.
        let outside = Ray3f::new(Vector3f::new(0.0, -3.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        assert!(floor().ray_intersection_t(&outside).is_none());
    }
}
