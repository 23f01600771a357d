// Copyright @yucwang 2026

use crate::core::shape::{Shape, SurfaceProperties};
use crate::math::constants::{EPSILON, Float, Vector3f};
use crate::math::ray::Ray3f;

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vector3f,
    radius: Float,
    surface: SurfaceProperties,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float, surface: SurfaceProperties) -> Self {
        Self { center, radius, surface }
    }

    pub fn center(&self) -> Vector3f {
        self.center
    }

    pub fn radius(&self) -> Float {
        self.radius
    }
}

impl Shape for Sphere {
    fn ray_intersection_t(&self, ray: &Ray3f) -> Option<Float> {
        // |o + t d - c|^2 = r^2 with |d| = 1
        let oc = self.center - ray.origin();
        let b = oc.dot(&ray.dir());
        let det = b * b - oc.dot(&oc) + self.radius * self.radius;
        if det < 0.0 {
            return None;
        }

        let det = det.sqrt();
        if b - det > EPSILON {
            Some(b - det)
        } else if b + det > EPSILON {
            Some(b + det)
        } else {
            None
        }
    }

    fn normal_at(&self, p: &Vector3f) -> Vector3f {
        (p - self.center).normalize()
    }

    fn surface(&self) -> &SurfaceProperties {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::spectrum::RGBSpectrum;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vector3f::zeros(), 1.0, SurfaceProperties::diffuse(RGBSpectrum::splat(0.5)))
    }

    #[test]
    fn test_sphere_analytic_hit() {
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0));
        let t = unit_sphere().ray_intersection_t(&ray).expect("expected a hit");
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0));
        let t = unit_sphere().ray_intersection_t(&ray).expect("expected a hit");
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_misses() {
        let sphere = unit_sphere();
        let beside = Ray3f::new(Vector3f::new(2.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0));
        assert!(sphere.ray_intersection_t(&beside).is_none());
        let behind = Ray3f::new(Vector3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(sphere.ray_intersection_t(&behind).is_none());
    }

    #[test]
    fn test_sphere_ignores_self_hit_at_origin() {
        // A secondary ray leaving the surface outward must not re-hit it.
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(unit_sphere().ray_intersection_t(&ray).is_none());
    }

    #[test]
    fn test_sphere_normal() {
        let n = unit_sphere().normal_at(&Vector3f::new(0.0, 2.0, 0.0));
        assert!((n - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }
}
