// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::integrator::Integrator;
use crate::core::interaction::SurfaceInteraction;
use crate::core::rng::{bounce_seed, rand01};
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::core::shape::Shape;
use crate::materials::MaterialType;
use crate::materials::dielectric::{sample_dielectric, GLASS_IOR};
use crate::materials::lambertian_diffuse::{self, NORMALIZED_BRDF};
use crate::materials::specular::reflect;
use crate::math::constants::{Float, UInt, Vector2f, Vector2u};
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{sample_uniform_cone, uniform_cone_solid_angle};

pub const DEFAULT_MAX_DEPTH: UInt = 12;
pub const DEFAULT_RR_DEPTH: UInt = 5;

/// Unidirectional path tracer with next-event estimation towards emissive
/// spheres and Russian roulette past `rr_depth`.
pub struct PathIntegrator {
    pub max_depth: UInt,
    pub rr_depth: UInt,
    pub ior: Float,
}

impl PathIntegrator {
    pub fn new(max_depth: UInt) -> Self {
        Self { max_depth, rr_depth: DEFAULT_RR_DEPTH, ior: GLASS_IOR }
    }

    pub fn with_rr_depth(mut self, rr_depth: UInt) -> Self {
        self.rr_depth = rr_depth;
        self
    }

    pub fn trace_path(&self, scene: &Scene, mut ray: Ray3f, pixel: Vector2u, pass: UInt) -> RGBSpectrum {
        let mut radiance = RGBSpectrum::default();
        let mut throughput = RGBSpectrum::splat(1.0);
        // Emission is only picked up by camera rays and after specular
        // events; diffuse bounces already gathered it through NEE.
        let mut count_emission = true;

        for depth in 0..self.max_depth {
            // A miss skips the bounce instead of ending the path. The ray is
            // unchanged, so every remaining bounce misses too: open scenes
            // such as `single-light` waste up to `max_depth` intersection
            // queries per escaped path. Results match a `break`.
            let hit = match scene.ray_intersection(&ray) {
                Some(hit) => hit,
                None => continue,
            };

            let its = scene.interaction(&ray, &hit);
            let surface = its.surface();
            if count_emission {
                radiance += throughput * surface.emission;
            }
            throughput *= surface.albedo;

            let rnd = rand01(bounce_seed(pixel, pass, self.max_depth, depth));
            if depth > self.rr_depth {
                throughput = match russian_roulette(throughput, surface.albedo.max_component(), rnd.z) {
                    Some(survivor) => survivor,
                    None => break,
                };
            }

            let u = Vector2f::new(rnd.x, rnd.y);
            match surface.material {
                MaterialType::Diffuse => {
                    radiance += self.estimate_direct(scene, &its, throughput, &u);
                    let wi = lambertian_diffuse::sample_direction(&u, &its.oriented_normal());
                    ray = Ray3f::new(its.p(), wi);
                    count_emission = false;
                }
                MaterialType::Specular => {
                    ray = Ray3f::new(its.p(), reflect(&ray.dir(), &its.normal()));
                    count_emission = true;
                }
                MaterialType::Refractive => {
                    let sample = sample_dielectric(&ray.dir(), &its.normal(), &its.oriented_normal(), self.ior, rnd.x);
                    throughput *= sample.weight;
                    ray = Ray3f::new(its.p(), sample.dir);
                    count_emission = true;
                }
            }
        }

        radiance
    }

    /// Next-event estimate at a diffuse point: one direction per emissive
    /// sphere, drawn uniformly from the cone the sphere subtends.
    /// `throughput` already contains the albedo of the shaded surface.
    pub fn estimate_direct(&self,
                           scene: &Scene,
                           its: &SurfaceInteraction,
                           throughput: RGBSpectrum,
                           u: &Vector2f) -> RGBSpectrum {
        let mut direct = RGBSpectrum::default();
        let p = its.p();
        let nl = its.oriented_normal();

        for &light_index in scene.lights() {
            let light = &scene.spheres()[light_index];
            let to_center = light.center() - p;
            let dist2 = to_center.norm_squared();
            if dist2 <= 0.0 {
                continue;
            }

            let radius = light.radius();
            // Clamped for points on or inside the light.
            let cos_a_max = (1.0 - radius * radius / dist2).max(0.0).sqrt();
            let frame = Frame::from_z(to_center / dist2.sqrt());
            let l = frame.from_local(sample_uniform_cone(u, cos_a_max)).normalize();

            let shadow_ray = Ray3f::new(p, l);
            match scene.ray_intersection(&shadow_ray) {
                Some(hit) if hit.is_sphere(light_index) => {
                    let omega = uniform_cone_solid_angle(cos_a_max);
                    let cos_theta = l.dot(&nl).max(0.0);
                    direct += throughput * light.surface().emission * (NORMALIZED_BRDF * cos_theta * omega);
                }
                _ => {}
            }
        }

        direct
    }
}

/// Terminates with probability `1 - survival`; survivors are divided by
/// `survival` so the expected throughput is unchanged.
pub fn russian_roulette(throughput: RGBSpectrum, survival: Float, u: Float) -> Option<RGBSpectrum> {
    if u >= survival {
        None
    } else {
        Some(throughput / survival)
    }
}

impl Integrator for PathIntegrator {
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor, pixel: Vector2u, pass: UInt) -> RGBSpectrum {
        let ray = sensor.sample_ray(pixel, pass);
        self.trace_path(scene, ray, pixel, pass)
    }

    fn max_depth(&self) -> UInt {
        self.max_depth
    }
}

impl ComputationNode for PathIntegrator {
    fn describe(&self) -> String {
        format!("PathIntegrator(max_depth: {}, rr_depth: {}, ior: {})", self.max_depth, self.rr_depth, self.ior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::SurfaceProperties;
    use crate::math::constants::{Vector3f, Vector3u};
    use crate::shapes::plane::Plane;
    use crate::shapes::sphere::Sphere;

    fn light(emission: Float) -> SurfaceProperties {
        SurfaceProperties::new(RGBSpectrum::splat(emission), RGBSpectrum::default(), MaterialType::Diffuse)
    }

    #[test]
    fn test_directly_visible_light() {
        let scene = Scene::new(
            vec![Sphere::new(Vector3f::new(0.0, 0.0, -5.0), 1.0, light(2.0))],
            Vec::new(),
        ).expect("valid scene");
        let integrator = PathIntegrator::new(DEFAULT_MAX_DEPTH);
        assert_eq!(integrator.max_depth(), DEFAULT_MAX_DEPTH);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0));
        let l = integrator.trace_path(&scene, ray, Vector2u::new(3, 4), 0);
        for c in 0..3 {
            assert!((l[c] - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_miss_contributes_nothing() {
        let scene = Scene::new(
            vec![Sphere::new(Vector3f::new(0.0, 0.0, -5.0), 1.0, light(2.0))],
            Vec::new(),
        ).expect("valid scene");
        let integrator = PathIntegrator::new(DEFAULT_MAX_DEPTH);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0));
        assert!(integrator.trace_path(&scene, ray, Vector2u::new(0, 0), 0).is_black());
    }

    #[test]
    fn test_mirror_keeps_emission_visible() {
        let mirror = SurfaceProperties::new(RGBSpectrum::default(), RGBSpectrum::splat(0.9), MaterialType::Specular);
        let scene = Scene::new(
            vec![Sphere::new(Vector3f::new(0.0, 0.0, 3.0), 1.0, light(3.0))],
            vec![Plane::new(Vector3f::new(0.0, 0.0, -1.0), 5.0, mirror)],
        ).expect("valid scene");
        let integrator = PathIntegrator::new(DEFAULT_MAX_DEPTH);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0));
        let l = integrator.trace_path(&scene, ray, Vector2u::new(1, 1), 2);
        for c in 0..3 {
            assert!((l[c] - 2.7).abs() < 1e-4);
        }
    }

    #[test]
    fn test_direct_lighting_matches_analytic_irradiance() {
        // Sphere light of radiance L, radius r, centred at distance d above a
        // diffuse point: reflected radiance is albedo * L * (r / d)^2.
        let floor = SurfaceProperties::diffuse(RGBSpectrum::splat(0.5));
        let scene = Scene::new(
            vec![Sphere::new(Vector3f::new(0.0, 3.0, 0.0), 1.0, light(1.0))],
            vec![Plane::new(Vector3f::new(0.0, -1.0, 0.0), 0.0, floor)],
        ).expect("valid scene");
        let integrator = PathIntegrator::new(DEFAULT_MAX_DEPTH);

        let ray = Ray3f::new(Vector3f::new(0.0, 1.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        let hit = scene.ray_intersection(&ray).expect("floor hit");
        let its = scene.interaction(&ray, &hit);
        let throughput = its.surface().albedo;

        let n = 4096u32;
        let mut sum = 0.0;
        for i in 0..n {
            let rnd = rand01(Vector3u::new(i, 7, 11));
            let direct = integrator.estimate_direct(&scene, &its, throughput, &Vector2f::new(rnd.x, rnd.y));
            assert!(direct.min_component() >= 0.0);
            sum += direct[0];
        }
        let mean = sum / n as Float;
        let expected = 0.5 / 9.0;
        assert!((mean - expected).abs() < 0.03 * expected, "mean {} expected {}", mean, expected);
    }

    #[test]
    fn test_self_emissive_diffuse_surface_does_not_light_itself() {
        let glowing = SurfaceProperties::new(RGBSpectrum::splat(1.0), RGBSpectrum::splat(0.5), MaterialType::Diffuse);
        let scene = Scene::new(
            vec![Sphere::new(Vector3f::zeros(), 1.0, glowing)],
            Vec::new(),
        ).expect("valid scene");
        let integrator = PathIntegrator::new(DEFAULT_MAX_DEPTH);

        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0));
        let hit = scene.ray_intersection(&ray).expect("sphere hit");
        let its = scene.interaction(&ray, &hit);
        for i in 0..64u32 {
            let rnd = rand01(Vector3u::new(i, 1, 2));
            let direct = integrator.estimate_direct(&scene, &its, its.surface().albedo, &Vector2f::new(rnd.x, rnd.y));
            assert!(direct.is_finite());
            assert!(direct.is_black());
        }

        let l = integrator.trace_path(&scene, ray, Vector2u::new(0, 0), 0);
        assert!(l.is_finite());
        assert!((l[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_russian_roulette_is_unbiased() {
        let throughput = RGBSpectrum::new(1.0, 0.5, 0.25);
        let survival = 0.6;
        let n = 20000u32;
        let mut sum = RGBSpectrum::default();
        let mut survivors = 0u32;
        for i in 0..n {
            let u = rand01(Vector3u::new(i, 3, 5)).z;
            if let Some(t) = russian_roulette(throughput, survival, u) {
                sum += t;
                survivors += 1;
            }
        }
        let mean = sum / n as Float;
        for c in 0..3 {
            assert!((mean[c] - throughput[c]).abs() < 0.03 * throughput[c].max(0.1) + 0.01,
                    "channel {}: {} vs {}", c, mean[c], throughput[c]);
        }
        let rate = survivors as Float / n as Float;
        assert!((rate - survival).abs() < 0.02);
    }

    #[test]
    fn test_russian_roulette_zero_albedo_always_terminates() {
        assert!(russian_roulette(RGBSpectrum::splat(1.0), 0.0, 0.0).is_none());
        let survivor = russian_roulette(RGBSpectrum::splat(1.0), 1.0, 0.999).expect("survives");
        assert_eq!(survivor, RGBSpectrum::splat(1.0));
    }

    #[test]
    fn test_closed_box_radiance_is_finite_and_non_negative() {
        let scene = crate::scenes::cornell_box().expect("preset is valid");
        let integrator = PathIntegrator::new(DEFAULT_MAX_DEPTH);
        let camera = crate::sensors::pinhole::PinholeCamera::cornell(16, 16);
        for y in 0..16 {
            for x in 0..16 {
                let l = integrator.trace_ray_forward(&scene, &camera, Vector2u::new(x, y), 0);
                assert!(l.is_finite());
                assert!(l.min_component() >= 0.0);
            }
        }
    }
}
