// Copyright @yucwang 2026

use crate::core::rng::{camera_seed, rand01};
use crate::core::sensor::Sensor;
use crate::math::constants::{Float, UInt, Vector2f, Vector2u, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::warp::sample_tent;

pub const DEFAULT_SENSOR_WIDTH: Float = 0.03;
pub const DEFAULT_LENS_DISTANCE: Float = 0.035;

/// Pinhole camera: a sensor plane behind a lens centre. Rays start at the
/// lens centre and point away from the jittered sensor position.
pub struct PinholeCamera {
    origin: Vector3f,
    dir: Vector3f,
    cx: Vector3f,
    cy: Vector3f,
    sensor_size: Vector2f,
    lens_distance: Float,
    width: usize,
    height: usize,
}

impl PinholeCamera {
    /// `sensor_width` is the horizontal sensor extent; the vertical extent
    /// follows the image aspect ratio.
    pub fn new(origin: Vector3f,
               direction: Vector3f,
               sensor_width: Float,
               lens_distance: Float,
               width: usize,
               height: usize) -> Self {
        let dir = direction.normalize();
        let up = if dir.y.abs() < 0.9 {
            Vector3f::new(0.0, 1.0, 0.0)
        } else {
            Vector3f::new(0.0, 0.0, 1.0)
        };
        let cx = dir.cross(&up).normalize();
        let cy = cx.cross(&dir);
        let aspect = if width > 0 { height as Float / width as Float } else { 1.0 };

        Self {
            origin,
            dir,
            cx,
            cy,
            sensor_size: Vector2f::new(sensor_width, sensor_width * aspect),
            lens_distance,
            width,
            height,
        }
    }

    /// Placement used by the built-in box scene.
    pub fn cornell(width: usize, height: usize) -> Self {
        Self::new(Vector3f::new(0.0, 0.52, 7.4),
                  Vector3f::new(0.0, -0.06, -1.0),
                  DEFAULT_SENSOR_WIDTH,
                  DEFAULT_LENS_DISTANCE,
                  width,
                  height)
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn direction(&self) -> Vector3f {
        self.dir
    }
}

impl Sensor for PinholeCamera {
    fn sample_ray(&self, pixel: Vector2u, pass: UInt) -> Ray3f {
        let rnd = rand01(camera_seed(pixel, pass));
        let tent = Vector2f::new(sample_tent(rnd.x), sample_tent(rnd.y));
        // 2x2 sub-pixel strata cycled by pass, plus the tent jitter.
        let strata = Vector2f::new(((pass / 2) % 2) as Float, (pass % 2) as Float);

        // The pinhole flips the image horizontally; read the mirrored column.
        let column = self.width.saturating_sub(1 + pixel.x as usize) as Float;
        let row = pixel.y as Float;
        let sx = ((column + 0.5 * (0.5 + strata.x + tent.x)) / self.width as Float - 0.5) * self.sensor_size.x;
        let sy = ((row + 0.5 * (0.5 + strata.y + tent.y)) / self.height as Float - 0.5) * self.sensor_size.y;

        let sensor_pos = self.origin + self.cx * sx + self.cy * sy;
        let lens_center = self.origin + self.dir * self.lens_distance;
        Ray3f::new(lens_center, lens_center - sensor_pos)
    }

    fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn describe(&self) -> String {
        format!("PinholeCamera {}x{} origin ({:.3}, {:.3}, {:.3}) dir ({:.3}, {:.3}, {:.3})",
                self.width, self.height,
                self.origin.x, self.origin.y, self.origin.z,
                self.dir.x, self.dir.y, self.dir.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinhole_center_ray() {
        let cam = PinholeCamera::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0),
                                     DEFAULT_SENSOR_WIDTH, DEFAULT_LENS_DISTANCE, 101, 101);
        for pass in 0..8 {
            let ray = cam.sample_ray(Vector2u::new(50, 50), pass);
            assert!(ray.dir().dot(&Vector3f::new(0.0, 0.0, -1.0)) > 0.999);
            assert!((ray.origin() - Vector3f::new(0.0, 0.0, -DEFAULT_LENS_DISTANCE)).norm() < 1e-6);
        }
    }

    #[test]
    fn test_pinhole_image_orientation() {
        let cam = PinholeCamera::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0),
                                     DEFAULT_SENSOR_WIDTH, DEFAULT_LENS_DISTANCE, 64, 64);
        // Top-left pixel looks up and to the left.
        let top_left = cam.sample_ray(Vector2u::new(0, 0), 3).dir();
        assert!(top_left.x < 0.0);
        assert!(top_left.y > 0.0);
        let bottom_right = cam.sample_ray(Vector2u::new(63, 63), 3).dir();
        assert!(bottom_right.x > 0.0);
        assert!(bottom_right.y < 0.0);
    }

    #[test]
    fn test_pinhole_jitter_is_deterministic_per_pass() {
        let cam = PinholeCamera::cornell(32, 32);
        let a = cam.sample_ray(Vector2u::new(7, 9), 4).dir();
        let b = cam.sample_ray(Vector2u::new(7, 9), 4).dir();
        let c = cam.sample_ray(Vector2u::new(7, 9), 5).dir();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_pinhole_sensor_follows_aspect() {
        let cam = PinholeCamera::cornell(200, 100);
        assert!((cam.sensor_size.y - 0.5 * cam.sensor_size.x).abs() < 1e-7);
        assert_eq!(cam.resolution(), (200, 100));
    }
}
