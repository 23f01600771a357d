// Copyright @yucwang 2026

use crate::math::constants::{Float, UInt, Vector2u, Vector3f, Vector3u};

const HASH_MULTIPLIER: UInt = 1103515245;
const INV_2_24: Float = 1.0 / 16777216.0;

/// Stateless hash sampler: the same seed always yields the same three
/// values in [0, 1). Three shift/xor/multiply rounds mix every input lane
/// into every output lane.
pub fn rand01(seed: Vector3u) -> Vector3f {
    let mut x = [seed.x, seed.y, seed.z];
    for _ in 0..3 {
        x = [
            ((x[0] >> 8) ^ x[1]).wrapping_mul(HASH_MULTIPLIER),
            ((x[1] >> 8) ^ x[2]).wrapping_mul(HASH_MULTIPLIER),
            ((x[2] >> 8) ^ x[0]).wrapping_mul(HASH_MULTIPLIER),
        ];
    }

    Vector3f::new(to_unit(x[0]), to_unit(x[1]), to_unit(x[2]))
}

// Top 24 bits only, so the result is exactly representable and never 1.0.
fn to_unit(v: UInt) -> Float {
    (v >> 8) as Float * INV_2_24
}

/// Set in the y lane of camera seeds. Pixel rows never reach it, so a
/// camera seed cannot coincide with any bounce seed.
const CAMERA_SEED_SALT: UInt = 0x8000_0000;

/// Seed for the sensor jitter of one pixel in one pass.
pub fn camera_seed(pixel: Vector2u, pass: UInt) -> Vector3u {
    Vector3u::new(pixel.x, pixel.y | CAMERA_SEED_SALT, pass)
}

/// Seed for the bounce at `depth` of the path traced in `pass`.
pub fn bounce_seed(pixel: Vector2u, pass: UInt, max_depth: UInt, depth: UInt) -> Vector3u {
    Vector3u::new(pixel.x, pixel.y, pass.wrapping_mul(max_depth).wrapping_add(depth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rand01_is_deterministic() {
        let seed = Vector3u::new(17, 42, 3);
        let a = rand01(seed);
        for _ in 0..8 {
            assert_eq!(a, rand01(seed));
        }
    }

    #[test]
    fn test_rand01_range() {
        for x in 0..64 {
            for y in 0..64 {
                let v = rand01(Vector3u::new(x, y, 7));
                for c in v.iter() {
                    assert!(*c >= 0.0 && *c < 1.0);
                }
            }
        }
        let v = rand01(Vector3u::new(UInt::MAX, UInt::MAX, UInt::MAX));
        assert!(v.iter().all(|c| *c < 1.0));
    }

    #[test]
    fn test_rand01_adjacent_seeds_decorrelate() {
        let n = 128u32;
        let mut sum = Vector3f::zeros();
        let mut lag_product = 0.0f64;
        let mut prev = rand01(Vector3u::new(0, 1, 1));
        for x in 1..=n {
            for y in 1..=n {
                let v = rand01(Vector3u::new(x, y, 1));
                sum += v;
                lag_product += ((v.x - 0.5) * (prev.x - 0.5)) as f64;
                prev = v;
            }
        }
        let count = (n * n) as Float;
        let mean = sum / count;
        for c in mean.iter() {
            assert!((c - 0.5).abs() < 0.03, "mean {} too far from 0.5", c);
        }
        // Covariance of neighbours; uniform variance is 1/12 ~ 0.083.
        let cov = lag_product / count as f64;
        assert!(cov.abs() < 0.01, "neighbour covariance {}", cov);
    }

    #[test]
    fn test_bounce_seeds_differ_per_depth_and_pass() {
        let pixel = Vector2u::new(3, 9);
        let a = bounce_seed(pixel, 0, 12, 1);
        let b = bounce_seed(pixel, 0, 12, 2);
        let c = bounce_seed(pixel, 1, 12, 1);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(rand01(a), rand01(b));
    }

    #[test]
    fn test_camera_seeds_never_match_bounce_seeds() {
        for x in 0..4 {
            for y in 0..4 {
                let pixel = Vector2u::new(x, y);
                for pass in 0..40 {
                    let camera = camera_seed(pixel, pass);
                    for bounce_pass in 0..40 {
                        for depth in 0..12 {
                            assert_ne!(camera, bounce_seed(pixel, bounce_pass, 12, depth));
                        }
                    }
                }
            }
        }
        // Pass 0 jitter and the first bounce of pass 0 draw different numbers.
        let pixel = Vector2u::new(5, 7);
        assert_ne!(rand01(camera_seed(pixel, 0)), rand01(bounce_seed(pixel, 0, 12, 0)));
        assert_ne!(rand01(camera_seed(pixel, 12)), rand01(bounce_seed(pixel, 1, 12, 0)));
    }
}
