// Copyright @yucwang 2026

use crate::math::constants::Vector3f;

/// Mirror reflection of `d` about `n`. The sign of `n` does not matter.
pub fn reflect(d: &Vector3f, n: &Vector3f) -> Vector3f {
    d - n * (2.0 * d.dot(n))
}
