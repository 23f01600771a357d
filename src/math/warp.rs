// Copyright @yucwang 2023

use super::constants::{ PI, Float, Vector2f, Vector3f };

pub fn sample_uniform_disk_concentric(u: &Vector2f) -> Vector2f {
    let r1: Float = 2.0 * u.x - 1.0;
    let r2: Float = 2.0 * u.y - 1.0;

    let phi: Float;
    let r:   Float;

    if r1 == 0. && r2 == 0. {
        r = 0.0;
        phi = 0.0;
    } else if r1 * r1 > r2 * r2 {
        r = r1;
        phi = (PI / 4.0) * (r2 / r1);
    } else {
        r = r2;
        phi = (PI / 2.0) - (r1 / r2) * (PI / 4.0);
    }

    let (sin_phi, cos_phi) = phi.sin_cos();

    return Vector2f::new(r * cos_phi, r * sin_phi)
}

/// Cosine-weighted direction around +z.
pub fn sample_cosine_hemisphere(u: &Vector2f) -> Vector3f {
    let p = sample_uniform_disk_concentric(&u);
    let z = (1. - p.x * p.x - p.y * p.y).max(0.0).sqrt();

    return Vector3f::new(p.x, p.y, z)
}

/// Direction distributed uniformly over the solid angle of the cone around
/// +z whose half-angle has cosine `cos_theta_max`.
pub fn sample_uniform_cone(u: &Vector2f, cos_theta_max: Float) -> Vector3f {
    let cos_theta = 1.0 - u.x + u.x * cos_theta_max;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let (sin_phi, cos_phi) = (2.0 * PI * u.y).sin_cos();

    Vector3f::new(cos_phi * sin_theta, sin_phi * sin_theta, cos_theta)
}

pub fn uniform_cone_solid_angle(cos_theta_max: Float) -> Float {
    2.0 * PI * (1.0 - cos_theta_max)
}

/// Maps one uniform in [0,1) to the tent filter on (-1, 1).
pub fn sample_tent(u: Float) -> Float {
    let v = 2.0 * u;
    if v < 1.0 {
        v.sqrt() - 1.0
    } else {
        1.0 - (2.0 - v).sqrt()
    }
}
