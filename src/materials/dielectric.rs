// Copyright @yucwang 2026

use crate::materials::specular::reflect;
use crate::math::constants::{ Float, Vector3f };

/// Index of refraction of every refractive surface; the outside is vacuum.
pub const GLASS_IOR: Float = 1.5;
const OUTSIDE_IOR: Float = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DielectricLobe {
    Reflection,
    Transmission,
    TotalInternalReflection,
}

#[derive(Debug, Clone, Copy)]
pub struct DielectricSample {
    pub dir: Vector3f,
    /// Throughput factor compensating for the lobe selection probability.
    pub weight: Float,
    pub lobe: DielectricLobe,
}

/// Schlick's approximation of the Fresnel reflectance.
pub fn schlick_reflectance(eta_i: Float, eta_t: Float, cos_theta: Float) -> Float {
    let a = eta_t - eta_i;
    let b = eta_t + eta_i;
    let r0 = a * a / (b * b);
    let c = 1.0 - cos_theta;
    r0 + (1.0 - r0) * c * c * c * c * c
}

/// Chooses reflection or transmission at a smooth dielectric boundary.
///
/// `n` is the geometric outward normal and `nl` the normal oriented against
/// `d`. Reflection is picked with probability `0.25 + 0.5 * Re`, so the
/// returned weight is `Re / P` or `Tr / (1 - P)`. Without a real refracted
/// direction the ray always reflects with unit weight.
pub fn sample_dielectric(d: &Vector3f, n: &Vector3f, nl: &Vector3f, ior: Float, u: Float) -> DielectricSample {
    let into = n.dot(nl) > 0.0;
    let nnt = if into { OUTSIDE_IOR / ior } else { ior / OUTSIDE_IOR };
    let ddn = d.dot(nl);
    let cos2t = 1.0 - nnt * nnt * (1.0 - ddn * ddn);

    if cos2t < 0.0 {
        return DielectricSample {
            dir: reflect(d, n),
            weight: 1.0,
            lobe: DielectricLobe::TotalInternalReflection,
        };
    }

    let sign = if into { 1.0 } else { -1.0 };
    let tdir = (d * nnt - n * (sign * (ddn * nnt + cos2t.sqrt()))).normalize();
    let cos_theta = if into { -ddn } else { tdir.dot(n) };
    let re = schlick_reflectance(OUTSIDE_IOR, ior, cos_theta);
    let tr = 1.0 - re;
    let p = 0.25 + 0.5 * re;

    if u < p {
        DielectricSample { dir: reflect(d, n), weight: re / p, lobe: DielectricLobe::Reflection }
    } else {
        DielectricSample { dir: tdir, weight: tr / (1.0 - p), lobe: DielectricLobe::Transmission }
    }
}
