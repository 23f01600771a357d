// Copyright @yucwang 2026

use crate::core::interaction::{HitInfo, ObjectKind, SurfaceInteraction};
use crate::core::shape::{Shape, SurfaceProperties};
use crate::materials::MaterialType;
use crate::math::constants::{ Float, INFINITY, Vector3f };
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::shapes::plane::Plane;
use crate::shapes::sphere::Sphere;

use thiserror::Error;

/// Floats per sphere or plane record in the flat scene buffers:
/// `[center|normal.xyz, radius|offset, emission.xyz, 0, albedo.rgb, material]`.
pub const FLOATS_PER_RECORD: usize = 12;

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("{kind} buffer has {len} floats, not a multiple of 12")]
    MalformedBuffer { kind: &'static str, len: usize },

    #[error("sphere {index} has invalid radius {radius}")]
    InvalidRadius { index: usize, radius: Float },

    #[error("{kind} {index} has invalid material code {code}")]
    InvalidMaterial { kind: &'static str, index: usize, code: Float },

    #[error("{kind} {index} has negative or non-finite emission")]
    NegativeEmission { kind: &'static str, index: usize },

    #[error("{kind} {index} has albedo outside [0, 1]")]
    InvalidAlbedo { kind: &'static str, index: usize },

    #[error("plane {index} has a degenerate normal")]
    DegenerateNormal { index: usize },
}

/// Immutable spheres and planes. Rendering only ever borrows it, so a
/// different scene means a new renderer and a fresh accumulation.
#[derive(Debug, Clone)]
pub struct Scene {
    spheres: Vec<Sphere>,
    planes: Vec<Plane>,
    lights: Vec<usize>,
}

impl Scene {
    pub fn new(spheres: Vec<Sphere>, planes: Vec<Plane>) -> Result<Self, SceneError> {
        for (index, sphere) in spheres.iter().enumerate() {
            if !(sphere.radius() > 0.0) || !sphere.radius().is_finite() {
                return Err(SceneError::InvalidRadius { index, radius: sphere.radius() });
            }
            validate_surface("sphere", index, sphere.surface())?;
        }

        let mut normalized = Vec::with_capacity(planes.len());
        for (index, plane) in planes.into_iter().enumerate() {
            validate_surface("plane", index, plane.surface())?;
            let length = plane.normal().norm();
            if !(length > 0.0) || !length.is_finite() {
                return Err(SceneError::DegenerateNormal { index });
            }
            if (length - 1.0).abs() > 1e-4 {
                log::warn!("Plane {} normal has length {}, normalizing.", index, length);
                normalized.push(Plane::new(plane.normal() / length, plane.offset() / length, *plane.surface()));
            } else {
                normalized.push(plane);
            }
        }

        let lights: Vec<usize> = spheres.iter()
            .enumerate()
            .filter(|(_, s)| s.surface().is_emissive())
            .map(|(i, _)| i)
            .collect();

        log::debug!("Scene built: {} spheres, {} planes, {} emissive spheres.",
                    spheres.len(), normalized.len(), lights.len());

        Ok(Self { spheres, planes: normalized, lights })
    }

    /// Decodes the flat 12-float-per-record buffers.
    pub fn from_raw_buffers(spheres: &[Float], planes: &[Float]) -> Result<Self, SceneError> {
        let spheres = decode_records("sphere", spheres)?
            .into_iter()
            .map(|(geo, w, surface)| Sphere::new(geo, w, surface))
            .collect();
        let planes = decode_records("plane", planes)?
            .into_iter()
            .map(|(geo, w, surface)| Plane::new(geo, w, surface))
            .collect();
        Self::new(spheres, planes)
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Indices of spheres with non-zero emission.
    pub fn lights(&self) -> &[usize] {
        &self.lights
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty() && self.planes.is_empty()
    }

    /// Globally nearest hit beyond `EPSILON`; earlier primitives win ties.
    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<HitInfo> {
        let mut nearest: Option<HitInfo> = None;
        let mut t_max = INFINITY;

        for (index, plane) in self.planes.iter().enumerate() {
            if let Some(t) = plane.ray_intersection_t(ray) {
                if t < t_max {
                    t_max = t;
                    nearest = Some(HitInfo::new(t, ObjectKind::Plane, index));
                }
            }
        }

        for (index, sphere) in self.spheres.iter().enumerate() {
            if let Some(t) = sphere.ray_intersection_t(ray) {
                if t < t_max {
                    t_max = t;
                    nearest = Some(HitInfo::new(t, ObjectKind::Sphere, index));
                }
            }
        }

        nearest
    }

    pub fn shape(&self, kind: ObjectKind, index: usize) -> &dyn Shape {
        match kind {
            ObjectKind::Plane => &self.planes[index],
            ObjectKind::Sphere => &self.spheres[index],
        }
    }

    pub fn interaction(&self, ray: &Ray3f, hit: &HitInfo) -> SurfaceInteraction<'_> {
        let shape = self.shape(hit.kind, hit.index);
        let p = ray.at(hit.t);
        SurfaceInteraction::new(p, shape.normal_at(&p), &ray.dir(), shape.surface())
    }
}

fn validate_surface(kind: &'static str, index: usize, surface: &SurfaceProperties) -> Result<(), SceneError> {
    if !surface.emission.is_finite() || surface.emission.min_component() < 0.0 {
        return Err(SceneError::NegativeEmission { kind, index });
    }
    if !surface.albedo.is_finite()
        || surface.albedo.min_component() < 0.0
        || surface.albedo.max_component() > 1.0 {
        return Err(SceneError::InvalidAlbedo { kind, index });
    }
    Ok(())
}

fn decode_records(kind: &'static str, data: &[Float]) -> Result<Vec<(Vector3f, Float, SurfaceProperties)>, SceneError> {
    if data.len() % FLOATS_PER_RECORD != 0 {
        return Err(SceneError::MalformedBuffer { kind, len: data.len() });
    }

    data.chunks_exact(FLOATS_PER_RECORD)
        .enumerate()
        .map(|(index, r)| {
            let material = MaterialType::from_wire(r[11])
                .ok_or(SceneError::InvalidMaterial { kind, index, code: r[11] })?;
            let surface = SurfaceProperties::new(
                RGBSpectrum::new(r[4], r[5], r[6]),
                RGBSpectrum::new(r[8], r[9], r[10]),
                material,
            );
            Ok((Vector3f::new(r[0], r[1], r[2]), r[3], surface))
        })
        .collect()
}
