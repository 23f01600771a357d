// Copyright @yucwang 2023

use crate::core::shape::SurfaceProperties;
use crate::math::constants::{ Float, Vector3f };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Plane,
    Sphere,
}

/// Result of a nearest-hit query. Only valid until the next query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    pub t: Float,
    pub kind: ObjectKind,
    pub index: usize,
}

impl HitInfo {
    pub fn new(t: Float, kind: ObjectKind, index: usize) -> Self {
        Self { t, kind, index }
    }

    pub fn is_sphere(&self, index: usize) -> bool {
        self.kind == ObjectKind::Sphere && self.index == index
    }
}

/// Shading data resolved from a `HitInfo`.
pub struct SurfaceInteraction<'a> {
    p: Vector3f,
    normal: Vector3f,
    oriented_normal: Vector3f,
    surface: &'a SurfaceProperties,
}

impl<'a> SurfaceInteraction<'a> {
    /// `incoming` is the direction of the ray that produced the hit; the
    /// oriented normal is flipped to face against it.
    pub fn new(p: Vector3f, normal: Vector3f, incoming: &Vector3f, surface: &'a SurfaceProperties) -> Self {
        let oriented_normal = if normal.dot(incoming) < 0.0 { normal } else { -normal };
        Self { p, normal, oriented_normal, surface }
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    pub fn oriented_normal(&self) -> Vector3f {
        self.oriented_normal
    }

    pub fn surface(&self) -> &'a SurfaceProperties {
        self.surface
    }
}
