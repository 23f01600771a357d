// Copyright @yucwang 2026

//! Built-in scenes, written in the flat 12-float record layout.

use crate::core::scene::{Scene, SceneError};

pub const PRESET_NAMES: &[&str] = &["cornell", "single-light"];

#[rustfmt::skip]
const CORNELL_SPHERES: [f32; 36] = [
    // center.xyz, radius | emission.xyz, 0 | albedo.rgb, material
    -1.3, -1.2, -1.3, 0.8,    0.0,   0.0,   0.0, 0.0,  0.999, 0.999, 0.999, 2.0, // mirror
     1.3, -1.2, -0.2, 0.8,    0.0,   0.0,   0.0, 0.0,  0.999, 0.999, 0.999, 3.0, // glass
     0.0,  1.6,  0.0, 0.2,  100.0, 100.0, 100.0, 0.0,  0.0,   0.0,   0.0,   1.0, // light
];

#[rustfmt::skip]
const CORNELL_PLANES: [f32; 72] = [
    // outward normal.xyz, offset | emission.xyz, 0 | albedo.rgb, material
    -1.0,  0.0,  0.0, 2.6,  0.0, 0.0, 0.0, 0.0,  0.85, 0.25, 0.25, 1.0, // left
     1.0,  0.0,  0.0, 2.6,  0.0, 0.0, 0.0, 0.0,  0.25, 0.35, 0.85, 1.0, // right
     0.0,  1.0,  0.0, 2.0,  0.0, 0.0, 0.0, 0.0,  0.75, 0.75, 0.75, 1.0, // top
     0.0, -1.0,  0.0, 2.0,  0.0, 0.0, 0.0, 0.0,  0.75, 0.75, 0.75, 1.0, // bottom
     0.0,  0.0, -1.0, 2.8,  0.0, 0.0, 0.0, 0.0,  0.85, 0.85, 0.25, 1.0, // back
     0.0,  0.0,  1.0, 7.9,  0.0, 0.0, 0.0, 0.0,  0.1,  0.7,  0.7,  1.0, // front
];

// One dim light five units in front of the default camera, nothing else.
#[rustfmt::skip]
const SINGLE_LIGHT_SPHERES: [f32; 12] = [
    0.0, 0.2205, 2.4091, 1.0,  0.5, 0.5, 0.5, 0.0,  0.0, 0.0, 0.0, 1.0,
];

/// Closed box of six walls with a mirror ball, a glass ball and a small
/// bright spherical light.
pub fn cornell_box() -> Result<Scene, SceneError> {
    Scene::from_raw_buffers(&CORNELL_SPHERES, &CORNELL_PLANES)
}

/// Open scene with a single emissive sphere facing the default camera.
pub fn single_light() -> Result<Scene, SceneError> {
    Scene::from_raw_buffers(&SINGLE_LIGHT_SPHERES, &[])
}

pub fn preset(name: &str) -> Option<Result<Scene, SceneError>> {
    match name {
        "cornell" => Some(cornell_box()),
        "single-light" => Some(single_light()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for name in PRESET_NAMES {
            let scene = preset(name).expect("known preset").expect("valid preset");
            assert!(!scene.is_empty());
            assert_eq!(scene.lights().len(), 1);
        }
        assert!(preset("teapot").is_none());
    }

    #[test]
    fn test_cornell_layout() {
        let scene = cornell_box().expect("valid preset");
        assert_eq!(scene.spheres().len(), 3);
        assert_eq!(scene.planes().len(), 6);
        assert_eq!(scene.lights(), &[2]);
    }
}
