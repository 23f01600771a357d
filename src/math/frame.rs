// Copyright @yucwang 2023

use crate::math::constants::Vector3f;

/// Orthonormal basis; `z` is the axis everything is sampled around.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub x: Vector3f,
    pub y: Vector3f,
    pub z: Vector3f
}

impl Default for Frame {
    fn default() -> Frame {
        Frame {
            x: Vector3f::new(1.0, 0.0, 0.0),
            y: Vector3f::new(0.0, 1.0, 0.0),
            z: Vector3f::new(0.0, 0.0, 1.0)
        }
    }
}

impl Frame {
    /// Builds a frame around a unit vector. The helper axis switches away
    /// from x when `z` is close to it.
    pub fn from_z(new_z: Vector3f) -> Frame {
        let helper = if new_z.x.abs() > 0.1 {
            Vector3f::new(0.0, 1.0, 0.0)
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let new_x = helper.cross(&new_z).normalize();
        let new_y = new_z.cross(&new_x);

        Frame {
            x: new_x,
            y: new_y,
            z: new_z
        }
    }

    pub fn to_local(&self, v: Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.x), v.dot(&self.y), v.dot(&self.z))
    }

    pub fn from_local(&self, v: Vector3f) -> Vector3f {
        v.x * self.x + v.y * self.y + v.z * self.z
    }
}
