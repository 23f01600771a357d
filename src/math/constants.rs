/* Copyright 2020 @Yuchen Wong */

use nalgebra as na;

pub type Float = f32;
pub type UInt = u32;

pub type Vector2f = na::Vector2<Float>;
pub type Vector3f = na::Vector3<Float>;
pub type Vector4f = na::Vector4<Float>;
pub type Vector2u = na::Vector2<UInt>;
pub type Vector3u = na::Vector3<UInt>;

pub const EPSILON: Float = 1e-4;
pub const INFINITY: Float = 1e20;
pub const PI: Float = 3.14159265359;
pub const INV_PI: Float = 0.31830988618;
