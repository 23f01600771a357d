// Copyright @yucwang 2023

pub mod plane;
pub mod sphere;
