// Copyright @yucwang 2023

pub mod dielectric;
pub mod lambertian_diffuse;
pub mod specular;

use crate::math::constants::Float;

/// How a surface continues a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialType {
    Diffuse,
    Specular,
    Refractive,
}

impl MaterialType {
    /// Decodes the float material code of the flat scene buffers, rounding
    /// to the nearest integer first.
    pub fn from_wire(code: Float) -> Option<Self> {
        if !code.is_finite() {
            return None;
        }
        match (code + 0.5).floor() as i64 {
            1 => Some(MaterialType::Diffuse),
            2 => Some(MaterialType::Specular),
            3 => Some(MaterialType::Refractive),
            _ => None,
        }
    }

    pub fn to_wire(self) -> Float {
        match self {
            MaterialType::Diffuse => 1.0,
            MaterialType::Specular => 2.0,
            MaterialType::Refractive => 3.0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "diffuse" => Some(MaterialType::Diffuse),
            "specular" | "mirror" => Some(MaterialType::Specular),
            "refractive" | "dielectric" | "glass" => Some(MaterialType::Refractive),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MaterialType;
    use crate::math::constants::Float;

    #[test]
    fn test_material_from_wire_rounds() {
        assert_eq!(MaterialType::from_wire(1.0), Some(MaterialType::Diffuse));
        assert_eq!(MaterialType::from_wire(1.49), Some(MaterialType::Diffuse));
        assert_eq!(MaterialType::from_wire(1.5), Some(MaterialType::Specular));
        assert_eq!(MaterialType::from_wire(2.9), Some(MaterialType::Refractive));
        assert_eq!(MaterialType::from_wire(0.0), None);
        assert_eq!(MaterialType::from_wire(3.6), None);
        assert_eq!(MaterialType::from_wire(Float::NAN), None);
    }

    #[test]
    fn test_material_names() {
        assert_eq!(MaterialType::from_name("Glass"), Some(MaterialType::Refractive));
        assert_eq!(MaterialType::from_name("mirror"), Some(MaterialType::Specular));
        assert_eq!(MaterialType::from_name("plastic"), None);
        assert_eq!(MaterialType::from_wire(MaterialType::Specular.to_wire()), Some(MaterialType::Specular));
    }
}
