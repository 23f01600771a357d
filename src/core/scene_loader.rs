// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use crate::core::scene::{Scene, SceneError, FLOATS_PER_RECORD};
use crate::materials::MaterialType;
use crate::math::constants::{Float, UInt, Vector3f};
use crate::sensors::pinhole::{PinholeCamera, DEFAULT_LENS_DISTANCE, DEFAULT_SENSOR_WIDTH};

#[derive(Debug, Error)]
pub enum SceneLoadError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene: {0}")]
    Parse(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// Camera placement read from a `<sensor>` block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    pub origin: Vector3f,
    pub target: Vector3f,
    pub sensor_width: Float,
    pub lens_distance: Float,
}

impl CameraPlacement {
    pub fn build(&self, width: usize, height: usize) -> PinholeCamera {
        PinholeCamera::new(self.origin,
                           self.target - self.origin,
                           self.sensor_width,
                           self.lens_distance,
                           width,
                           height)
    }
}

pub struct SceneLoadResult {
    pub scene: Scene,
    pub camera: Option<CameraPlacement>,
    pub samples_per_pixel: Option<UInt>,
    pub max_depth: Option<UInt>,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

pub fn load_scene_with_settings<P: AsRef<Path>>(path: P) -> Result<SceneLoadResult, SceneLoadError> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path)?;
    log::info!("Loading scene from {}.", path.display());
    parse_scene(&xml)
}

#[derive(Clone, Copy, PartialEq)]
enum ShapeKind {
    Sphere,
    Plane,
}

impl ShapeKind {
    fn name(&self) -> &'static str {
        match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Plane => "plane",
        }
    }
}

/// Typed properties of the shape being parsed.
struct PendingShape {
    kind: ShapeKind,
    data: Option<Vec<Float>>,
    position: Option<Vector3f>,
    scalar: Option<Float>,
    emission: Vector3f,
    albedo: Option<Vector3f>,
    material: MaterialType,
}

impl PendingShape {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            data: None,
            position: None,
            scalar: None,
            emission: Vector3f::zeros(),
            albedo: None,
            material: MaterialType::Diffuse,
        }
    }

    fn into_record(self) -> Result<Vec<Float>, SceneLoadError> {
        if let Some(data) = self.data {
            if data.len() != FLOATS_PER_RECORD {
                return Err(SceneLoadError::Parse(format!("{} data has {} floats, expected {}",
                                                         self.kind.name(), data.len(), FLOATS_PER_RECORD)));
            }
            return Ok(data);
        }

        let (position, scalar) = match self.kind {
            ShapeKind::Sphere => (
                self.position.ok_or(SceneLoadError::MissingField("sphere.center"))?,
                self.scalar.ok_or(SceneLoadError::MissingField("sphere.radius"))?,
            ),
            ShapeKind::Plane => (
                self.position.ok_or(SceneLoadError::MissingField("plane.normal"))?,
                self.scalar.ok_or(SceneLoadError::MissingField("plane.offset"))?,
            ),
        };
        let albedo = self.albedo.ok_or(SceneLoadError::MissingField("shape.albedo"))?;

        Ok(vec![
            position.x, position.y, position.z, scalar,
            self.emission.x, self.emission.y, self.emission.z, 0.0,
            albedo.x, albedo.y, albedo.z, self.material.to_wire(),
        ])
    }
}

fn parse_scene(xml: &str) -> Result<SceneLoadResult, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut defaults: HashMap<String, String> = HashMap::new();

    let mut in_sensor = false;
    let mut in_film = false;
    let mut in_integrator = false;

    let mut origin: Option<Vector3f> = None;
    let mut target: Option<Vector3f> = None;
    let mut sensor_width: Float = DEFAULT_SENSOR_WIDTH;
    let mut lens_distance: Float = DEFAULT_LENS_DISTANCE;
    let mut width: Option<usize> = None;
    let mut height: Option<usize> = None;
    let mut max_depth: Option<UInt> = None;
    let mut spp: Option<UInt> = None;

    let mut current_shape: Option<PendingShape> = None;
    let mut sphere_buffer: Vec<Float> = Vec::new();
    let mut plane_buffer: Vec<Float> = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf)
            .map_err(|e| SceneLoadError::Parse(e.to_string()))?;
        let is_empty = matches!(event, Event::Empty(_));
        match event {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) => {
                let mut attrs: HashMap<Vec<u8>, String> = HashMap::new();
                for attr in e.attributes().flatten() {
                    attrs.insert(attr.key.as_ref().to_vec(), attribute_value(&attr, &defaults)?);
                }
                let name_attr = attrs.get(b"name".as_slice()).cloned();
                let value_attr = attrs.get(b"value".as_slice()).cloned();

                match e.name().as_ref() {
                    b"default" => {
                        // Values may refer to earlier defaults.
                        if let (Some(k), Some(v)) = (name_attr, value_attr) {
                            defaults.insert(k, v);
                        }
                    }
                    b"integrator" => {
                        if let Some(kind) = attrs.get(b"type".as_slice()) {
                            if kind != "path" {
                                return Err(SceneLoadError::Parse(format!("unsupported integrator: {}", kind)));
                            }
                        }
                        in_integrator = !is_empty;
                    }
                    b"sensor" => {
                        if let Some(kind) = attrs.get(b"type".as_slice()) {
                            if kind != "pinhole" && kind != "perspective" {
                                return Err(SceneLoadError::Parse(format!("unsupported sensor: {}", kind)));
                            }
                        }
                        in_sensor = !is_empty;
                    }
                    b"film" => {
                        in_film = in_sensor && !is_empty;
                    }
                    b"lookat" => {
                        if in_sensor {
                            origin = Some(parse_vec3(attrs.get(b"origin".as_slice())
                                .ok_or(SceneLoadError::MissingField("lookat.origin"))?)?);
                            target = Some(parse_vec3(attrs.get(b"target".as_slice())
                                .ok_or(SceneLoadError::MissingField("lookat.target"))?)?);
                        }
                    }
                    b"shape" => {
                        let kind = match attrs.get(b"type".as_slice()).map(|s| s.as_str()) {
                            Some("sphere") => ShapeKind::Sphere,
                            Some("plane") => ShapeKind::Plane,
                            Some(other) => return Err(SceneLoadError::Parse(format!("unsupported shape: {}", other))),
                            None => return Err(SceneLoadError::MissingField("shape.type")),
                        };
                        let mut shape = PendingShape::new(kind);
                        if let Some(data) = attrs.get(b"data".as_slice()) {
                            shape.data = Some(parse_float_list(data)?);
                        }
                        if is_empty {
                            push_shape(shape, &mut sphere_buffer, &mut plane_buffer)?;
                        } else {
                            current_shape = Some(shape);
                        }
                    }
                    b"integer" => {
                        let (name, value) = named_value(name_attr, value_attr, "integer")?;
                        if in_integrator && name == "max_depth" {
                            max_depth = Some(parse_u32(&value)?);
                        } else if in_sensor && (name == "sample_count" || name == "spp") {
                            spp = Some(parse_u32(&value)?);
                        } else if in_film && name == "width" {
                            width = Some(parse_usize(&value)?);
                        } else if in_film && name == "height" {
                            height = Some(parse_usize(&value)?);
                        }
                    }
                    b"float" => {
                        let (name, value) = named_value(name_attr, value_attr, "float")?;
                        if let Some(shape) = current_shape.as_mut() {
                            match (shape.kind, name.as_str()) {
                                (ShapeKind::Sphere, "radius") | (ShapeKind::Plane, "offset") => {
                                    shape.scalar = Some(parse_float(&value)?);
                                }
                                _ => {}
                            }
                        } else if in_sensor {
                            match name.as_str() {
                                "sensor_width" => sensor_width = parse_float(&value)?,
                                "lens_distance" => lens_distance = parse_float(&value)?,
                                _ => {}
                            }
                        }
                    }
                    b"point" | b"vector" => {
                        let (name, value) = named_value(name_attr, value_attr, "vector")?;
                        if let Some(shape) = current_shape.as_mut() {
                            match (shape.kind, name.as_str()) {
                                (ShapeKind::Sphere, "center") | (ShapeKind::Plane, "normal") => {
                                    shape.position = Some(parse_vec3(&value)?);
                                }
                                _ => {}
                            }
                        }
                    }
                    b"rgb" => {
                        let (name, value) = named_value(name_attr, value_attr, "rgb")?;
                        if let Some(shape) = current_shape.as_mut() {
                            match name.as_str() {
                                "emission" | "radiance" => shape.emission = parse_vec3(&value)?,
                                "albedo" | "reflectance" => shape.albedo = Some(parse_vec3(&value)?),
                                _ => {}
                            }
                        }
                    }
                    b"string" => {
                        let (name, value) = named_value(name_attr, value_attr, "string")?;
                        if let Some(shape) = current_shape.as_mut() {
                            if name == "material" {
                                shape.material = MaterialType::from_name(&value)
                                    .ok_or_else(|| SceneLoadError::Parse(format!("unknown material: {}", value)))?;
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::End(e) => {
                match e.name().as_ref() {
                    b"integrator" => in_integrator = false,
                    b"sensor" => {
                        in_sensor = false;
                        in_film = false;
                    }
                    b"film" => in_film = false,
                    b"shape" => {
                        if let Some(shape) = current_shape.take() {
                            push_shape(shape, &mut sphere_buffer, &mut plane_buffer)?;
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        buf.clear();
    }

    let scene = Scene::from_raw_buffers(&sphere_buffer, &plane_buffer)?;

    let camera = match (origin, target) {
        (Some(origin), Some(target)) => Some(CameraPlacement { origin, target, sensor_width, lens_distance }),
        _ => None,
    };

    Ok(SceneLoadResult {
        scene,
        camera,
        samples_per_pixel: spp,
        max_depth,
        width,
        height,
    })
}

fn push_shape(shape: PendingShape,
              spheres: &mut Vec<Float>,
              planes: &mut Vec<Float>) -> Result<(), SceneLoadError> {
    let kind = shape.kind;
    let record = shape.into_record()?;
    match kind {
        ShapeKind::Sphere => spheres.extend(record),
        ShapeKind::Plane => planes.extend(record),
    }
    Ok(())
}

fn attribute_value(attr: &Attribute, defaults: &HashMap<String, String>) -> Result<String, SceneLoadError> {
    let raw = attr.unescape_value().map_err(|e| SceneLoadError::Parse(e.to_string()))?;
    Ok(resolve_value(&raw, defaults))
}

fn named_value(name: Option<String>,
               value: Option<String>,
               field: &'static str) -> Result<(String, String), SceneLoadError> {
    match (name, value) {
        (Some(name), Some(value)) => Ok((name, value)),
        (None, _) => Err(SceneLoadError::MissingField(field)),
        (Some(name), None) => Err(SceneLoadError::Parse(format!("{} '{}' has no value", field, name))),
    }
}

fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = raw.to_string();
    // Longest names first so `$spp_max` is not clobbered by `$spp`.
    let mut keys: Vec<&String> = defaults.keys().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()));
    for k in keys {
        out = out.replace(&format!("${}", k), &defaults[k]);
    }
    out
}

fn parse_float(value: &str) -> Result<Float, SceneLoadError> {
    value.trim().parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_u32(value: &str) -> Result<UInt, SceneLoadError> {
    value.trim().parse::<UInt>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_usize(value: &str) -> Result<usize, SceneLoadError> {
    value.trim().parse::<usize>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_float_list(value: &str) -> Result<Vec<Float>, SceneLoadError> {
    value.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_float)
        .collect()
}

fn parse_vec3(value: &str) -> Result<Vector3f, SceneLoadError> {
    let parts = parse_float_list(value)?;
    if parts.len() != 3 {
        return Err(SceneLoadError::Parse(format!("invalid vec3: {}", value)));
    }
    Ok(Vector3f::new(parts[0], parts[1], parts[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sensor::Sensor;
    use crate::core::shape::Shape;

    const BOX_SCENE: &str = r#"
        <scene version="0.1">
            <default name="spp" value="32"/>
            <default name="res" value="64"/>
            <integrator type="path">
                <integer name="max_depth" value="8"/>
            </integrator>
            <sensor type="pinhole">
                <transform name="to_world">
                    <lookat origin="0, 0.52, 7.4" target="0, 0.46, 6.4" up="0, 1, 0"/>
                </transform>
                <sampler type="independent">
                    <integer name="sample_count" value="$spp"/>
                </sampler>
                <film type="png">
                    <integer name="width" value="$res"/>
                    <integer name="height" value="48"/>
                </film>
            </sensor>
            <shape type="sphere">
                <point name="center" value="0, 1.6, 0"/>
                <float name="radius" value="0.2"/>
                <rgb name="emission" value="100, 100, 100"/>
                <rgb name="albedo" value="0, 0, 0"/>
            </shape>
            <shape type="sphere">
                <point name="center" value="1.3, -1.2, -0.2"/>
                <float name="radius" value="0.8"/>
                <rgb name="albedo" value="0.999, 0.999, 0.999"/>
                <string name="material" value="glass"/>
            </shape>
            <shape type="plane" data="0 1 0 2  0 0 0 0  0.75 0.75 0.75 1"/>
            <shape type="plane">
                <vector name="normal" value="0, 0, -2"/>
                <float name="offset" value="5.6"/>
                <rgb name="reflectance" value="0.85, 0.85, 0.25"/>
            </shape>
        </scene>
    "#;

    #[test]
    fn test_parse_box_scene() {
        let result = parse_scene(BOX_SCENE).expect("valid scene");
        assert_eq!(result.samples_per_pixel, Some(32));
        assert_eq!(result.max_depth, Some(8));
        assert_eq!(result.width, Some(64));
        assert_eq!(result.height, Some(48));

        let scene = &result.scene;
        assert_eq!(scene.spheres().len(), 2);
        assert_eq!(scene.planes().len(), 2);
        assert_eq!(scene.lights(), &[0]);
        assert_eq!(scene.spheres()[1].surface().material, MaterialType::Refractive);

        // The typed plane had a non-unit normal and gets normalized.
        let back = &scene.planes()[1];
        assert!((back.normal() - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-6);
        assert!((back.offset() - 2.8).abs() < 1e-5);
    }

    #[test]
    fn test_camera_placement() {
        let result = parse_scene(BOX_SCENE).expect("valid scene");
        let placement = result.camera.expect("camera placement");
        assert_eq!(placement.sensor_width, DEFAULT_SENSOR_WIDTH);
        let camera = placement.build(64, 48);
        assert_eq!(camera.resolution(), (64, 48));
        assert!((camera.origin() - Vector3f::new(0.0, 0.52, 7.4)).norm() < 1e-6);
        let expected = Vector3f::new(0.0, -0.06, -1.0).normalize();
        assert!((camera.direction() - expected).norm() < 1e-5);
    }

    #[test]
    fn test_missing_and_bad_fields() {
        let no_radius = r#"<scene><shape type="sphere">
            <point name="center" value="0,0,0"/><rgb name="albedo" value="1,1,1"/>
        </shape></scene>"#;
        assert!(matches!(parse_scene(no_radius), Err(SceneLoadError::MissingField("sphere.radius"))));

        let short_data = r#"<scene><shape type="plane" data="0 1 0 2"/></scene>"#;
        assert!(matches!(parse_scene(short_data), Err(SceneLoadError::Parse(_))));

        let bad_material = r#"<scene><shape type="sphere" data="0 0 0 1 0 0 0 0 1 1 1 7"/></scene>"#;
        assert!(matches!(parse_scene(bad_material),
                         Err(SceneLoadError::Scene(SceneError::InvalidMaterial { .. }))));

        let cube = r#"<scene><shape type="cube"/></scene>"#;
        assert!(matches!(parse_scene(cube), Err(SceneLoadError::Parse(_))));
    }

    #[test]
    fn test_resolve_value() {
        let mut defaults = HashMap::new();
        defaults.insert("spp".to_string(), "4".to_string());
        defaults.insert("spp_max".to_string(), "9".to_string());
        assert_eq!(resolve_value("$spp", &defaults), "4");
        assert_eq!(resolve_value("$spp_max", &defaults), "9");
        assert_eq!(resolve_value("plain", &defaults), "plain");
    }
}
