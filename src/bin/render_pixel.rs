use pocketpt::core::integrator::Integrator;
use pocketpt::core::scene::Scene;
use pocketpt::core::scene_loader::{load_scene_with_settings, CameraPlacement};
use pocketpt::core::settings::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use pocketpt::core::sensor::Sensor;
use pocketpt::integrators::path::{PathIntegrator, DEFAULT_MAX_DEPTH};
use pocketpt::math::constants::{Float, UInt, Vector2u, Vector3f};
use pocketpt::scenes;
use pocketpt::sensors::pinhole::PinholeCamera;
use std::env;

fn parse_pixel(x: &str, y: &str) -> Option<(usize, usize)> {
    Some((x.parse().ok()?, y.parse().ok()?))
}

fn load_scene_arg(scene_arg: &str) -> Result<(Scene, Option<CameraPlacement>), String> {
    match scenes::preset(scene_arg) {
        Some(Ok(scene)) => Ok((scene, None)),
        Some(Err(e)) => Err(format!("Invalid preset '{}': {}", scene_arg, e)),
        None => load_scene_with_settings(scene_arg)
            .map(|load_result| (load_result.scene, load_result.camera))
            .map_err(|e| format!("Failed to load scene: {}", e)),
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <scene.xml|preset> <x> <y> [--spp N] [--max-depth N] [--width N] [--height N]", args[0]);
        std::process::exit(1);
    }

    let scene_arg = &args[1];
    let (x, y) = match parse_pixel(&args[2], &args[3]) {
        Some(pixel) => pixel,
        None => {
            eprintln!("Invalid pixel coordinates: ({}, {})", args[2], args[3]);
            std::process::exit(1);
        }
    };

    let mut spp: UInt = 64;
    let mut max_depth: UInt = DEFAULT_MAX_DEPTH;
    let mut width: usize = DEFAULT_WIDTH;
    let mut height: usize = DEFAULT_HEIGHT;

    let mut i = 4;
    while i < args.len() {
        match args[i].as_str() {
            "--spp" => {
                i += 1;
                spp = args.get(i).and_then(|v| v.parse::<UInt>().ok()).unwrap_or(spp);
            }
            "--max-depth" => {
                i += 1;
                max_depth = args.get(i).and_then(|v| v.parse::<UInt>().ok()).unwrap_or(max_depth);
            }
            "--width" => {
                i += 1;
                width = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(width);
            }
            "--height" => {
                i += 1;
                height = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(height);
            }
            _ => {}
        }
        i += 1;
    }

    let (scene, placement) = match load_scene_arg(scene_arg) {
        Ok(loaded) => loaded,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };

    let sensor = match placement {
        Some(placement) => placement.build(width, height),
        None => PinholeCamera::cornell(width, height),
    };
    if x >= width || y >= height {
        eprintln!("Pixel out of bounds: ({}, {}) for size {}x{}", x, y, width, height);
        std::process::exit(2);
    }

    let integrator = PathIntegrator::new(max_depth);
    let pixel = Vector2u::new(x as UInt, y as UInt);

    // Same per-pass samples the progressive renderer would draw for this pixel.
    let mut accum = Vector3f::zeros();
    for pass in 0..spp {
        let rgb = integrator.trace_ray_forward(&scene, &sensor as &dyn Sensor, pixel, pass);
        accum += rgb.to_vec();
    }

    let inv_spp = 1.0 / (spp.max(1) as Float);
    let avg = accum * inv_spp;
    println!(
        "pixel ({}, {}) spp={} depth={} -> R {:.6}, G {:.6}, B {:.6}",
        x, y, spp, integrator.max_depth(), avg.x, avg.y, avg.z
    );
}
