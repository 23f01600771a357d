// Copyright 2020 TwoCookingMice

use pocketpt::core::scene::{Scene, SceneError};
use pocketpt::core::scene_loader::{load_scene_with_settings, CameraPlacement, SceneLoadError};
use pocketpt::core::settings::RenderSettings;
use pocketpt::integrators::path::PathIntegrator;
use pocketpt::io::{exr_utils, image_utils};
use pocketpt::math::constants::UInt;
use pocketpt::renderers::progressive::{ProgressiveRenderer, RenderError, RenderState, Renderer};
use pocketpt::scenes;
use pocketpt::sensors::pinhole::PinholeCamera;

use std::env;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    SceneLoad(#[from] SceneLoadError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

struct CliOptions {
    scene: String,
    output: String,
    width: Option<usize>,
    height: Option<usize>,
    spp: Option<UInt>,
    max_depth: Option<UInt>,
    threads: Option<usize>,
    passes: Option<UInt>,
    exr: Option<String>,
}

fn usage(program: &str) -> String {
    format!("Usage: {} <scene.xml|{}> <output.png> [--width N] [--height N] [--spp N] [--max-depth N] \
             [--threads N] [--passes N] [--exr path]",
            program, scenes::PRESET_NAMES.join("|"))
}

fn parse_flag<T: std::str::FromStr>(args: &[String], i: usize) -> Result<T, CliError> {
    let flag = &args[i - 1];
    args.get(i)
        .and_then(|v| v.parse::<T>().ok())
        .ok_or_else(|| CliError::Usage(format!("{} expects a number", flag)))
}

fn parse_args(args: &[String]) -> Result<CliOptions, CliError> {
    let program = args.first().map(|s| s.as_str()).unwrap_or("pocketpt");
    if args.len() < 3 {
        return Err(CliError::Usage(usage(program)));
    }

    let mut options = CliOptions {
        scene: args[1].clone(),
        output: args[2].clone(),
        width: None,
        height: None,
        spp: None,
        max_depth: None,
        threads: None,
        passes: None,
        exr: None,
    };

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                i += 1;
                options.width = Some(parse_flag(args, i)?);
            }
            "--height" => {
                i += 1;
                options.height = Some(parse_flag(args, i)?);
            }
            "--spp" => {
                i += 1;
                options.spp = Some(parse_flag(args, i)?);
            }
            "--max-depth" => {
                i += 1;
                options.max_depth = Some(parse_flag(args, i)?);
            }
            "--threads" => {
                i += 1;
                options.threads = Some(parse_flag(args, i)?);
            }
            "--passes" => {
                i += 1;
                options.passes = Some(parse_flag(args, i)?);
            }
            "--exr" => {
                i += 1;
                options.exr = Some(args.get(i)
                    .cloned()
                    .ok_or_else(|| CliError::Usage(String::from("--exr expects a path")))?);
            }
            other => {
                log::warn!("Ignoring unknown argument '{}'.", other);
            }
        }
        i += 1;
    }
    Ok(options)
}

fn run(options: CliOptions) -> Result<(), CliError> {
    let mut settings = RenderSettings::default();
    let mut placement: Option<CameraPlacement> = None;

    let scene: Scene = match scenes::preset(&options.scene) {
        Some(scene) => scene?,
        None => {
            let load_result = load_scene_with_settings(&options.scene)?;
            settings.width = load_result.width.unwrap_or(settings.width);
            settings.height = load_result.height.unwrap_or(settings.height);
            settings.samples_per_pixel = load_result.samples_per_pixel.unwrap_or(settings.samples_per_pixel);
            settings.max_depth = load_result.max_depth.unwrap_or(settings.max_depth);
            placement = load_result.camera;
            load_result.scene
        }
    };

    settings.width = options.width.unwrap_or(settings.width);
    settings.height = options.height.unwrap_or(settings.height);
    settings.samples_per_pixel = options.spp.unwrap_or(settings.samples_per_pixel);
    settings.max_depth = options.max_depth.unwrap_or(settings.max_depth);
    settings.threads = options.threads.or(settings.threads);

    let sensor = match placement {
        Some(placement) => placement.build(settings.width, settings.height),
        None => PinholeCamera::cornell(settings.width, settings.height),
    };
    let integrator = PathIntegrator::new(settings.max_depth).with_rr_depth(settings.rr_depth);

    log::info!("Rendering '{}' at {}x{}, {} spp, max depth {}.",
               options.scene, settings.width, settings.height, settings.samples_per_pixel, settings.max_depth);
    let mut renderer = ProgressiveRenderer::new(Arc::new(scene),
                                                Box::new(integrator),
                                                Box::new(sensor),
                                                &settings)?;
    log::info!("Using {} worker threads.", renderer.threads());

    match options.passes {
        Some(passes) => {
            renderer.render_passes(passes)?;
        }
        None => {
            renderer.render()?;
        }
    }

    if let Some(exr_path) = options.exr.as_deref() {
        match renderer.estimate() {
            Ok(estimate) => {
                let image = renderer.accumulator();
                exr_utils::write_exr_to_file(&estimate, image.width(), image.height(), exr_path)?;
            }
            Err(RenderError::AlreadyFinalized) => {
                log::warn!("Buffer already finalized, no linear estimate for {}.", exr_path);
            }
            Err(e) => return Err(e.into()),
        }
    }

    match renderer.state() {
        RenderState::Finalized => {
            image_utils::write_png(renderer.accumulator(), renderer.state(), &options.output)?;
        }
        RenderState::Running { pass } => {
            log::warn!("Stopped after {} of {} passes, {} not written.",
                       pass, renderer.total_passes(), options.output);
        }
    }
    Ok(())
}

fn main() {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let result = parse_args(&args).and_then(run);
    if let Err(e) = result {
        eprintln!("{}", e);
        let code = match e {
            CliError::Usage(_) => 1,
            _ => 2,
        };
        std::process::exit(code);
    }
}
