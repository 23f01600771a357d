// Copyright @yucwang 2021

use crate::core::computation_node::ComputationNode;
use crate::core::integrator::Integrator;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::core::settings::RenderSettings;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, UInt, Vector2u, Vector4f};
use crate::math::spectrum::RGBSpectrum;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

pub use super::renderer::{RenderError, Renderer};

pub const GAMMA_EXPONENT: Float = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// `pass` is the index of the next pass to run, which is also the
    /// number of passes already accumulated.
    Running { pass: UInt },
    Finalized,
}

/// Read-only record every invocation of one pass sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassUniforms {
    pub width: UInt,
    pub height: UInt,
    pub pass_index: UInt,
    pub total_passes: UInt,
}

impl PassUniforms {
    pub fn is_final_pass(&self) -> bool {
        self.pass_index + 1 == self.total_passes
    }
}

type Block = (usize, usize, usize, usize, Vec<RGBSpectrum>);

/// Progressive accumulation controller. Each pass traces one sample per
/// pixel on a pool of scoped workers and adds `sample / total_passes` into
/// the pixel's cell. The pass with index `total_passes - 1` gamma-encodes
/// the buffer in place, after which no further pass is accepted.
pub struct ProgressiveRenderer {
    scene: Arc<Scene>,
    integrator: Box<dyn Integrator>,
    sensor: Box<dyn Sensor>,
    accumulator: Bitmap,
    state: RenderState,
    total_passes: UInt,
    threads: usize,
    block_size: usize,
}

impl ComputationNode for ProgressiveRenderer {
    fn describe(&self) -> String {
        format!("ProgressiveRenderer({}x{}, {} passes, {} threads, {}px blocks)",
                self.accumulator.width(), self.accumulator.height(),
                self.total_passes, self.threads, self.block_size)
    }
}

impl Renderer for ProgressiveRenderer {
    fn render(&mut self) -> Result<&Bitmap, RenderError> {
        self.run_passes(None, None)?;
        Ok(&self.accumulator)
    }
}

impl ProgressiveRenderer {
    /// Fails before any pass runs when the settings are unusable or no
    /// worker thread can be obtained.
    pub fn new(scene: Arc<Scene>,
               integrator: Box<dyn Integrator>,
               sensor: Box<dyn Sensor>,
               settings: &RenderSettings) -> Result<Self, RenderError> {
        let (width, height) = sensor.resolution();
        if width == 0 || height == 0 || width > UInt::MAX as usize || height > UInt::MAX as usize {
            return Err(RenderError::InvalidResolution { width, height });
        }
        if settings.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSampleCount);
        }
        if settings.block_size == 0 {
            return Err(RenderError::InvalidBlockSize);
        }
        let threads = resolve_thread_count(settings.threads)?;

        let renderer = Self {
            scene,
            integrator,
            sensor,
            accumulator: Bitmap::new(width, height),
            state: RenderState::Running { pass: 0 },
            total_passes: settings.samples_per_pixel,
            threads,
            block_size: settings.block_size,
        };
        log::info!("{}", renderer.describe());
        log::debug!("Sensor: {}", renderer.sensor.describe());
        log::debug!("Integrator max depth: {}", renderer.integrator.max_depth());
        Ok(renderer)
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn total_passes(&self) -> UInt {
        self.total_passes
    }

    pub fn completed_passes(&self) -> UInt {
        match self.state {
            RenderState::Running { pass } => pass,
            RenderState::Finalized => self.total_passes,
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn accumulator(&self) -> &Bitmap {
        &self.accumulator
    }

    /// Mean linear radiance per pixel of an un-finalized buffer.
    pub fn estimate(&self) -> Result<Vec<(Float, Float, Float)>, RenderError> {
        match self.state {
            RenderState::Finalized => Err(RenderError::AlreadyFinalized),
            RenderState::Running { pass: 0 } => Err(RenderError::NothingAccumulated),
            RenderState::Running { pass } => {
                let scale = self.total_passes as Float / pass as Float;
                Ok(self.accumulator.raw_copy(scale))
            }
        }
    }

    /// Runs exactly one pass. A pass either lands completely in the
    /// accumulator or not at all.
    pub fn run_pass(&mut self) -> Result<RenderState, RenderError> {
        let pass = match self.state {
            RenderState::Running { pass } => pass,
            RenderState::Finalized => return Err(RenderError::AlreadyFinalized),
        };

        let uniforms = PassUniforms {
            width: self.accumulator.width() as UInt,
            height: self.accumulator.height() as UInt,
            pass_index: pass,
            total_passes: self.total_passes,
        };

        // Workers are joined before dispatch returns: this is the barrier
        // between pass k and pass k + 1.
        let radiance = self.dispatch(uniforms)?;
        accumulate(&mut self.accumulator, &radiance, uniforms.total_passes);

        self.state = if uniforms.is_final_pass() {
            finalize(&mut self.accumulator);
            log::debug!("Pass {} finalized the accumulation buffer.", pass);
            RenderState::Finalized
        } else {
            log::debug!("Pass {}/{} accumulated.", pass + 1, self.total_passes);
            RenderState::Running { pass: pass + 1 }
        };
        Ok(self.state)
    }

    /// Runs at most `count` more passes. Fails with `AlreadyFinalized` once
    /// the last pass has run.
    pub fn render_passes(&mut self, count: UInt) -> Result<RenderState, RenderError> {
        self.run_passes(Some(count), None)
    }

    /// Runs until finalized or until `cancel` is observed at a pass
    /// boundary. A cancelled buffer stays valid, just not finalized.
    pub fn render_until(&mut self, cancel: &AtomicBool) -> Result<RenderState, RenderError> {
        self.run_passes(None, Some(cancel))
    }

    fn run_passes(&mut self, limit: Option<UInt>, cancel: Option<&AtomicBool>) -> Result<RenderState, RenderError> {
        if self.state == RenderState::Finalized {
            return Err(RenderError::AlreadyFinalized);
        }
        let remaining = self.total_passes - self.completed_passes();
        let planned = limit.map_or(remaining, |l| l.min(remaining));
        if planned == 0 {
            return Ok(self.state);
        }

        let progress = ProgressBar::new(planned as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} passes")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        for _ in 0..planned {
            if cancel.map_or(false, |c| c.load(Ordering::Relaxed)) {
                log::info!("Rendering cancelled after {} passes.", self.completed_passes());
                break;
            }
            self.run_pass()?;
            progress.inc(1);
        }
        progress.finish_and_clear();

        if self.state == RenderState::Finalized {
            log::info!("Rendering finished: {} passes.", self.total_passes);
        }
        Ok(self.state)
    }

    fn dispatch(&self, uniforms: PassUniforms) -> Result<Vec<RGBSpectrum>, RenderError> {
        let width = uniforms.width as usize;
        let height = uniforms.height as usize;
        let block_size = self.block_size;
        let blocks_x = (width + block_size - 1) / block_size;
        let blocks_y = (height + block_size - 1) / block_size;
        let total_blocks = blocks_x * blocks_y;

        let scene_ref: &Scene = &self.scene;
        let sensor_ref: &dyn Sensor = self.sensor.as_ref();
        let integrator_ref: &dyn Integrator = self.integrator.as_ref();

        let next_block = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<Block>();
        let mut output = vec![RGBSpectrum::default(); width * height];
        let mut completed = 0usize;
        let mut spawn_error: Option<std::io::Error> = None;

        let spawned = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.threads);
            for worker in 0..self.threads.min(total_blocks) {
                let next_block = &next_block;
                let tx = tx.clone();
                let handle = thread::Builder::new()
                    .name(format!("pocketpt-worker-{}", worker))
                    .spawn_scoped(scope, move || {
                        loop {
                            let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                            if block_index >= total_blocks {
                                break;
                            }

                            let bx = block_index % blocks_x;
                            let by = block_index / blocks_x;
                            let x0 = bx * block_size;
                            let y0 = by * block_size;
                            let x1 = (x0 + block_size).min(width);
                            let y1 = (y0 + block_size).min(height);

                            let mut block = Vec::with_capacity((x1 - x0) * (y1 - y0));
                            for y in y0..y1 {
                                for x in x0..x1 {
                                    let pixel = Vector2u::new(x as UInt, y as UInt);
                                    block.push(integrator_ref.trace_ray_forward(
                                        scene_ref, sensor_ref, pixel, uniforms.pass_index));
                                }
                            }
                            if tx.send((x0, y0, x1, y1, block)).is_err() {
                                break;
                            }
                        }
                    });
                match handle {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        log::error!("Failed to spawn worker {}: {}", worker, e);
                        spawn_error = Some(e);
                        break;
                    }
                }
            }

            let spawned = handles.len();
            drop(tx);
            for (x0, y0, x1, y1, block) in rx.iter() {
                for y in y0..y1 {
                    for x in x0..x1 {
                        output[x + width * y] = block[(x - x0) + (x1 - x0) * (y - y0)];
                    }
                }
                completed += 1;
            }

            // Joined here so a panicking worker surfaces as an incomplete
            // pass instead of unwinding through the scope.
            for handle in handles {
                if handle.join().is_err() {
                    log::error!("A worker panicked during pass {}.", uniforms.pass_index);
                }
            }
            spawned
        });

        if spawned == 0 {
            let reason = spawn_error.map_or_else(|| String::from("no worker spawned"), |e| e.to_string());
            return Err(RenderError::BackendUnavailable(reason));
        }
        if completed != total_blocks {
            return Err(RenderError::IncompletePass {
                pass: uniforms.pass_index,
                completed,
                expected: total_blocks,
            });
        }
        Ok(output)
    }
}

fn resolve_thread_count(requested: Option<usize>) -> Result<usize, RenderError> {
    match requested {
        Some(0) => Err(RenderError::BackendUnavailable(String::from("zero worker threads requested"))),
        Some(n) => Ok(n),
        None => thread::available_parallelism()
            .map(|n| n.get())
            .map_err(|e| RenderError::BackendUnavailable(e.to_string())),
    }
}

fn accumulate(accumulator: &mut Bitmap, radiance: &[RGBSpectrum], total_passes: UInt) {
    let inv_total = 1.0 / total_passes as Float;
    for (cell, sample) in accumulator.cells_mut().iter_mut().zip(radiance) {
        cell.x += sample[0] * inv_total;
        cell.y += sample[1] * inv_total;
        cell.z += sample[2] * inv_total;
    }
}

fn finalize(accumulator: &mut Bitmap) {
    for cell in accumulator.cells_mut() {
        finalize_cell(cell);
    }
}

/// Clamps to [0, 1], gamma-encodes, scales to [0, 255] and rounds the three
/// radiance channels. Not idempotent: apply once.
pub fn finalize_cell(cell: &mut Vector4f) {
    for c in 0..3 {
        cell[c] = (cell[c].clamp(0.0, 1.0).powf(GAMMA_EXPONENT) * 255.0 + 0.5).floor();
    }
}
