//! Progressive rendering into a shared frame.
//!
//! Workers repeat jittered sweeps over the image forever, splatting every
//! path sample bilinearly into the [`Frame`]. Nothing waits for a sweep to
//! finish: the display reads whatever has accumulated so far.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use pathspace_core::RenderSettings;
use pathspace_math::{Float, Vec2f};
use rayon::prelude::*;

use crate::{Camera, Frame, Integrator, Sampler, Scene};

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a display pixel to 8-bit RGBA.
pub fn color_to_rgba(rgb: [f32; 3]) -> [u8; 4] {
    let [r, g, b] = rgb.map(|c| (255.0 * clamp_01(linear_to_gamma(c))) as u8);
    [r, g, b, 255]
}

/// Trace one row of a jittered sweep and splat the results.
fn render_row(
    integrator: &Integrator<'_>,
    camera: &Camera,
    frame: &Frame,
    sampler: &mut Sampler,
    samples_axis: u32,
    row: u32,
) {
    let inv = 1.0 / samples_axis as Float;
    for col in 0..samples_axis {
        let jitter = sampler.unit2d();
        let uv = Vec2f::new(
            (col as Float + jitter.x) * inv,
            (row as Float + jitter.y) * inv,
        );
        let color = integrator.pathtrace(camera.ray(uv), sampler);
        frame.add_bilinear(uv, color);
    }
}

/// Trace one full sweep of `samples_axis²` jittered samples.
///
/// Checks `stop` before every row. Returns `false` if the sweep was cut
/// short.
pub fn render_sweep(
    scene: &Scene,
    camera: &Camera,
    frame: &Frame,
    sampler: &mut Sampler,
    samples_axis: u32,
    max_bounces: u32,
    stop: &AtomicBool,
) -> bool {
    let integrator = Integrator::new(scene).with_max_bounces(max_bounces);
    for row in 0..samples_axis {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        render_row(&integrator, camera, frame, sampler, samples_axis, row);
    }
    true
}

/// Render `passes` full sweeps with rayon, one task per sweep row.
///
/// Each row gets its own sampler seeded from `seed`, so the set of samples
/// does not depend on scheduling. With a strict frame the result matches a
/// serial render up to summation order.
pub fn render_passes(
    scene: &Scene,
    camera: &Camera,
    frame: &Frame,
    samples_axis: u32,
    max_bounces: u32,
    passes: u32,
    seed: u64,
) {
    let integrator = Integrator::new(scene).with_max_bounces(max_bounces);

    for pass in 0..passes {
        (0..samples_axis).into_par_iter().for_each(|row| {
            let row_seed = seed
                .wrapping_add(pass as u64 * samples_axis as u64)
                .wrapping_add(row as u64);
            let mut sampler = Sampler::new(row_seed);
            render_row(&integrator, camera, frame, &mut sampler, samples_axis, row);
        });
        log::debug!("Pass {}/{} done", pass + 1, passes);
    }
}

/// A pool of worker threads sweeping the scene until stopped.
pub struct ProgressiveRender {
    stop: Arc<AtomicBool>,
    sweeps: Arc<AtomicU64>,
    workers: Vec<JoinHandle<()>>,
}

impl ProgressiveRender {
    /// Spawn `settings.worker_count` named worker threads.
    ///
    /// With a seed, worker `i` uses `seed + i`; otherwise each worker seeds
    /// from entropy.
    pub fn start(
        scene: Arc<Scene>,
        camera: Camera,
        frame: Arc<Frame>,
        settings: &RenderSettings,
    ) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let sweeps = Arc::new(AtomicU64::new(0));
        let camera = Arc::new(camera);
        let samples_axis = settings.samples_per_sweep_axis;
        let max_bounces = settings.max_bounces;

        let mut render = Self {
            stop,
            sweeps,
            workers: Vec::with_capacity(settings.worker_count),
        };

        for index in 0..settings.worker_count {
            let mut sampler = match settings.seed {
                Some(seed) => Sampler::new(seed.wrapping_add(index as u64)),
                None => Sampler::from_entropy(),
            };
            let scene = Arc::clone(&scene);
            let camera = Arc::clone(&camera);
            let frame = Arc::clone(&frame);
            let stop = Arc::clone(&render.stop);
            let sweeps = Arc::clone(&render.sweeps);

            let spawned = thread::Builder::new()
                .name(format!("render-{}", index))
                .spawn(move || {
                    while !stop.load(Ordering::Relaxed) {
                        if render_sweep(
                            &scene,
                            &camera,
                            &frame,
                            &mut sampler,
                            samples_axis,
                            max_bounces,
                            &stop,
                        ) {
                            sweeps.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });

            match spawned {
                Ok(handle) => render.workers.push(handle),
                Err(e) => {
                    // Already spawned workers are joined by Drop
                    log::error!("Failed to spawn render worker {}: {}", index, e);
                    return Err(e);
                }
            }
        }

        log::info!(
            "Started {} render workers ({}x{} samples per sweep)",
            render.workers.len(),
            samples_axis,
            samples_axis
        );
        Ok(render)
    }

    /// Number of sweeps finished by all workers so far.
    pub fn sweeps_completed(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Signal every worker, wait for them, and return the completed sweeps.
    pub fn stop(mut self) -> u64 {
        self.shutdown();
        self.sweeps_completed()
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        let workers = std::mem::take(&mut self.workers);
        if workers.is_empty() {
            return;
        }

        let count = workers.len();
        for handle in workers {
            let name = handle.thread().name().unwrap_or("render").to_string();
            if handle.join().is_err() {
                log::error!("Render worker {} panicked", name);
            }
        }
        log::info!(
            "Stopped {} render workers after {} sweeps",
            count,
            self.sweeps_completed()
        );
    }
}

impl Drop for ProgressiveRender {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, ShapeList, Sphere};
    use pathspace_core::AccumulationMode;
    use pathspace_math::{Color, Vec3f};
    use std::time::{Duration, Instant};

    /// Camera inside an emissive sphere that reflects nothing: every sample is white.
    fn glowing_sphere() -> (Scene, Camera) {
        let mut shapes = ShapeList::new();
        shapes.push(Sphere::new(Vec3f::ZERO, 10.0, Material::emissive(Color::ONE)).unwrap());
        let camera = Camera::new().build().unwrap();
        (Scene::new(shapes), camera)
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba([0.0, 0.25, 4.0]), [0, 127, 255, 255]);
    }

    #[test]
    fn test_stopped_sweep_is_cut_short() {
        let (scene, camera) = glowing_sphere();
        let frame = Frame::new(4, 4, AccumulationMode::Relaxed).unwrap();
        let mut sampler = Sampler::new(1);
        let stop = AtomicBool::new(true);

        let done = render_sweep(&scene, &camera, &frame, &mut sampler, 8, 10, &stop);
        assert!(!done);
        assert_eq!(frame.total_weight(), 0.0);
    }

    #[test]
    fn test_full_sweep() {
        let (scene, camera) = glowing_sphere();
        let frame = Frame::new(4, 4, AccumulationMode::Relaxed).unwrap();
        let mut sampler = Sampler::new(2);
        let stop = AtomicBool::new(false);

        assert!(render_sweep(&scene, &camera, &frame, &mut sampler, 8, 10, &stop));
        // Splats past the right and bottom edges are dropped
        let total = frame.total_weight();
        assert!(total > 0.0 && total <= 64.0);
        assert_eq!(frame.average(0, 0), Some(Color::ONE));
    }

    #[test]
    fn test_render_passes_converges_everywhere() {
        let (scene, camera) = glowing_sphere();
        let frame = Frame::new(8, 8, AccumulationMode::Strict).unwrap();

        render_passes(&scene, &camera, &frame, 16, 4, 2, 99);

        for j in 0..8 {
            for i in 0..8 {
                let avg = frame.average(i, j).unwrap();
                assert!((avg - Color::ONE).length() < 1e-12);
            }
        }
        assert!(frame.total_weight() <= 2.0 * 256.0);
    }

    #[test]
    fn test_progressive_render_start_stop() {
        let (scene, camera) = glowing_sphere();
        let frame = Arc::new(Frame::new(8, 8, AccumulationMode::Relaxed).unwrap());
        let settings = RenderSettings {
            render_width: 8,
            render_height: 8,
            worker_count: 2,
            samples_per_sweep_axis: 8,
            max_bounces: 2,
            seed: Some(7),
            ..Default::default()
        };

        let render =
            ProgressiveRender::start(Arc::new(scene), camera, Arc::clone(&frame), &settings)
                .unwrap();
        assert_eq!(render.worker_count(), 2);

        let deadline = Instant::now() + Duration::from_secs(10);
        while render.sweeps_completed() < 2 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        let sweeps = render.stop();
        assert!(sweeps >= 2);
        assert!(frame.total_weight() > 0.0);

        // Workers are gone: the frame no longer changes
        let before = frame.total_weight();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(frame.total_weight(), before);
    }
}
