use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use itertools::Itertools as _;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng as _};
use rgb::RGBA8;

use crate::camera::Camera;
use crate::film::{Film, color_to_rgba};
use crate::geometry::{Color, FloatType, Ray, ScreenPoint};
use crate::scene::Scene;
use crate::screen_block::ScreenBlock;
use crate::shader::shade;

#[derive(Copy, Clone, Debug)]
pub struct RenderSettings {
    /// Height of the row bands handed out to workers
    pub tile_size: std::num::NonZeroU32,
    /// Supersampling grid side. 1 samples pixel centers deterministically,
    /// n > 1 averages n * n jittered samples per pixel.
    pub supersampling: std::num::NonZeroU32,
    pub workers: WorkerCount,
}

#[derive(Copy, Clone, Debug, Default)]
pub enum WorkerCount {
    /// One worker per logical CPU
    #[default]
    Auto,
    Manual(NonZeroUsize),
}

impl WorkerCount {
    fn get(&self) -> usize {
        match self {
            WorkerCount::Auto => num_cpus::get(),
            WorkerCount::Manual(count) => count.get(),
        }
    }
}

/// Renders one full sweep of the scene and returns the finished film.
///
/// Row bands are handed out to worker threads through an atomic cursor.
/// `finished_tile_callback` runs on a worker thread after each band has
/// landed in the film.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    finished_tile_callback: impl Fn(ScreenBlock) + Send + Sync,
) -> anyhow::Result<Film> {
    let resolution = camera.get_resolution();
    let tile_ordering = ScreenBlock::from_size(resolution)
        .row_bands(settings.tile_size.get())
        .collect::<Vec<_>>();
    let next_tile_index = AtomicUsize::new(0);

    let film = Mutex::new(Film::new(resolution));
    let worker_count = settings.workers.get();
    let core_ids = core_affinity::get_core_ids().unwrap_or_default();

    log::debug!(
        "Rendering {}x{} pixels in {} bands on {} workers",
        resolution.x,
        resolution.y,
        tile_ordering.len(),
        worker_count,
    );

    thread::scope(|scope| -> anyhow::Result<()> {
        for worker_id in 0..worker_count {
            let tile_ordering = &tile_ordering;
            let next_tile_index = &next_tile_index;
            let film = &film;
            let finished_tile_callback = &finished_tile_callback;
            let core_id = core_ids.get(worker_id).copied();

            thread::Builder::new()
                .name(format!("worker{worker_id}"))
                .spawn_scoped(scope, move || {
                    if let Some(core_id) = core_id {
                        core_affinity::set_for_current(core_id);
                    }

                    let mut rng = SmallRng::from_os_rng();
                    let mut buffer = vec![
                        RGBA8::new(0, 0, 0, u8::MAX);
                        (settings.tile_size.get() * resolution.x) as usize
                    ];

                    loop {
                        let tile_index = next_tile_index.fetch_add(1, Ordering::AcqRel);
                        let Some(tile) = tile_ordering.get(tile_index) else {
                            break;
                        };

                        render_tile(scene, camera, settings, *tile, &mut buffer, &mut rng);
                        film.lock()
                            .expect("Poisoned lock!")
                            .write_block(*tile, &buffer);

                        finished_tile_callback(*tile);
                    }
                })?;
        }

        Ok(())
    })?;

    Ok(film.into_inner().expect("Poisoned lock!"))
}

fn render_tile(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    tile: ScreenBlock,
    buffer: &mut [RGBA8],
    rng: &mut impl Rng,
) {
    for point in tile.internal_points() {
        let color = render_pixel(scene, camera, settings, &point, rng);

        let buffer_position = point - tile.min;
        let index = (buffer_position.y * tile.width() + buffer_position.x) as usize;
        buffer[index] = color_to_rgba(&color);
    }
}

/// Color of one pixel: a single centered sample, or the average of a
/// jittered n by n sub-pixel grid.
fn render_pixel(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    point: &ScreenPoint,
    rng: &mut impl Rng,
) -> Color {
    let n = settings.supersampling.get();
    if n == 1 {
        return trace(scene, &camera.shoot_ray(point));
    }

    let cell = 1.0 / n as FloatType;
    let sum = (0..n)
        .cartesian_product(0..n)
        .map(|(i, j)| {
            let x = point.x as FloatType + (i as FloatType + rng.random::<FloatType>()) * cell;
            let y = point.y as FloatType + (j as FloatType + rng.random::<FloatType>()) * cell;
            trace(scene, &camera.ray_through(x, y))
        })
        .sum::<Color>();

    sum / (n * n) as FloatType
}

/// Traces one primary ray to its final color.
pub fn trace(scene: &Scene, ray: &Ray) -> Color {
    match scene.find_nearest(ray) {
        Some((index, hit)) => shade(
            ray,
            &hit,
            &scene.primitives[index].material,
            &scene.light,
            &scene.primitives,
        ),
        None => scene.background,
    }
}
