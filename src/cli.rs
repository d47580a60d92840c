use miniray::{
    Camera, RenderSettings, Scene, WorkerCount,
    geometry::ScreenSize,
    render,
};

use indicatif::ProgressBar;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let scene = Scene::demo()?;
    let camera = Camera::builder()
        .resolution(ScreenSize::new(800, 800))
        .vertical_fov_degrees(60.0)
        .build();

    let settings = RenderSettings {
        tile_size: 16.try_into().unwrap(),
        supersampling: 3.try_into().unwrap(),
        workers: WorkerCount::Auto,
    };

    let band_count = camera
        .get_resolution()
        .y
        .div_ceil(settings.tile_size.get());
    let bar = ProgressBar::new(band_count as u64);

    let film = render(&scene, &camera, &settings, |_| bar.inc(1))?;
    bar.finish();

    film.into_image().save("render.png")?;
    log::info!("Saved render.png");

    Ok(())
}
