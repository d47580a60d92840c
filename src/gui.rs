use std::time::Instant;

use eframe::{App, CreationContext, Frame, egui};
use egui::{
    CentralPanel, Color32, ColorImage, Context, Image, Key, RichText, TextureHandle,
    TextureOptions,
};
use miniray::{
    Camera, Film, RenderSettings, Scene, SceneCommand, WorkerCount,
    geometry::{FloatType, ScreenSize, WorldVector},
    render,
};

/// Scale factor from render resolution to window pixels
const DISPLAY_SCALE: f32 = 3.0;
/// World units the light moves per key press
const LIGHT_STEP: FloatType = 0.2;

pub struct MinirayGui {
    scene: Scene,
    camera: Camera,
    settings: RenderSettings,
    texture: TextureHandle,
    last_frame: Instant,
    fps: f64,
}

impl MinirayGui {
    pub fn new(
        scene: Scene,
        camera: Camera,
        settings: RenderSettings,
        cc: &CreationContext<'_>,
    ) -> anyhow::Result<Self> {
        let film = render(&scene, &camera, &settings, |_| {})?;
        let texture =
            cc.egui_ctx
                .load_texture("rendered", film_image(&film), TextureOptions::NEAREST);

        Ok(MinirayGui {
            scene,
            camera,
            settings,
            texture,
            last_frame: Instant::now(),
            fps: 0.0,
        })
    }

    /// Commands requested by keys pressed since the last sweep.
    fn queued_commands(ctx: &Context) -> Vec<SceneCommand> {
        let mut commands = Vec::new();
        ctx.input(|input| {
            // Arrows move the light in the screen plane, page keys in depth
            let key_deltas = [
                (Key::ArrowLeft, -WorldVector::x()),
                (Key::ArrowRight, WorldVector::x()),
                (Key::ArrowUp, WorldVector::z()),
                (Key::ArrowDown, -WorldVector::z()),
                (Key::PageUp, WorldVector::y()),
                (Key::PageDown, -WorldVector::y()),
            ];
            for (key, direction) in key_deltas {
                if input.key_pressed(key) {
                    commands.push(SceneCommand::MoveLight(direction * LIGHT_STEP));
                }
            }

            if input.key_pressed(Key::X) {
                commands.push(SceneCommand::CycleMaterial);
            }
        });
        commands
    }

    fn overlay(&self, ctx: &Context) {
        let light = self.scene.light.position;
        let material = self
            .scene
            .palette
            .current()
            .map(|material| material.name.clone())
            .unwrap_or_else(|| "-".to_string());

        egui::Area::new(egui::Id::new("status_overlay"))
            .fixed_pos(egui::pos2(10.0, 10.0))
            .show(ctx, |ui| {
                for line in [
                    format!("FPS: {:.1}", self.fps),
                    format!("Light: ({:.1}, {:.1}, {:.1})", light.x, light.y, light.z),
                    format!("Material: {material}"),
                ] {
                    ui.label(
                        RichText::new(line)
                            .color(Color32::WHITE)
                            .background_color(Color32::BLACK),
                    );
                }
            });
    }
}

impl App for MinirayGui {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        if ctx.input(|input| input.key_pressed(Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // Commands only apply between sweeps, never during one
        for command in Self::queued_commands(ctx) {
            self.scene.apply(command);
        }

        match render(&self.scene, &self.camera, &self.settings, |_| {}) {
            Ok(film) => self.texture.set(film_image(&film), TextureOptions::NEAREST),
            Err(error) => log::error!("Render sweep failed: {error}"),
        }

        let now = Instant::now();
        self.fps = 1.0 / now.duration_since(self.last_frame).as_secs_f64().max(1e-6);
        self.last_frame = now;

        let resolution = self.camera.get_resolution();
        let display_size = egui::vec2(
            resolution.x as f32 * DISPLAY_SCALE,
            resolution.y as f32 * DISPLAY_SCALE,
        );

        CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.add(Image::from_texture(&self.texture).fit_to_exact_size(display_size))
            })
        });

        self.overlay(ctx);

        ctx.request_repaint();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting the interactive viewer");

    eframe::run_native(
        "Miniray GUI",
        Default::default(),
        Box::new(|cc| {
            let scene = Scene::demo()?;
            let camera = Camera::builder()
                .resolution(ScreenSize::new(200, 200))
                .vertical_fov_degrees(60.0)
                .build();
            let settings = RenderSettings {
                tile_size: 25.try_into().unwrap(),
                supersampling: 1.try_into().unwrap(),
                workers: WorkerCount::Auto,
            };

            Ok(Box::new(MinirayGui::new(scene, camera, settings, cc)?))
        }),
    )
    .unwrap();

    Ok(())
}

fn film_image(film: &Film) -> ColorImage {
    let resolution = film.resolution();
    ColorImage::from_rgba_unmultiplied(
        [resolution.x as usize, resolution.y as usize],
        film.as_bytes(),
    )
}
