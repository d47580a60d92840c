mod camera;
mod film;
pub mod geometry;
mod renderer;
pub mod scene;
mod screen_block;
mod shader;

pub use crate::renderer::{RenderSettings, WorkerCount, render, trace};
pub use camera::Camera;
pub use film::{Film, color_to_rgba};
pub use scene::{Scene, SceneCommand};
pub use screen_block::ScreenBlock;
pub use shader::{in_shadow, shade};
