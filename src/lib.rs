pub mod animation;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod director;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod types;

pub use animation::{AnimationLoop, CancelToken, LoopStatus};
pub use director::{SceneDirector, SceneTextures};
pub use renderer::{GpuRenderer, SceneRenderer};
