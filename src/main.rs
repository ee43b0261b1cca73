use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use folio_scene::cli::Cli;
use folio_scene::config::SceneConfig;
use folio_scene::core::{ScrollPage, Viewport, WinitController};
use folio_scene::texture::TextureLoader;
use folio_scene::{AnimationLoop, CancelToken, GpuRenderer, LoopStatus, SceneDirector, SceneTextures};

const DEFAULT_LOG_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Everything that exists once the window is up
struct Running {
    window: Arc<Window>,
    renderer: GpuRenderer,
    director: SceneDirector,
    input: WinitController,
    page: ScrollPage,
    animation: AnimationLoop,
}

struct App {
    config: SceneConfig,
    token: CancelToken,
    state: Option<Running>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: SceneConfig) -> Self {
        Self {
            config,
            token: CancelToken::new(),
            state: None,
            error: None,
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let window_config = &self.config.window;
        let mut attributes = Window::default_attributes()
            .with_title(window_config.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(window_config.width, window_config.height));
        if window_config.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        let window = Arc::new(event_loop.create_window(attributes).context("Failed to create window")?);

        let renderer = pollster::block_on(GpuRenderer::new(window.clone()))?;
        let viewport = renderer.viewport();

        let loader = TextureLoader::new(&self.config.assets.dir);
        let textures = SceneTextures::load(&loader, &self.config.assets);

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("Star seed {seed}");
        let mut rng = StdRng::seed_from_u64(seed);
        let director = SceneDirector::build(viewport, textures, self.config.show_helpers, &mut rng);

        let page = ScrollPage::new(
            self.config.page.height,
            viewport.height as f32,
            self.config.page.line_height,
        );

        Ok(Running {
            window,
            renderer,
            director,
            input: WinitController::new(),
            page,
            animation: AnimationLoop::new(self.token.clone()),
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                log::error!("Start-up failed: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if let Some(scroll) = state.input.process_event(&event) {
            if let Some(top) = state.page.apply(scroll) {
                state.director.on_scroll(top);
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                self.token.cancel();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let viewport = Viewport::from(size);
                if viewport.is_empty() {
                    return;
                }
                state.renderer.resize(viewport);
                state.director.on_resize(viewport);
                // A taller window can pull the page back, which the page reports as a scroll
                if let Some(top) = state.page.set_viewport_height(viewport.height as f32) {
                    state.director.on_scroll(top);
                }
            }
            WindowEvent::RedrawRequested => {
                match state
                    .animation
                    .tick(&mut state.director, &state.input, &mut state.renderer)
                {
                    Ok(LoopStatus::Continue) => {}
                    Ok(LoopStatus::Cancelled) => event_loop.exit(),
                    Err(e) => log::error!("Render error: {e:#}"),
                }
                state.input.reset_deltas();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            log::info!("Exiting after {} frames", state.animation.frames());
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER)).init();

    let cli = Cli::parse();
    let config = SceneConfig::resolve(&cli)?;

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(config);

    log::info!("Scroll with the wheel or keyboard, drag to orbit, Escape to quit");
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
