use anyhow::Result;
use clap::Parser;
use glowrig_animate::AnimationLoop;
use glowrig_probe::{
    Availability, AvailabilityState, LogReporter, StaticLoader, StatusReporter, startup,
};
use glowrig_render::SurfaceSpec;
use glowrig_render_wgpu::{WgpuBackend, WgpuContext};
use glowrig_scene::{CameraRig, SceneBuilder};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "glowrig-desktop", about = "Animated gaming-rig backdrop")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Seed the starfield instead of drawing a fresh one
    #[arg(long)]
    seed: Option<u64>,

    /// Do not draw the status banner over the scene
    #[arg(long)]
    hide_status: bool,
}

/// Status sink backed by a single line of text; the frame loop hands it to
/// the banner overlay, degraded startups put it in the window title.
#[derive(Debug, Default)]
struct StatusLine {
    text: String,
    log: LogReporter,
}

impl StatusReporter for StatusLine {
    fn report(&mut self, state: AvailabilityState) {
        self.log.report(state);
        self.text = state.message().to_owned();
    }
}

/// Render dimensions for the window: logical size scaled by the device pixel
/// ratio, with the ratio capped at 2 so high-density displays don't quadruple
/// the pixel load of a backdrop.
fn surface_size(window: &Window) -> (u32, u32) {
    let physical = window.inner_size();
    let scale = window.scale_factor();
    if scale <= 2.0 {
        (physical.width.max(1), physical.height.max(1))
    } else {
        let shrink = 2.0 / scale;
        (
            ((physical.width as f64 * shrink) as u32).max(1),
            ((physical.height as f64 * shrink) as u32).max(1),
        )
    }
}

struct App {
    seed: Option<u64>,
    hide_status: bool,
    window: Option<Arc<Window>>,
    availability: Availability,
    status: StatusLine,
    context: Option<WgpuContext>,
    driver: Option<AnimationLoop>,
}

impl App {
    fn new(cli: &Cli) -> Self {
        Self {
            seed: cli.seed,
            hide_status: cli.hide_status,
            window: None,
            availability: Availability::new(),
            status: StatusLine::default(),
            context: None,
            driver: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("glowrig")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let (width, height) = surface_size(&window);
        let spec = SurfaceSpec::new(width, height);
        let backend = WgpuBackend::new(window.clone());

        let outcome = pollster::block_on(startup(
            &StaticLoader,
            &backend,
            &spec,
            &mut self.status,
        ));
        self.availability.settle(outcome.state());

        match outcome.into_context() {
            Some(mut context) => {
                let scene = match self.seed {
                    Some(seed) => {
                        SceneBuilder::build_with_rng(&mut ChaCha8Rng::seed_from_u64(seed))
                    }
                    None => SceneBuilder::build(),
                };
                let mut driver =
                    AnimationLoop::new(scene, CameraRig::new(SceneBuilder::initial_camera()));
                // Initial resize brings the camera aspect in line with the
                // surface before the first tick.
                driver.resize(&mut context, width, height);
                self.context = Some(context);
                self.driver = Some(driver);
            }
            None => {
                // Degraded: no surface to draw a banner on, so the title and
                // the log carry the message. The window stays up.
                window.set_title(&format!("glowrig \u{2014} {}", self.status.text));
            }
        }

        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(_) => {
                if let (Some(driver), Some(context), Some(window)) =
                    (&mut self.driver, &mut self.context, &self.window)
                {
                    let (width, height) = surface_size(window);
                    driver.resize(context, width, height);
                }
            }
            WindowEvent::RedrawRequested => {
                if self.availability.state() == AvailabilityState::Ready
                    && let (Some(driver), Some(context)) = (&mut self.driver, &mut self.context)
                {
                    let banner = if self.hide_status {
                        None
                    } else {
                        Some(self.status.text.clone())
                    };
                    context.set_status(banner);
                    driver.tick(context);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("glowrig-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(&cli);
    event_loop.run_app(&mut app)?;

    Ok(())
}
