use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowId};

use lightbox::config::SandboxConfig;
use lightbox::controller::input::native;
use lightbox::controller::{FrameLoop, WindowControl};
use lightbox::error::InitError;
use lightbox::logging;
use lightbox::ui::EguiLayer;
use lightbox::view::WgpuRenderer;

/// Window access handed to the frame loop for one update.
struct WindowHandle<'a> {
    window: &'a Window,
    event_loop: &'a ActiveEventLoop,
}

impl WindowControl for WindowHandle<'_> {
    fn request_close(&mut self) {
        tracing::info!("Exit key pressed, closing");
        self.event_loop.exit();
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        let result = if captured {
            // not every platform can lock; confining is the closest fallback
            self.window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(err) = result {
            tracing::warn!("Cursor grab failed: {err}");
        }
        self.window.set_cursor_visible(!captured);
    }
}

struct AppState {
    window: Arc<Window>,
    renderer: WgpuRenderer,
    ui: EguiLayer,
    frame_loop: FrameLoop,
    last_frame: Instant,
}

struct App {
    config: SandboxConfig,
    state: Option<AppState>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: SandboxConfig) -> Self {
        Self {
            config,
            state: None,
            error: None,
        }
    }

    fn init(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.as_str())
            .with_inner_size(PhysicalSize::new(self.config.window.width, self.config.window.height));
        let window = event_loop.create_window(window_attrs).map_err(InitError::from)?;
        let window = Arc::new(window);

        let size = window.inner_size();
        let mut renderer = pollster::block_on(WgpuRenderer::new(window.clone(), size.width, size.height))
            .context("failed to initialise the GPU")?;
        let ui = EguiLayer::new(window.clone());
        let frame_loop = FrameLoop::new(&self.config, &mut renderer);

        tracing::info!(width = size.width, height = size.height, "Window and renderer initialized");
        Ok(AppState {
            window,
            renderer,
            ui,
            frame_loop,
            last_frame: Instant::now(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        // egui sees every event; the frame loop ignores camera input while the UI has the cursor
        let _ = state.ui.on_window_event(&event);
        if let Some(input) = native::from_window_event(&event) {
            state.frame_loop.handle_event(&input);
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting");
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                state.renderer.resize(new_size.width, new_size.height);
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(state.last_frame).as_secs_f32();
                state.last_frame = now;

                let mut handle = WindowHandle {
                    window: &state.window,
                    event_loop,
                };
                state.frame_loop.update(dt, &mut handle);

                let result = state.frame_loop.render(&mut state.renderer, &mut state.ui);
                state.frame_loop.end_frame();
                match result {
                    Ok(()) => {}
                    Err(err) if err.is_fatal() => {
                        let err = anyhow::Error::new(err).context("rendering failed");
                        self.fail(event_loop, err);
                    }
                    Err(err) => tracing::warn!("Frame skipped: {err}"),
                }
            }

            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let (Some(state), Some(input)) = (self.state.as_mut(), native::from_device_event(&event)) {
            state.frame_loop.handle_event(&input);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new().map_err(InitError::from)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(SandboxConfig::default());
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() {
    logging::init();
    tracing::info!("Starting lightbox");

    if let Err(err) = run() {
        tracing::error!("{err:#}");
        std::process::exit(-1);
    }
}
