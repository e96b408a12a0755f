//! Windowed viewer: event loop, viewport state, and draw dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use wgpu::SurfaceError;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::gpu::Gpu;
use crate::loader::DecodedImage;

/// Fixed window title, never derived from the displayed file.
const WINDOW_TITLE: &str = "Image";

/// Rectangle of the window surface that rendered output is mapped into.
///
/// The offsets stay pinned at the origin; resizes only ever move the extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub offset_x: u32,
    pub offset_y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Viewport at the origin with the given extent.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            width,
            height,
        }
    }

    /// Track a new window size. Offsets are left at the origin.
    pub const fn resized(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

struct ViewerApp {
    /// Taken on first resume when the texture is uploaded.
    image: Option<DecodedImage>,
    viewport: Viewport,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    /// Setup failure stashed for [`run_windowed`] to re-raise; winit gives
    /// the handler callbacks no way to return one.
    init_error: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(image: DecodedImage) -> Self {
        let viewport = Viewport::new(image.width, image.height);
        Self {
            image: Some(image),
            viewport,
            window: None,
            gpu: None,
            init_error: None,
        }
    }

    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) -> Option<Arc<Window>> {
        if let Some(window) = self.window.as_ref() {
            return Some(window.clone());
        }

        let attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(self.viewport.width, self.viewport.height));
        match event_loop.create_window(attrs) {
            Ok(window) => {
                let window = Arc::new(window);
                self.window = Some(window.clone());
                Some(window)
            }
            Err(err) => {
                error!(error = %err, "failed to create viewer window");
                self.init_error =
                    Some(anyhow::Error::new(err).context("failed to create viewer window"));
                None
            }
        }
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let width = new_size.width.max(1);
        let height = new_size.height.max(1);
        gpu.resize(width, height);
        self.viewport.resized(width, height);
        debug!(width, height, "viewer surface resized");

        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn draw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        match gpu.render(&self.viewport) {
            Ok(()) => {}
            Err(SurfaceError::Outdated | SurfaceError::Lost) => {
                info!("viewer surface lost; reconfiguring");
                if let Some(size) = self.window.as_ref().map(|window| window.inner_size()) {
                    self.handle_resize(size);
                }
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("viewer surface out of memory; exiting event loop");
                event_loop.exit();
            }
            Err(SurfaceError::Timeout) => {
                warn!("viewer surface acquisition timed out");
            }
            Err(SurfaceError::Other) => {
                warn!("viewer surface reported an unknown error; retrying");
                if let Some(size) = self.window.as_ref().map(|window| window.inner_size()) {
                    self.handle_resize(size);
                }
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.ensure_window(event_loop) else {
            event_loop.exit();
            return;
        };

        if self.gpu.is_none() {
            let Some(image) = self.image.take() else {
                return;
            };
            match Gpu::new(window.clone(), image) {
                Ok(gpu) => {
                    // The window manager may not have honored the requested
                    // size; track whatever the window really is.
                    let size = window.inner_size();
                    self.viewport = Viewport::new(size.width.max(1), size.height.max(1));
                    self.gpu = Some(gpu);
                }
                Err(err) => {
                    error!(error = ?err, "failed to initialize GPU state");
                    self.init_error = Some(err);
                    event_loop.exit();
                    return;
                }
            }
        }

        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("viewer window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size);
            }
            WindowEvent::ScaleFactorChanged {
                mut inner_size_writer,
                ..
            } => {
                let size = window.inner_size();
                let _ = inner_size_writer.request_inner_size(size);
                self.handle_resize(size);
            }
            WindowEvent::RedrawRequested => {
                self.draw(event_loop);
            }
            _ => {}
        }
    }
}

/// Open a window for `image` and run until the user closes it.
///
/// The loop sleeps between OS events; the picture is static, so there is
/// nothing to animate.
///
/// # Errors
/// Returns an error when the event loop cannot be built or when window or
/// GPU setup fails.
pub fn run_windowed(image: DecodedImage) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to build viewer event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = ViewerApp::new(image);
    event_loop
        .run_app(&mut app)
        .context("viewer event loop failed")?;

    match app.init_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
