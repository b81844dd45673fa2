use std::{sync::Arc, time::Instant};

use anyhow::Context;
use glam::Vec2;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    config::DemoConfig,
    controls::DragAction,
    debug_panel::{self, FrameStats},
    demo::DemoState,
    engine::{self, FrameDriver},
    rendering::{config::RenderConfig, renderer::Renderer},
};

// Wheel pixels per zoom step for touchpads that report pixel deltas.
const PIXELS_PER_ZOOM_STEP: f32 = 100.0;

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

struct App {
    render_config: RenderConfig,
    demo_state: DemoState,
    renderer: Option<Renderer>,
    imgui: Option<ImguiState>,
    stats: FrameStats,
    cursor: Vec2,
    last_frame: Instant,
}

/// Borrows what one redraw needs so `engine::tick` can drive it.
struct Frame<'a> {
    demo: &'a mut DemoState,
    renderer: &'a mut Renderer,
    imgui: &'a mut ImguiState,
    stats: &'a FrameStats,
    out_of_memory: bool,
}

impl FrameDriver for Frame<'_> {
    fn update_controls(&mut self) -> bool {
        self.demo.update_controls()
    }

    fn render(&mut self, _elapsed: f32) -> anyhow::Result<()> {
        let imgui = &mut *self.imgui;
        imgui
            .platform
            .prepare_frame(imgui.context.io_mut(), &self.renderer.window)
            .context("Failed to prepare imgui frame")?;

        let ui = imgui.context.new_frame();
        debug_panel::draw(ui, self.stats, self.demo);
        imgui.platform.prepare_render(ui, &self.renderer.window);

        self.renderer.sync_scene(&self.demo.scene);

        let result = self.renderer.render(&self.demo.camera, &mut imgui.context);
        if result.is_err() {
            // The imgui frame still has to be ended before the next new_frame.
            imgui.context.render();
        }

        match result {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost, reconfiguring");
                self.renderer.resize(self.renderer.size);
                Ok(())
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.out_of_memory = true;
                anyhow::bail!("Out of memory")
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout");
                Ok(())
            }
            Err(other) => Err(anyhow::anyhow!("Unexpected surface error: {:?}", other)),
        }
    }

    fn request_next_frame(&mut self) {
        self.renderer.window.request_redraw();
    }
}

impl App {
    fn new(config: DemoConfig, render_config: RenderConfig) -> Self {
        Self {
            render_config,
            demo_state: DemoState::new(config),
            renderer: None,
            imgui: None,
            stats: FrameStats::default(),
            cursor: Vec2::ZERO,
            last_frame: Instant::now(),
        }
    }

    fn setup_imgui(window: &Window) -> ImguiState {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let font_size = 14.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        // Disable INI support because it's broken in the published version of imgui
        context.set_ini_filename(None);

        ImguiState { context, platform }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes =
            Window::default_attributes().with_title(self.demo_state.config.window_title.clone());
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );

        let mut imgui = Self::setup_imgui(&window);

        let demo = &mut self.demo_state;
        let size = demo
            .viewport
            .resize_physical(&mut demo.camera, window.inner_size(), window.scale_factor())
            .unwrap_or_else(|| window.inner_size());

        let renderer = pollster::block_on(Renderer::new(
            window,
            size,
            &self.render_config,
            &demo.camera,
            &mut imgui.context,
        ))?;

        self.renderer = Some(renderer);
        self.imgui = Some(imgui);

        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("Failed to initialize: {:#}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let (Some(renderer), Some(imgui)) = (self.renderer.as_mut(), self.imgui.as_mut()) else {
            return;
        };

        let demo = &mut self.demo_state;
        let ui_wants_mouse = imgui.context.io().want_capture_mouse;

        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(size) = demo.viewport.resize_physical(
                    &mut demo.camera,
                    *new_size,
                    renderer.window.scale_factor(),
                ) {
                    renderer.resize(size);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(size) = demo.viewport.resize_physical(
                    &mut demo.camera,
                    renderer.window.inner_size(),
                    *scale_factor,
                ) {
                    renderer.resize(size);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                let height = renderer.window.inner_size().height as f32;
                demo.controls.drag_to(self.cursor, height, &demo.camera);
            }
            WindowEvent::MouseInput { state, button, .. } => match (state, button) {
                (ElementState::Pressed, MouseButton::Left) if !ui_wants_mouse => {
                    demo.controls.begin_drag(DragAction::Rotate, self.cursor);
                }
                (ElementState::Pressed, MouseButton::Right) if !ui_wants_mouse => {
                    demo.controls.begin_drag(DragAction::Pan, self.cursor);
                }
                (ElementState::Released, MouseButton::Left | MouseButton::Right) => {
                    demo.controls.end_drag();
                }
                _ => (),
            },
            WindowEvent::MouseWheel { delta, .. } if !ui_wants_mouse => match delta {
                MouseScrollDelta::LineDelta(_, y) => demo.controls.zoom(*y),
                MouseScrollDelta::PixelDelta(position) => {
                    demo.controls.zoom(position.y as f32 / PIXELS_PER_ZOOM_STEP)
                }
            },
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let frame_time = now - self.last_frame;
                self.last_frame = now;
                imgui.context.io_mut().update_delta_time(frame_time);
                self.stats.record(frame_time);

                demo.process_loads();

                let clock = demo.clock;
                let mut frame = Frame {
                    demo,
                    renderer,
                    imgui,
                    stats: &self.stats,
                    out_of_memory: false,
                };
                engine::tick(&mut frame, &clock);

                if frame.out_of_memory {
                    event_loop.exit();
                }
            }
            _ => (),
        }

        let (Some(renderer), Some(imgui)) = (self.renderer.as_ref(), self.imgui.as_mut()) else {
            return;
        };
        imgui.platform.handle_event::<()>(
            imgui.context.io_mut(),
            &renderer.window,
            &Event::WindowEvent { window_id, event },
        );
    }
}

pub async fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(DemoConfig::default(), RenderConfig::default());
    event_loop.run_app(&mut app)?;

    Ok(())
}
