//! Tilewalk: main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler` with `ControlFlow::Poll`.
//! Every redraw asks the [`FrameClock`] whether a frame is due; skipped
//! iterations do nothing at all. A processed frame:
//!
//!   1. reads the held keys and this frame's pointer and text events
//!   2. runs `World::frame` (simulate, then batch draws on the surface)
//!   3. prepares the egui debug overlay and applies its button actions
//!   4. presents the batch with the overlay composited on top

mod button;
mod camera;
mod collision;
mod config;
mod context;
mod hud;
mod player;
#[cfg(test)]
mod replay;
mod sprite;
mod tile;
mod world;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use config::{load_config_or_default, GameConfig};
use context::GameContext;
use tw_core::{FrameClock, FrameTick, InputState, Key, MonotonicClock, TextEdit};
use tw_devtools::DebugOverlay;
use tw_platform::keymap::{map_key, text_action, TextAction};
use tw_platform::window::PlatformConfig;
use tw_render::{RenderSurface, TextRasterizer, TtfFont, WgpuSurface};
use world::World;

const DEFAULT_CONFIG_PATH: &str = "assets/config/game.json";

struct GameState {
    window: Arc<Window>,
    clock: MonotonicClock,
    frame_clock: FrameClock,
    input: InputState,
    ctrl_held: bool,
    world: World<WgpuSurface>,
    debug_overlay: DebugOverlay,
}

impl GameState {
    fn new(window: Arc<Window>, config: &GameConfig) -> Self {
        let screen = config.screen_size();
        let surface = WgpuSurface::new(window.clone(), screen.x, screen.y, config.vsync)
            .unwrap_or_else(|err| panic!("Failed to initialise rendering: {err}"));
        let debug_overlay = DebugOverlay::new(surface.device(), surface.surface_format(), &window);

        let font: Option<Box<dyn TextRasterizer>> =
            match TtfFont::from_file(Path::new(&config.hud.font), config.hud.font_size) {
                Ok(font) => Some(Box::new(font)),
                Err(err) => {
                    log::error!("Failed to load font, status bar disabled: {err}");
                    None
                }
            };

        let clock = MonotonicClock::new();
        let world = World::load(GameContext::new(surface), config, font, &clock)
            .unwrap_or_else(|err| panic!("Failed to load world: {err}"));
        let frame_clock = FrameClock::new(config.target_fps, &clock);
        log::info!(
            "World ready: {} tiles, target {} fps",
            config.tiles.len(),
            config.target_fps
        );

        Self {
            window,
            clock,
            frame_clock,
            input: InputState::new(),
            ctrl_held: false,
            world,
            debug_overlay,
        }
    }

    /// Window pixels to logical screen coordinates.
    fn to_screen(&self, x: f64, y: f64) -> (i32, i32) {
        let (phys_w, phys_h) = self.world.ctx.surface.physical_size();
        let (screen_w, screen_h) = self.world.ctx.surface.screen_size();
        let sx = if phys_w == 0 {
            0.0
        } else {
            x * f64::from(screen_w) / f64::from(phys_w)
        };
        let sy = if phys_h == 0 {
            0.0
        } else {
            y * f64::from(screen_h) / f64::from(phys_h)
        };
        (sx as i32, sy as i32)
    }

    fn handle_keyboard(&mut self, event: &winit::event::KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;

        if let Some(key) = map_key(code) {
            if pressed {
                self.input.key_down(key);
            } else {
                self.input.key_up(key);
            }
        }

        if !pressed || !self.world.accepts_text() {
            return;
        }
        match text_action(code, self.ctrl_held, event.text.as_deref()) {
            Some(TextAction::Edit(edit)) => self.input.text_edit(edit),
            Some(TextAction::Copy) => {
                if let Some(text) = self.world.input_text() {
                    self.debug_overlay.set_clipboard_text(text.to_string());
                }
            }
            Some(TextAction::Paste) => match self.debug_overlay.clipboard_text() {
                Some(text) => {
                    let line: String = text.chars().filter(|c| !c.is_control()).collect();
                    self.input.text_edit(TextEdit::Replace(line));
                }
                None => log::warn!("Clipboard is empty or unavailable"),
            },
            None => {}
        }
    }

    /// Returns `false` when the game should exit.
    fn redraw(&mut self) -> bool {
        let dt = match self.frame_clock.tick(&self.clock) {
            FrameTick::Skip => return true,
            FrameTick::Run(dt) => dt,
        };

        if self.input.is_held(Key::Exit) {
            log::info!(
                "Exit requested after {} frames ({} steps)",
                self.world.counted_frames(),
                self.world.steps()
            );
            return false;
        }
        if self.input.is_just_pressed(Key::F3) {
            self.debug_overlay.toggle();
        }
        // P types into the status bar while text input is on.
        if self.input.is_just_pressed(Key::Pause) && !self.world.accepts_text() {
            self.world.toggle_pause(&self.clock);
        }
        if self.input.is_just_pressed(Key::Enter) {
            self.world.toggle_stopwatch(&self.clock);
        }

        let keys = self.input.snapshot();
        let pointer_events = self.input.take_pointer_events();
        let text_edits = self.input.take_text_edits();
        let report = self.world.frame(dt, keys, &pointer_events, &text_edits);
        if report.blocked_x || report.blocked_y {
            log::trace!("Movement blocked: x={} y={}", report.blocked_x, report.blocked_y);
        }

        let mut stats = self.world.overlay_stats(&self.clock);
        let (draw_calls, quads) = self.world.ctx.surface.last_frame_stats();
        stats.draw_calls = draw_calls as u32;
        stats.quads = quads as u32;

        let prepared = self
            .debug_overlay
            .prepare(&self.window, &self.frame_clock, &stats);
        if prepared.actions.toggle_pause {
            self.world.toggle_pause(&self.clock);
        }
        if prepared.actions.toggle_stopwatch {
            self.world.toggle_stopwatch(&self.clock);
        }

        let (width, height) = self.world.ctx.surface.physical_size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: self.window.scale_factor() as f32,
        };
        let overlay = &mut self.debug_overlay;
        self.world
            .ctx
            .surface
            .present_with(|device, queue, encoder, view| {
                overlay.render(device, queue, encoder, view, &prepared, &screen_descriptor);
            });

        self.input.end_frame();
        true
    }
}

struct App {
    config: GameConfig,
    state: Option<GameState>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    fn platform_config(&self) -> PlatformConfig {
        let screen = self.config.screen_size();
        PlatformConfig {
            title: self.config.title.clone(),
            width: screen.x as u32,
            height: screen.y as u32,
            resizable: false,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = tw_platform::window::create_window(event_loop, &self.platform_config())
            .unwrap_or_else(|err| panic!("{err}"));
        self.state = Some(GameState::new(window, &self.config));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                state
                    .world
                    .ctx
                    .surface
                    .resize(physical_size.width, physical_size.height);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                state.ctrl_held = modifiers.state().control_key();
            }
            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                state.handle_keyboard(&event);
            }
            WindowEvent::CursorMoved { position, .. } if !egui_consumed => {
                let (x, y) = state.to_screen(position.x, position.y);
                state.input.pointer_moved(x, y);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } if !egui_consumed => {
                state
                    .input
                    .pointer_button(button_state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => {
                if !state.redraw() {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = load_config_or_default(&config_path).unwrap_or_else(|err| {
        panic!(
            "Failed to load config '{}': {}",
            config_path.display(),
            err
        );
    });
    log::info!("{} starting...", config.title);

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
