//! Debug overlay rendered via egui on top of the game frame.
//!
//! egui needs its work split around the game's own render pass:
//!
//!   1. `prepare()` runs the UI and tessellates it, before the frame is drawn
//!   2. `render()` uploads textures and buffers, paints into a second pass
//!      that loads (not clears) the target, then frees retired textures
//!
//! UI logic only runs while `visible` (toggled by F3), but window events are
//! always forwarded so egui can claim clicks when it is shown.

use tw_core::{FrameClock, Rect};
use winit::window::Window;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    /// Frames rendered divided by seconds since the run started.
    pub average_fps: f64,
    pub player_position: (i32, i32),
    pub camera: Rect,
    pub stopwatch_label: String,
    pub stopwatch_secs: f64,
    pub paused: bool,
    pub draw_calls: u32,
    pub quads: u32,
    pub textures_loaded: u32,
    pub texture_memory_kb: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayActions {
    pub toggle_pause: bool,
    /// Start the stopwatch when stopped, stop it otherwise.
    pub toggle_stopwatch: bool,
}

pub struct PreparedOverlay {
    primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pub actions: OverlayActions,
}

/// Text rows shown in the overlay window, in display order.
pub fn stat_lines(clock: &FrameClock, stats: &OverlayStats) -> Vec<String> {
    vec![
        format!("Average FPS: {:.1}", stats.average_fps),
        format!("FPS: {:.1}", clock.smoothed_fps),
        format!("Frame time: {:.2} ms", clock.smoothed_frame_time_ms),
        format!(
            "Frames: {} (skipped {})",
            clock.frame_count, clock.skipped_count
        ),
        format!(
            "Player: ({}, {})",
            stats.player_position.0, stats.player_position.1
        ),
        format!(
            "Camera: ({}, {}) {}x{}",
            stats.camera.x, stats.camera.y, stats.camera.w, stats.camera.h
        ),
        format!(
            "Stopwatch: {} {:.2}s",
            stats.stopwatch_label, stats.stopwatch_secs
        ),
        format!("Draw calls: {} / quads: {}", stats.draw_calls, stats.quads),
        format!(
            "Textures: {} ({:.1} KB)",
            stats.textures_loaded, stats.texture_memory_kb
        ),
    ]
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
        }
    }

    /// Returns whether egui consumed the event.
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        self.visible && response.consumed
    }

    /// System clipboard text, read through the same platform state egui uses.
    pub fn clipboard_text(&mut self) -> Option<String> {
        self.egui_winit_state.clipboard_text()
    }

    pub fn set_clipboard_text(&mut self, text: String) {
        self.egui_winit_state.set_clipboard_text(text);
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        clock: &FrameClock,
        stats: &OverlayStats,
    ) -> PreparedOverlay {
        let mut actions = OverlayActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let visible = self.visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if !visible {
                return;
            }
            egui::Window::new("Debug")
                .default_pos([10.0, 10.0])
                .show(ctx, |ui| {
                    for line in stat_lines(clock, stats) {
                        ui.label(line);
                    }
                    ui.separator();
                    ui.horizontal(|ui| {
                        let pause_label = if stats.paused { "Resume" } else { "Pause" };
                        if ui.button(pause_label).clicked() {
                            actions.toggle_pause = true;
                        }
                        let watch_label = if stats.stopwatch_label == "stopped" {
                            "Start timer"
                        } else {
                            "Stop timer"
                        };
                        if ui.button(watch_label).clicked() {
                            actions.toggle_stopwatch = true;
                        }
                    });
                    if stats.paused {
                        ui.label("\u{23f8} PAUSED");
                    }
                });
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        PreparedOverlay {
            primitives,
            textures_delta: full_output.textures_delta,
            actions,
        }
    }

    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        prepared: &PreparedOverlay,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &prepared.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            device,
            queue,
            encoder,
            &prepared.primitives,
            screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.egui_renderer
                .render(&mut egui_pass, &prepared.primitives, screen_descriptor);
        }

        for id in &prepared.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
