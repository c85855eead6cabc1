//! The playable world and its per-frame driver.
//!
//! One processed frame runs in this order:
//!
//!   1. pointer events to the button, text edits to the status bar
//!   2. tile colliders refreshed from the current camera
//!   3. player velocity from the key snapshot, then axis-separated move
//!   4. camera re-centred on the player and clamped to the world
//!   5. draw: background through the camera, tiles, decorations, button,
//!      player, status bar
//!
//! Presenting is left to the caller so an overlay can draw on top first.

use std::path::Path;
use std::time::Duration;

use glam::IVec2;
use tw_core::{Clock, KeySnapshot, PointerEvent, Rect, Stopwatch, TextEdit};
use tw_devtools::OverlayStats;
use tw_render::{Color, RenderSurface, TextRasterizer, TextureId};

use crate::button::ToggleButton;
use crate::camera::Camera;
use crate::config::GameConfig;
use crate::context::GameContext;
use crate::hud::StatusBar;
use crate::player::{Player, PlayerTuning};
use crate::sprite::AnimatedSprite;
use crate::tile::Tile;

pub static DECORATION_CLIPS: [Rect; 2] = [Rect::new(0, 0, 8, 8), Rect::new(0, 8, 8, 8)];

/// Average FPS above this is treated as a measuring artefact.
const MAX_PLAUSIBLE_FPS: f64 = 2_000_000.0;

#[derive(Debug, Clone, Copy)]
pub struct WorldTextures {
    pub background: TextureId,
    pub tile: TextureId,
    pub player: TextureId,
    pub decoration: TextureId,
    pub button: TextureId,
}

impl WorldTextures {
    pub fn register<S: RenderSurface>(ctx: &mut GameContext<S>) -> Self {
        Self {
            background: ctx.textures.register("background"),
            tile: ctx.textures.register("tile"),
            player: ctx.textures.register("player"),
            decoration: ctx.textures.register("decoration"),
            button: ctx.textures.register("button"),
        }
    }
}

struct Decoration {
    position: IVec2,
    sprite: AnimatedSprite,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// The walk cycle advanced; this is where a footstep sound would play.
    pub step: bool,
    pub blocked_x: bool,
    pub blocked_y: bool,
}

pub struct World<S: RenderSurface> {
    pub ctx: GameContext<S>,
    world_size: IVec2,
    background: TextureId,
    tiles: Vec<Tile>,
    player: Player,
    decorations: Vec<Decoration>,
    button: Option<ToggleButton>,
    status_bar: Option<StatusBar>,
    text_input: bool,
    camera: Camera,
    paused: bool,
    stopwatch: Stopwatch,
    fps_timer: Stopwatch,
    counted_frames: u64,
    steps: u64,
}

impl<S: RenderSurface> World<S> {
    /// Load every texture named in `config`. The background is required;
    /// other textures that fail to load are logged and drawn as nothing.
    pub fn load(
        mut ctx: GameContext<S>,
        config: &GameConfig,
        font: Option<Box<dyn TextRasterizer>>,
        clock: &dyn Clock,
    ) -> Result<Self, String> {
        let textures = WorldTextures::register(&mut ctx);
        let paths = &config.textures;

        ctx.load_texture(textures.background, Path::new(&paths.background))
            .map_err(|e| format!("Failed to load background texture: {e}"))?;
        for (id, path) in [
            (textures.tile, &paths.tile),
            (textures.player, &paths.player),
            (textures.decoration, &paths.decoration),
            (textures.button, &paths.button),
        ] {
            if let Err(err) = ctx.load_texture(id, Path::new(path)) {
                log::error!("{err}");
            }
        }

        Self::from_parts(ctx, textures, config, font, clock)
    }

    /// Build from textures already registered (and possibly loaded) in `ctx`.
    pub fn from_parts(
        mut ctx: GameContext<S>,
        textures: WorldTextures,
        config: &GameConfig,
        font: Option<Box<dyn TextRasterizer>>,
        clock: &dyn Clock,
    ) -> Result<Self, String> {
        ctx.set_texture_scale(textures.player, config.player.scale);

        let tiles = config
            .tiles
            .iter()
            .map(|p| Tile::new(p.x, p.y, config.tile_size, textures.tile))
            .collect();

        let tuning = PlayerTuning {
            speed: config.player.speed,
            walk_fps: config.player.walk_fps,
        };
        let player = Player::new(textures.player, config.player_start(), tuning);

        // All decorations share one texture, so they share its scale too.
        if let Some(first) = config.decorations.first() {
            ctx.set_texture_scale(textures.decoration, first.scale);
        }
        let decorations = config
            .decorations
            .iter()
            .map(|d| Decoration {
                position: IVec2::new(d.x, d.y),
                sprite: AnimatedSprite::new(
                    textures.decoration,
                    &DECORATION_CLIPS,
                    d.fps.max(0) as u32,
                ),
            })
            .collect();

        let screen = config.screen_size();
        let button = config.button.visible.then(|| match config.button.position {
            Some(p) => ToggleButton::new(textures.button, p.x, p.y),
            None => ToggleButton::centered(textures.button, screen.x, screen.y),
        });

        let status_bar = match font {
            Some(font) => match StatusBar::new(
                &mut ctx,
                font,
                &config.hud.prompt,
                &config.hud.initial_text,
            ) {
                Ok(bar) => Some(bar),
                Err(err) => {
                    log::error!("Status bar disabled: {err}");
                    None
                }
            },
            None => None,
        };

        let mut fps_timer = Stopwatch::new();
        fps_timer.start(clock);

        Ok(Self {
            ctx,
            world_size: config.world_size(),
            background: textures.background,
            tiles,
            player,
            decorations,
            button,
            status_bar,
            text_input: config.hud.text_input,
            camera: Camera::new(screen.x, screen.y),
            paused: false,
            stopwatch: Stopwatch::new(),
            fps_timer,
            counted_frames: 0,
            steps: 0,
        })
    }

    pub fn frame(
        &mut self,
        dt: Duration,
        keys: KeySnapshot,
        pointer_events: &[PointerEvent],
        text_edits: &[TextEdit],
    ) -> FrameReport {
        let mut report = FrameReport::default();
        self.ctx.keys = keys;

        if let Some(button) = &mut self.button {
            for event in pointer_events {
                button.handle_event(event);
            }
        }
        if self.text_input {
            if let Some(bar) = &mut self.status_bar {
                bar.apply_edits(&mut self.ctx, text_edits);
            }
        }

        let sim_dt = if self.paused {
            self.player.stop();
            Duration::ZERO
        } else {
            let cam = self.camera.offset();
            for tile in &mut self.tiles {
                tile.apply_camera_offset(cam.x, cam.y);
            }
            self.player.apply_input(&self.ctx.keys);
            let moved = self
                .player
                .move_and_collide(&self.ctx, &self.tiles, self.world_size, cam);
            report.blocked_x = moved.blocked_x;
            report.blocked_y = moved.blocked_y;

            let target = Rect::new(
                self.player.position().x,
                self.player.position().y,
                self.player.size(&self.ctx).x,
                self.player.size(&self.ctx).y,
            );
            self.camera.follow(target, self.world_size);
            dt
        };

        report.step = self.render(sim_dt);
        if report.step {
            self.steps += 1;
            log::debug!("step at {:?}", self.player.position());
        }
        self.counted_frames += 1;
        report
    }

    fn render(&mut self, dt: Duration) -> bool {
        let cam = self.camera.offset();
        self.ctx.surface.clear(Color::BLACK);
        self.ctx.draw(self.background, 0, 0, Some(self.camera.viewport));

        for tile in &self.tiles {
            tile.render(&mut self.ctx, cam.x, cam.y);
        }
        for decoration in &mut self.decorations {
            let screen = decoration.position - cam;
            decoration.sprite.render(&mut self.ctx, screen.x, screen.y, dt);
        }
        if let Some(button) = &self.button {
            button.render(&mut self.ctx);
        }

        let step = self.player.render(&mut self.ctx, cam, dt);

        if let Some(bar) = &self.status_bar {
            bar.render(&mut self.ctx);
        }
        step
    }

    pub fn toggle_pause(&mut self, clock: &dyn Clock) {
        self.paused = !self.paused;
        if self.paused {
            self.stopwatch.pause(clock);
        } else {
            self.stopwatch.unpause(clock);
        }
        log::info!(
            "Simulation {}",
            if self.paused { "PAUSED" } else { "RESUMED" }
        );
    }

    /// Start the stopwatch when it is stopped, stop it otherwise.
    pub fn toggle_stopwatch(&mut self, clock: &dyn Clock) {
        if self.stopwatch.is_running() {
            log::info!(
                "Stopwatch stopped at {:.2}s",
                self.stopwatch.elapsed(clock).as_secs_f64()
            );
            self.stopwatch.stop();
        } else {
            self.stopwatch.start(clock);
            if self.paused {
                self.stopwatch.pause(clock);
            }
            log::info!("Stopwatch started");
        }
    }

    /// Frames drawn divided by seconds since the world was built.
    pub fn average_fps(&self, clock: &dyn Clock) -> f64 {
        let secs = self.fps_timer.elapsed(clock).as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        let fps = self.counted_frames as f64 / secs;
        if fps > MAX_PLAUSIBLE_FPS {
            0.0
        } else {
            fps
        }
    }

    pub fn overlay_stats(&self, clock: &dyn Clock) -> OverlayStats {
        let position = self.player.position();
        OverlayStats {
            average_fps: self.average_fps(clock),
            player_position: (position.x, position.y),
            camera: self.camera.viewport,
            stopwatch_label: self.stopwatch.state().label().to_string(),
            stopwatch_secs: self.stopwatch.elapsed(clock).as_secs_f64(),
            paused: self.paused,
            textures_loaded: self.ctx.textures.loaded_count() as u32,
            texture_memory_kb: self.ctx.textures.estimate_bytes() as f32 / 1024.0,
            ..OverlayStats::default()
        }
    }

    #[cfg(test)]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current status bar line, if there is a status bar.
    pub fn input_text(&self) -> Option<&str> {
        self.status_bar.as_ref().map(|bar| bar.text())
    }

    pub fn accepts_text(&self) -> bool {
        self.text_input && self.status_bar.is_some()
    }

    #[cfg(test)]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[cfg(test)]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[cfg(test)]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[cfg(test)]
    pub fn button(&self) -> Option<&ToggleButton> {
        self.button.as_ref()
    }

    #[cfg(test)]
    pub fn status_bar(&self) -> Option<&StatusBar> {
        self.status_bar.as_ref()
    }

    #[cfg(test)]
    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn counted_frames(&self) -> u64 {
        self.counted_frames
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[cfg(test)]
    pub fn world_size(&self) -> IVec2 {
        self.world_size
    }
}

/// World with blank in-memory textures, for tests that need the full frame.
#[cfg(test)]
pub(crate) fn test_world(
    config: &GameConfig,
    clock: &dyn Clock,
) -> World<tw_render::RecordingSurface> {
    test_world_with_font(config, None, clock)
}

#[cfg(test)]
pub(crate) fn test_world_with_font(
    config: &GameConfig,
    font: Option<Box<dyn TextRasterizer>>,
    clock: &dyn Clock,
) -> World<tw_render::RecordingSurface> {
    let screen = config.screen_size();
    let mut ctx = GameContext::new(tw_render::RecordingSurface::new(screen.x, screen.y));
    let textures = WorldTextures::register(&mut ctx);
    let world = config.world_size();
    for (id, w, h) in [
        (textures.background, world.x as u32, world.y as u32),
        (textures.tile, 16, 16),
        (textures.player, 16, 32),
        (textures.decoration, 8, 16),
        (textures.button, 8, 24),
    ] {
        ctx.textures
            .get_mut(id)
            .expect("registered")
            .load_from_image(&mut ctx.surface, &image::RgbaImage::new(w, h), "test")
            .expect("upload");
    }
    World::from_parts(ctx, textures, config, font, clock).expect("world builds")
}
