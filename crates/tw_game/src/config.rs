use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use glam::IVec2;
use tw_core::Rect;

use crate::player::PLAYER_CLIPS;

pub const CONFIG_VERSION: &str = "0.1";

/// Largest accepted screen or world edge. Keeps position + velocity in i32.
pub const MAX_DIMENSION: i32 = 1 << 20;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    pub version: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub screen: SizeConfig,
    /// Defaults to three screens in each direction.
    #[serde(default)]
    pub world: Option<SizeConfig>,
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    #[serde(default)]
    pub vsync: bool,
    #[serde(default)]
    pub textures: TexturePaths,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default = "default_tile_size")]
    pub tile_size: i32,
    #[serde(default = "default_tiles")]
    pub tiles: Vec<Placement>,
    #[serde(default = "default_decorations")]
    pub decorations: Vec<DecorationConfig>,
    #[serde(default)]
    pub button: ButtonConfig,
    #[serde(default)]
    pub hud: HudConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SizeConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 900,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TexturePaths {
    pub background: String,
    pub tile: String,
    pub player: String,
    pub decoration: String,
    pub button: String,
}

impl Default for TexturePaths {
    fn default() -> Self {
        Self {
            background: "assets/textures/background.png".to_string(),
            tile: "assets/textures/brick.png".to_string(),
            player: "assets/textures/player.png".to_string(),
            decoration: "assets/textures/lavathing.png".to_string(),
            button: "assets/textures/button.png".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct PlayerConfig {
    /// `None` starts the player at the screen centre.
    pub start: Option<Placement>,
    pub speed: i32,
    pub scale: i32,
    pub walk_fps: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: None,
            speed: 5,
            scale: 8,
            walk_fps: 4,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DecorationConfig {
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_decoration_fps")]
    pub fps: i32,
    #[serde(default = "default_decoration_scale")]
    pub scale: i32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ButtonConfig {
    pub visible: bool,
    /// `None` centres the button on the screen.
    pub position: Option<Placement>,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            visible: true,
            position: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HudConfig {
    pub font: String,
    pub font_size: f32,
    /// Only measured: its line height sizes the status bar.
    pub prompt: String,
    pub initial_text: String,
    pub text_input: bool,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            font: "assets/fonts/DejaVuSansMono.ttf".to_string(),
            font_size: 32.0,
            prompt: "Sample text".to_string(),
            initial_text: "Input Text".to_string(),
            text_input: false,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            title: default_title(),
            screen: SizeConfig::default(),
            world: None,
            target_fps: default_target_fps(),
            vsync: false,
            textures: TexturePaths::default(),
            player: PlayerConfig::default(),
            tile_size: default_tile_size(),
            tiles: default_tiles(),
            decorations: default_decorations(),
            button: ButtonConfig::default(),
            hud: HudConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn screen_size(&self) -> IVec2 {
        IVec2::new(self.screen.width, self.screen.height)
    }

    pub fn world_size(&self) -> IVec2 {
        match self.world {
            Some(world) => IVec2::new(world.width, world.height),
            None => self.screen_size() * 3,
        }
    }

    pub fn player_start(&self) -> IVec2 {
        match self.player.start {
            Some(p) => IVec2::new(p.x, p.y),
            None => self.screen_size() / 2,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Missing file means defaults. A file that exists but does not parse or
/// validate is still an error.
pub fn load_config_or_default(path: &Path) -> Result<GameConfig, String> {
    if !path.exists() {
        log::warn!(
            "Config '{}' not found, using built-in defaults",
            path.display()
        );
        return Ok(GameConfig::default());
    }
    let config = load_config_from_path(path)?;
    log::info!("Loaded config '{}'", path.display());
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.version != CONFIG_VERSION {
        return Err(format!(
            "Config validation failed: unsupported version '{}' (expected '{CONFIG_VERSION}')",
            config.version
        ));
    }
    if config.screen.width <= 0 || config.screen.height <= 0 {
        return Err("Config validation failed: screen width and height must be > 0".to_string());
    }
    let largest_world = config.world.map_or(
        config.screen.width.max(config.screen.height).saturating_mul(3),
        |w| w.width.max(w.height),
    );
    if config.screen.width.max(config.screen.height) > MAX_DIMENSION
        || largest_world > MAX_DIMENSION
    {
        return Err(format!(
            "Config validation failed: screen and world edges must be <= {MAX_DIMENSION}"
        ));
    }
    let world = config.world_size();
    if world.x < config.screen.width || world.y < config.screen.height {
        return Err(format!(
            "Config validation failed: world {}x{} is smaller than the screen {}x{}",
            world.x, world.y, config.screen.width, config.screen.height
        ));
    }
    if config.target_fps == 0 {
        return Err("Config validation failed: target_fps must be > 0".to_string());
    }
    if config.tile_size <= 0 || config.tile_size > MAX_DIMENSION {
        return Err(format!(
            "Config validation failed: tile_size must be in 1..={MAX_DIMENSION}"
        ));
    }
    let limit = MAX_DIMENSION.unsigned_abs();
    let in_range = |x: i32, y: i32| x.unsigned_abs() <= limit && y.unsigned_abs() <= limit;
    if let Some(tile) = config.tiles.iter().find(|t| !in_range(t.x, t.y)) {
        return Err(format!(
            "Config validation failed: tile ({}, {}) is further than {MAX_DIMENSION} from the origin",
            tile.x, tile.y
        ));
    }
    if config.player.scale < 1 {
        return Err("Config validation failed: player.scale must be >= 1".to_string());
    }
    if config.player.speed < 0 || config.player.walk_fps < 0 {
        return Err(
            "Config validation failed: player.speed and player.walk_fps must be >= 0".to_string(),
        );
    }
    if config.player.speed > world.x.min(world.y) {
        return Err(format!(
            "Config validation failed: player.speed {} exceeds the world size {}x{}",
            config.player.speed, world.x, world.y
        ));
    }
    validate_player_start(config, world)?;
    if config.hud.font_size <= 0.0 {
        return Err("Config validation failed: hud.font_size must be > 0".to_string());
    }

    let mut seen = HashSet::new();
    for tile in &config.tiles {
        if !seen.insert(*tile) {
            return Err(format!(
                "Config validation failed: duplicate tile at ({}, {})",
                tile.x, tile.y
            ));
        }
    }
    for (i, decoration) in config.decorations.iter().enumerate() {
        if !in_range(decoration.x, decoration.y) {
            return Err(format!(
                "Config validation failed: decoration {i} is further than {MAX_DIMENSION} from the origin"
            ));
        }
        if decoration.scale < 1 || decoration.fps < 0 {
            return Err(format!(
                "Config validation failed: decoration {i} needs scale >= 1 and fps >= 0"
            ));
        }
    }

    Ok(())
}

/// The player's first frame must fit inside the world and clear every tile,
/// otherwise every move reverts and the player can never leave.
fn validate_player_start(config: &GameConfig, world: IVec2) -> Result<(), String> {
    let clip = PLAYER_CLIPS[0];
    let frame = IVec2::new(clip.w, clip.h) * config.player.scale.min(MAX_DIMENSION);
    let start = config.player_start();
    if start.x < 0 || start.y < 0 || start.x > world.x - frame.x || start.y > world.y - frame.y {
        return Err(format!(
            "Config validation failed: player start ({}, {}) with a {}x{} frame is outside the {}x{} world",
            start.x, start.y, frame.x, frame.y, world.x, world.y
        ));
    }
    let body = Rect::new(start.x, start.y, frame.x, frame.y);
    if let Some(tile) = config
        .tiles
        .iter()
        .find(|t| body.overlaps(&Rect::new(t.x, t.y, config.tile_size, config.tile_size)))
    {
        return Err(format!(
            "Config validation failed: player start ({}, {}) overlaps the tile at ({}, {})",
            start.x, start.y, tile.x, tile.y
        ));
    }
    Ok(())
}

fn default_title() -> String {
    "Tilewalk".to_string()
}

const fn default_target_fps() -> u32 {
    120
}

const fn default_tile_size() -> i32 {
    100
}

fn default_tiles() -> Vec<Placement> {
    (0..5).map(|i| Placement { x: i * 100, y: 0 }).collect()
}

fn default_decorations() -> Vec<DecorationConfig> {
    vec![DecorationConfig {
        x: 700,
        y: 300,
        fps: default_decoration_fps(),
        scale: default_decoration_scale(),
    }]
}

const fn default_decoration_fps() -> i32 {
    2
}

const fn default_decoration_scale() -> i32 {
    8
}
