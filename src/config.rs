use anyhow::{ensure, Result};
use macroquad::window::Conf;

// ==================== World constants ====================

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;
pub const TILE_SIZE: f32 = 64.0;

/// Whole tiles that fit across the world (12).
pub const GRID_WIDTH: i32 = (WIDTH as i32) / (TILE_SIZE as i32);
/// Whole tiles that fit down the world (9).
pub const GRID_HEIGHT: i32 = (HEIGHT as i32) / (TILE_SIZE as i32);

// ==================== Tunables ====================

/// Window and gameplay tuning. Speeds are in pixels per logical frame.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub window_title: String,
    pub window_width: i32,
    pub window_height: i32,
    pub target_fps: u32,
    pub hero_speed: f32,
    pub enemy_speed: f32,
    pub enemy_count: usize,
    /// Chance per frame that an idle enemy heads for its next waypoint.
    pub patrol_chance: f64,
    /// Animation frames advanced per logical frame.
    pub animation_speed: f32,
    pub asset_dir: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_title: "Roguelike Adventure".to_owned(),
            window_width: WIDTH as i32,
            window_height: HEIGHT as i32,
            target_fps: 60,
            hero_speed: 2.0,
            enemy_speed: 1.0,
            enemy_count: 5,
            patrol_chance: 0.01,
            animation_speed: 0.1,
            asset_dir: "assets".to_owned(),
        }
    }
}

impl GameConfig {
    /// Rejects tunables the game loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.patrol_chance),
            "patrol chance {} is not a probability",
            self.patrol_chance
        );
        ensure!(
            self.hero_speed >= 0.0 && self.enemy_speed >= 0.0,
            "speeds must not be negative (hero {}, enemy {})",
            self.hero_speed,
            self.enemy_speed
        );
        ensure!(
            self.animation_speed > 0.0,
            "animation speed must be positive, got {}",
            self.animation_speed
        );
        ensure!(self.target_fps > 0, "target fps must be positive");
        Ok(())
    }

    pub fn window_conf(&self) -> Conf {
        Conf {
            window_title: self.window_title.clone(),
            window_width: self.window_width,
            window_height: self.window_height,
            window_resizable: false,
            ..Default::default()
        }
    }
}
