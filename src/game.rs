use macroquad::color::Color;
use macroquad::input::KeyCode;
use macroquad::math::{vec2, Rect, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{GameConfig, GRID_HEIGHT, GRID_WIDTH, HEIGHT, TILE_SIZE, WIDTH};
use crate::entity::Entity;
use crate::platform::{Audio, Flow, MusicTrack, Renderer, SoundEffect};

// ==================== Game modes ====================

/// Top-level screen. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Menu,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    ToggleSound,
    Quit,
}

/// Clickable regions of the main menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuButtons {
    pub start: Rect,
    pub sound: Rect,
    pub quit: Rect,
}

impl MenuButtons {
    pub fn layout() -> Self {
        let left = WIDTH / 2.0 - 100.0;
        Self {
            start: Rect::new(left, 200.0, 200.0, 50.0),
            sound: Rect::new(left, 270.0, 200.0, 50.0),
            quit: Rect::new(left, 340.0, 200.0, 50.0),
        }
    }

    pub fn hit(&self, pos: Vec2) -> Option<MenuAction> {
        if self.start.contains(pos) {
            Some(MenuAction::Start)
        } else if self.sound.contains(pos) {
            Some(MenuAction::ToggleSound)
        } else if self.quit.contains(pos) {
            Some(MenuAction::Quit)
        } else {
            None
        }
    }
}

// ==================== Geometry helpers ====================

/// Centre of the tile containing `pos`.
pub fn tile_center(pos: Vec2) -> Vec2 {
    (pos / TILE_SIZE).floor() * TILE_SIZE + Vec2::splat(TILE_SIZE / 2.0)
}

/// Two entities touch when they are less than a tile apart on both axes.
pub fn touching(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < TILE_SIZE && (a.y - b.y).abs() < TILE_SIZE
}

// ==================== Game ====================

pub struct Game {
    pub mode: GameMode,
    pub hero: Option<Entity>,
    pub enemies: Vec<Entity>,
    pub music_on: bool,
    pub sounds_on: bool,
    pub config: GameConfig,
    menu_buttons: Option<MenuButtons>,
    rng: StdRng,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Same session every time for a given seed.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            mode: GameMode::Menu,
            hero: None,
            enemies: Vec::new(),
            music_on: true,
            sounds_on: true,
            config,
            menu_buttons: None,
            rng,
        }
    }

    /// Button rects from the last menu draw, if the menu is on screen.
    pub fn menu_buttons(&self) -> Option<&MenuButtons> {
        self.menu_buttons.as_ref()
    }

    pub fn start_game(&mut self, audio: &mut dyn Audio) {
        self.mode = GameMode::Playing;
        self.menu_buttons = None;
        self.hero = Some(Entity::hero(vec2(WIDTH / 2.0, HEIGHT / 2.0), &self.config));

        self.enemies.clear();
        for _ in 0..self.config.enemy_count {
            let x = self.rng.gen_range(1..=GRID_WIDTH - 2) as f32 * TILE_SIZE;
            let y = self.rng.gen_range(1..=GRID_HEIGHT - 2) as f32 * TILE_SIZE;
            tracing::debug!(x, y, "spawning enemy");
            let enemy = Entity::enemy(vec2(x, y), &self.config, &mut self.rng);
            self.enemies.push(enemy);
        }

        if self.music_on {
            audio.play_music(MusicTrack::Theme);
        }
        tracing::info!(enemies = self.enemies.len(), "game started");
    }

    pub fn update(&mut self, audio: &mut dyn Audio) {
        if self.mode != GameMode::Playing {
            return;
        }
        let Some(hero) = self.hero.as_mut() else {
            return;
        };

        hero.update(&mut self.rng);
        let hero_position = hero.position;

        for (idx, enemy) in self.enemies.iter_mut().enumerate() {
            enemy.update(&mut self.rng);

            if self.mode == GameMode::Playing && touching(enemy.position, hero_position) {
                tracing::info!(enemy = idx, "hero caught");
                self.mode = GameMode::GameOver;
                if self.sounds_on {
                    audio.play_sound(SoundEffect::Lose);
                }
            }
        }
    }

    // ==================== Input ====================

    pub fn on_mouse_down(&mut self, pos: Vec2, audio: &mut dyn Audio) -> Flow {
        match self.mode {
            GameMode::Menu => {
                let buttons = *self.menu_buttons.get_or_insert_with(MenuButtons::layout);
                match buttons.hit(pos) {
                    Some(MenuAction::Start) => self.start_game(audio),
                    Some(MenuAction::ToggleSound) => self.toggle_sound(audio),
                    Some(MenuAction::Quit) => {
                        tracing::info!("quit requested");
                        return Flow::Quit;
                    }
                    None => {}
                }
            }
            GameMode::Playing => {
                if let Some(hero) = self.hero.as_mut() {
                    let target = tile_center(pos);
                    tracing::trace!(x = target.x, y = target.y, "hero ordered to move");
                    hero.move_to(target);
                    if self.sounds_on {
                        audio.play_sound(SoundEffect::Step);
                    }
                }
            }
            GameMode::GameOver => {
                self.mode = GameMode::Menu;
                self.hero = None;
                self.enemies.clear();
                audio.stop_music();
                tracing::info!("back to menu");
            }
        }
        Flow::Continue
    }

    pub fn on_mouse_move(&mut self, _pos: Vec2) {}

    /// Keys do nothing; movement is mouse driven.
    pub fn on_key_down(&mut self, key: KeyCode) {
        tracing::trace!(?key, mode = ?self.mode, "key ignored");
    }

    // Music and effects share one switch.
    fn toggle_sound(&mut self, audio: &mut dyn Audio) {
        self.sounds_on = !self.sounds_on;
        self.music_on = !self.music_on;
        if self.music_on {
            audio.play_music(MusicTrack::Theme);
        } else {
            audio.stop_music();
        }
        tracing::debug!(music = self.music_on, sounds = self.sounds_on, "sound toggled");
    }

    // ==================== Drawing ====================

    pub fn draw(&mut self, renderer: &mut dyn Renderer) {
        match self.mode {
            GameMode::Menu => self.draw_menu(renderer),
            GameMode::Playing => self.draw_world(renderer),
            GameMode::GameOver => {
                self.draw_world(renderer);
                renderer.filled_rect(
                    Rect::new(0.0, 0.0, WIDTH, HEIGHT),
                    Color::from_rgba(0, 0, 0, 128),
                );
                let center = vec2(WIDTH / 2.0, HEIGHT / 2.0);
                renderer.text("GAME OVER", center, 60.0);
                renderer.text("Click to return to menu", center + vec2(0.0, 50.0), 30.0);
            }
        }
    }

    fn draw_menu(&mut self, renderer: &mut dyn Renderer) {
        renderer.blit("menu_bg", Vec2::ZERO, false);
        renderer.text("ROGUELIKE ADVENTURE", vec2(WIDTH / 2.0, 100.0), 50.0);

        let buttons = MenuButtons::layout();
        self.menu_buttons = Some(buttons);

        let sound_label = if self.sounds_on { "SOUND: ON" } else { "SOUND: OFF" };
        for (rect, color, label) in [
            (buttons.start, Color::from_rgba(50, 150, 50, 255), "START GAME"),
            (buttons.sound, Color::from_rgba(150, 50, 50, 255), sound_label),
            (buttons.quit, Color::from_rgba(150, 50, 150, 255), "QUIT"),
        ] {
            renderer.filled_rect(rect, color);
            renderer.text(label, rect.center(), 30.0);
        }
    }

    fn draw_world(&self, renderer: &mut dyn Renderer) {
        renderer.blit("dungeon", Vec2::ZERO, false);
        if let Some(hero) = &self.hero {
            hero.draw(renderer);
        }
        for enemy in &self.enemies {
            enemy.draw(renderer);
        }
    }
}
