use std::collections::HashMap;

use anyhow::{anyhow, Result};
use macroquad::audio::{load_sound, play_sound, play_sound_once, stop_sound, PlaySoundParams, Sound};
use macroquad::color::colors::{BLUE, DARKGRAY, MAROON, WHITE};
use macroquad::color::Color;
use macroquad::math::{Rect, Vec2};
use macroquad::shapes::draw_rectangle;
use macroquad::text::{draw_text, measure_text};
use macroquad::texture::{draw_texture_ex, load_texture, DrawTextureParams, FilterMode, Texture2D};

use crate::config::{HEIGHT, TILE_SIZE, WIDTH};
use crate::entity::{ENEMY_ANIMATIONS, HERO_ANIMATIONS};
use crate::platform::{Audio, ImageId, MusicTrack, Renderer, SoundEffect};

const BACKGROUNDS: [ImageId; 2] = ["menu_bg", "dungeon"];

/// Every image the game can ask for, without duplicates.
pub fn image_ids() -> Vec<ImageId> {
    let mut ids: Vec<ImageId> = Vec::new();
    let frames = [HERO_ANIMATIONS, ENEMY_ANIMATIONS]
        .into_iter()
        .flat_map(|set| set.idle.iter().chain(set.walk.iter()).copied());
    for id in BACKGROUNDS.into_iter().chain(frames) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Draws and plays through macroquad. Missing assets are logged at load
/// time and replaced by plain boxes or silence.
pub struct MacroquadBackend {
    textures: HashMap<ImageId, Texture2D>,
    effects: HashMap<SoundEffect, Sound>,
    music: HashMap<MusicTrack, Sound>,
    playing: Option<MusicTrack>,
}

impl MacroquadBackend {
    pub async fn load(asset_dir: &str) -> Self {
        tracing::info!(asset_dir, "loading assets");

        let mut textures = HashMap::new();
        for id in image_ids() {
            match load_texture_asset(&format!("{asset_dir}/images/{id}.png")).await {
                Ok(texture) => {
                    textures.insert(id, texture);
                }
                Err(e) => tracing::warn!(image = id, error = %e, "using placeholder"),
            }
        }

        let mut effects = HashMap::new();
        for effect in SoundEffect::ALL {
            let path = format!("{asset_dir}/sounds/{}.ogg", effect.name());
            match load_sound_asset(&path).await {
                Ok(sound) => {
                    effects.insert(effect, sound);
                }
                Err(e) => tracing::warn!(effect = effect.name(), error = %e, "effect will be silent"),
            }
        }

        let mut music = HashMap::new();
        for track in MusicTrack::ALL {
            let path = format!("{asset_dir}/music/{}.ogg", track.name());
            match load_sound_asset(&path).await {
                Ok(sound) => {
                    music.insert(track, sound);
                }
                Err(e) => tracing::warn!(track = track.name(), error = %e, "music will be silent"),
            }
        }

        tracing::info!(
            textures = textures.len(),
            effects = effects.len(),
            music = music.len(),
            "assets loaded"
        );

        Self {
            textures,
            effects,
            music,
            playing: None,
        }
    }
}

async fn load_texture_asset(path: &str) -> Result<Texture2D> {
    let texture = load_texture(path)
        .await
        .map_err(|e| anyhow!("failed to load texture {path}: {e}"))?;
    texture.set_filter(FilterMode::Nearest);
    Ok(texture)
}

async fn load_sound_asset(path: &str) -> Result<Sound> {
    load_sound(path)
        .await
        .map_err(|e| anyhow!("failed to load sound {path}: {e}"))
}

fn placeholder_color(image: ImageId) -> Color {
    if image.starts_with("player") {
        BLUE
    } else if image.starts_with("enemy") {
        MAROON
    } else {
        DARKGRAY
    }
}

impl Renderer for MacroquadBackend {
    fn blit(&mut self, image: ImageId, position: Vec2, flip_x: bool) {
        if let Some(texture) = self.textures.get(image) {
            draw_texture_ex(
                texture,
                position.x,
                position.y,
                WHITE,
                DrawTextureParams {
                    flip_x,
                    ..Default::default()
                },
            );
            return;
        }

        let color = placeholder_color(image);
        if BACKGROUNDS.contains(&image) {
            draw_rectangle(0.0, 0.0, WIDTH, HEIGHT, color);
        } else {
            draw_rectangle(position.x, position.y, TILE_SIZE, TILE_SIZE, color);
        }
    }

    fn filled_rect(&mut self, rect: Rect, color: Color) {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, color);
    }

    fn text(&mut self, text: &str, center: Vec2, font_size: f32) {
        let dims = measure_text(text, None, font_size as u16, 1.0);
        draw_text(
            text,
            center.x - dims.width / 2.0,
            center.y - dims.height / 2.0 + dims.offset_y,
            font_size,
            WHITE,
        );
    }
}

impl Audio for MacroquadBackend {
    fn play_music(&mut self, track: MusicTrack) {
        self.stop_music();
        if let Some(sound) = self.music.get(&track) {
            play_sound(
                sound,
                PlaySoundParams {
                    looped: true,
                    volume: 1.0,
                },
            );
        }
        self.playing = Some(track);
    }

    fn stop_music(&mut self) {
        if let Some(sound) = self.playing.take().and_then(|track| self.music.get(&track)) {
            stop_sound(sound);
        }
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        if let Some(sound) = self.effects.get(&effect) {
            play_sound_once(sound);
        }
    }
}
