//! Seams between the game rules and whatever draws pixels and plays sound.
//!
//! `Game` never touches a window or an audio device; the host hands it a
//! `Renderer` for drawing and an `Audio` sink for music and effects.

use macroquad::color::Color;
use macroquad::math::{Rect, Vec2};

/// Name of an image asset, e.g. `"player_walk1"`.
pub type ImageId = &'static str;

/// One-shot sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Step,
    Lose,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 2] = [SoundEffect::Step, SoundEffect::Lose];

    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::Step => "step",
            SoundEffect::Lose => "lose",
        }
    }
}

/// Looping background tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicTrack {
    Theme,
}

impl MusicTrack {
    pub const ALL: [MusicTrack; 1] = [MusicTrack::Theme];

    pub fn name(self) -> &'static str {
        match self {
            MusicTrack::Theme => "theme",
        }
    }
}

/// What the host loop should do after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub trait Renderer {
    /// Draws an image with its top-left corner at `position`. `flip_x`
    /// mirrors it horizontally without touching the loaded asset.
    fn blit(&mut self, image: ImageId, position: Vec2, flip_x: bool);

    fn filled_rect(&mut self, rect: Rect, color: Color);

    /// Draws `text` centred on `center`.
    fn text(&mut self, text: &str, center: Vec2, font_size: f32);
}

pub trait Audio {
    fn play_music(&mut self, track: MusicTrack);
    fn stop_music(&mut self);
    fn play_sound(&mut self, effect: SoundEffect);
}
