//! A single-screen dungeon demo: a click-to-move hero, patrolling enemies
//! and a menu, all driven one logical frame at a time.

pub mod backend;
pub mod config;
pub mod entity;
pub mod game;
pub mod platform;
pub mod timing;

pub use config::GameConfig;
pub use game::{Game, GameMode};
