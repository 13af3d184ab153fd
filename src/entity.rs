use macroquad::math::{vec2, Vec2};
use rand::Rng;

use crate::config::{GameConfig, TILE_SIZE};
use crate::platform::{ImageId, Renderer};

// ==================== Animation ====================

/// Which way an entity last moved. Only ever set from movement deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    Idle,
    Walk,
}

/// Frame lists per animation, fixed per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSet {
    pub idle: &'static [ImageId],
    pub walk: &'static [ImageId],
}

impl AnimationSet {
    pub fn frames(&self, animation: Animation) -> &'static [ImageId] {
        match animation {
            Animation::Idle => self.idle,
            Animation::Walk => self.walk,
        }
    }
}

pub const HERO_ANIMATIONS: AnimationSet = AnimationSet {
    idle: &["player_stand", "player_stand"],
    walk: &["player_walk1", "player_walk2", "player_walk3", "player_walk4"],
};

pub const ENEMY_ANIMATIONS: AnimationSet = AnimationSet {
    idle: &["enemy_stand", "enemy_stand"],
    walk: &["enemy_walk1", "enemy_walk2", "enemy_walk3", "enemy_walk4"],
};

// ==================== Patrol ====================

pub const PATROL_POINTS: usize = 4;

/// A closed loop of four waypoints rolled once at spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Patrol {
    waypoints: [Vec2; PATROL_POINTS],
    index: usize,
    chance: f64,
}

impl Patrol {
    /// Spawn point, then east, south-east and south of it by 2-5 tiles each.
    pub fn generate<R: Rng + ?Sized>(spawn: Vec2, chance: f64, rng: &mut R) -> Self {
        let mut tiles = || rng.gen_range(2..=5) as f32 * TILE_SIZE;
        let east = tiles();
        let corner_x = tiles();
        let corner_y = tiles();
        let south = tiles();

        Self {
            waypoints: [
                spawn,
                spawn + vec2(east, 0.0),
                spawn + vec2(corner_x, corner_y),
                spawn + vec2(0.0, south),
            ],
            index: 0,
            chance,
        }
    }

    pub fn waypoints(&self) -> &[Vec2; PATROL_POINTS] {
        &self.waypoints
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves on to the next waypoint and returns it.
    pub fn advance(&mut self) -> Vec2 {
        self.index = (self.index + 1) % PATROL_POINTS;
        self.waypoints[self.index]
    }
}

/// What drives an entity besides its own movement.
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    /// Moves only when the game forwards a click.
    PlayerControlled,
    Patrol(Patrol),
}

// ==================== Entity ====================

#[derive(Debug, Clone)]
pub struct Entity {
    pub position: Vec2,
    pub target: Vec2,
    pub speed: f32,
    pub moving: bool,
    pub animation: Animation,
    pub direction: Direction,
    pub frame: f32,
    pub animation_speed: f32,
    pub animations: AnimationSet,
    pub behavior: Behavior,
    // Where the current move began and how far along it the entity is.
    origin: Vec2,
    walked: f32,
}

impl Entity {
    pub fn new(
        position: Vec2,
        speed: f32,
        animation_speed: f32,
        animations: AnimationSet,
        behavior: Behavior,
    ) -> Self {
        Self {
            position,
            target: position,
            speed,
            moving: false,
            animation: Animation::Idle,
            direction: Direction::Right,
            frame: 0.0,
            animation_speed,
            animations,
            behavior,
            origin: position,
            walked: 0.0,
        }
    }

    pub fn hero(position: Vec2, config: &GameConfig) -> Self {
        Self::new(
            position,
            config.hero_speed,
            config.animation_speed,
            HERO_ANIMATIONS,
            Behavior::PlayerControlled,
        )
    }

    pub fn enemy<R: Rng + ?Sized>(position: Vec2, config: &GameConfig, rng: &mut R) -> Self {
        let patrol = Patrol::generate(position, config.patrol_chance, rng);
        Self::new(
            position,
            config.enemy_speed,
            config.animation_speed,
            ENEMY_ANIMATIONS,
            Behavior::Patrol(patrol),
        )
    }

    pub fn patrol(&self) -> Option<&Patrol> {
        match &self.behavior {
            Behavior::Patrol(patrol) => Some(patrol),
            Behavior::PlayerControlled => None,
        }
    }

    /// One logical frame: animation, movement, then patrol decisions.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.advance_frame();
        if self.moving {
            self.step_toward_target();
        }

        let next = match &mut self.behavior {
            Behavior::Patrol(patrol) if !self.moving && rng.gen_bool(patrol.chance) => {
                Some(patrol.advance())
            }
            _ => None,
        };
        if let Some(waypoint) = next {
            tracing::debug!(x = waypoint.x, y = waypoint.y, "enemy heading to next waypoint");
            self.move_to(waypoint);
        }
    }

    pub fn move_to(&mut self, target: Vec2) {
        self.target = target;
        self.origin = self.position;
        self.walked = 0.0;
        self.moving = true;
        self.set_animation(Animation::Walk);
    }

    pub fn frame_count(&self) -> usize {
        self.animations.frames(self.animation).len()
    }

    pub fn current_image(&self) -> ImageId {
        let frames = self.animations.frames(self.animation);
        frames[(self.frame as usize).min(frames.len() - 1)]
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let half_tile = Vec2::splat(TILE_SIZE / 2.0);
        renderer.blit(
            self.current_image(),
            self.position - half_tile,
            self.direction == Direction::Left,
        );
    }

    fn advance_frame(&mut self) {
        self.frame += self.animation_speed;
        if self.frame >= self.frame_count() as f32 {
            self.frame = 0.0;
        }
    }

    // Position is always `origin` plus `walked` along the path, never summed
    // from earlier steps.
    fn step_toward_target(&mut self) {
        let path = self.target - self.origin;
        let length = path.length();
        let remaining = length - self.walked;

        if remaining <= self.speed {
            self.position = self.target;
            self.moving = false;
            self.set_animation(Animation::Idle);
            return;
        }

        let delta = self.target - self.position;
        self.walked += self.speed;
        self.position = self.origin + path / length * self.walked;
        self.direction = if delta.x.abs() >= delta.y.abs() {
            if delta.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
    }

    // Frame counter restarts so it is always valid for the new frame list.
    fn set_animation(&mut self, animation: Animation) {
        self.animation = animation;
        self.frame = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_hero_creation() {
        let hero = Entity::hero(vec2(400.0, 300.0), &GameConfig::default());
        assert_eq!(hero.speed, 2.0);
        assert_eq!(hero.target, hero.position);
        assert!(!hero.moving);
        assert_eq!(hero.animation, Animation::Idle);
        assert_eq!(hero.direction, Direction::Right);
        assert!(hero.patrol().is_none());
    }

    #[test]
    fn test_animation_speed_comes_from_config() {
        let config = GameConfig {
            animation_speed: 0.25,
            ..GameConfig::default()
        };
        let hero = Entity::hero(vec2(0.0, 0.0), &config);
        let enemy = Entity::enemy(vec2(64.0, 64.0), &config, &mut rng());
        assert_eq!(hero.animation_speed, 0.25);
        assert_eq!(enemy.animation_speed, 0.25);
    }

    #[test]
    fn test_move_to_starts_walking() {
        let mut hero = Entity::hero(vec2(0.0, 0.0), &GameConfig::default());
        hero.move_to(vec2(10.0, 0.0));
        assert!(hero.moving);
        assert_eq!(hero.animation, Animation::Walk);
        assert_eq!(hero.target, vec2(10.0, 0.0));
    }

    #[test]
    fn test_reaches_target_and_idles() {
        let mut rng = rng();
        let mut hero = Entity::hero(vec2(0.0, 0.0), &GameConfig::default());
        hero.move_to(vec2(3.0, 4.0));

        hero.update(&mut rng);
        assert!(hero.moving);
        hero.update(&mut rng);
        hero.update(&mut rng);

        assert!(!hero.moving);
        assert_eq!(hero.position, vec2(3.0, 4.0));
        assert_eq!(hero.animation, Animation::Idle);
    }

    fn steps_to_arrive(from: Vec2, to: Vec2, speed: f32) -> Option<usize> {
        let config = GameConfig {
            hero_speed: speed,
            ..GameConfig::default()
        };
        let mut rng = rng();
        let mut hero = Entity::hero(from, &config);
        hero.move_to(to);
        let budget = (from.distance(to) / speed).ceil() as usize;
        for step in 1..=budget.max(1) {
            hero.update(&mut rng);
            if !hero.moving {
                return (hero.position == to).then_some(step);
            }
        }
        None
    }

    #[test]
    fn test_exact_multiples_arrive_on_time() {
        for k in 1..=60 {
            let k = k as f32;
            for (to, speed) in [
                (vec2(6.0 * k, 8.0 * k), 2.0),
                (vec2(2.0 * k, 0.0), 2.0),
                (vec2(0.0, -2.0 * k), 2.0),
                (vec2(-3.0 * k, 4.0 * k), 1.0),
            ] {
                let from = vec2(0.0, 0.0);
                let expected = (from.distance(to) / speed).ceil() as usize;
                assert_eq!(steps_to_arrive(from, to, speed), Some(expected), "to {to:?}");
            }
        }
    }

    #[test]
    fn test_every_tile_center_reached_from_spawn() {
        let spawn = vec2(400.0, 300.0);
        for col in 0..12 {
            for row in 0..9 {
                let to = vec2(col as f32, row as f32) * TILE_SIZE + Vec2::splat(TILE_SIZE / 2.0);
                assert!(
                    steps_to_arrive(spawn, to, 2.0).is_some(),
                    "late arriving at {to:?}"
                );
            }
        }
    }

    #[test]
    fn test_distance_shrinks_every_step() {
        let mut rng = rng();
        let mut hero = Entity::hero(vec2(400.0, 300.0), &GameConfig::default());
        let target = vec2(672.0, 96.0);
        hero.move_to(target);
        let mut last = hero.position.distance(target);
        while hero.moving {
            hero.update(&mut rng);
            let now = hero.position.distance(target);
            assert!(now < last);
            last = now;
        }
        assert_eq!(hero.position, target);
    }

    #[test]
    fn test_direction_follows_dominant_axis() {
        let mut rng = rng();
        let config = GameConfig::default();

        let mut hero = Entity::hero(vec2(100.0, 100.0), &config);
        hero.move_to(vec2(0.0, 90.0));
        hero.update(&mut rng);
        assert_eq!(hero.direction, Direction::Left);

        hero.move_to(vec2(hero.position.x, 0.0));
        hero.update(&mut rng);
        assert_eq!(hero.direction, Direction::Up);

        hero.move_to(hero.position + vec2(0.0, 50.0));
        hero.update(&mut rng);
        assert_eq!(hero.direction, Direction::Down);
    }

    #[test]
    fn test_diagonal_tie_faces_horizontally() {
        let mut hero = Entity::hero(vec2(0.0, 0.0), &GameConfig::default());
        hero.move_to(vec2(-20.0, 20.0));
        hero.update(&mut rng());
        assert_eq!(hero.direction, Direction::Left);
    }

    #[test]
    fn test_left_facing_draw_is_mirrored() {
        #[derive(Default)]
        struct Capture(Vec<(ImageId, Vec2, bool)>);

        impl Renderer for Capture {
            fn blit(&mut self, image: ImageId, position: Vec2, flip_x: bool) {
                self.0.push((image, position, flip_x));
            }
            fn filled_rect(&mut self, _: macroquad::math::Rect, _: macroquad::color::Color) {}
            fn text(&mut self, _: &str, _: Vec2, _: f32) {}
        }

        let mut hero = Entity::hero(vec2(96.0, 96.0), &GameConfig::default());
        let mut capture = Capture::default();
        hero.draw(&mut capture);
        hero.direction = Direction::Left;
        hero.draw(&mut capture);

        assert_eq!(capture.0[0], ("player_stand", vec2(64.0, 64.0), false));
        assert_eq!(capture.0[1], ("player_stand", vec2(64.0, 64.0), true));
        assert_eq!(HERO_ANIMATIONS.idle[0], "player_stand");
    }

    #[test]
    fn test_walk_frames_cycle() {
        let mut rng = rng();
        let mut hero = Entity::hero(vec2(0.0, 0.0), &GameConfig::default());
        hero.move_to(vec2(1000.0, 0.0));

        let mut seen = Vec::new();
        for _ in 0..40 {
            hero.update(&mut rng);
            let image = hero.current_image();
            if seen.last() != Some(&image) {
                seen.push(image);
            }
        }
        assert!(seen.starts_with(&["player_walk1", "player_walk2", "player_walk3", "player_walk4"]));
    }

    #[test]
    fn test_patrol_layout() {
        let spawn = vec2(128.0, 128.0);
        let patrol = Patrol::generate(spawn, 0.01, &mut rng());
        let points = patrol.waypoints();

        assert_eq!(points[0], spawn);
        assert_eq!(points[1].y, spawn.y);
        assert_eq!(points[3].x, spawn.x);
        for offset in [
            points[1].x - spawn.x,
            points[2].x - spawn.x,
            points[2].y - spawn.y,
            points[3].y - spawn.y,
        ] {
            let tiles = offset / TILE_SIZE;
            assert_eq!(tiles.fract(), 0.0);
            assert!((2.0..=5.0).contains(&tiles), "offset of {tiles} tiles");
        }
    }

    #[test]
    fn test_patrol_advance_wraps() {
        let mut patrol = Patrol::generate(vec2(64.0, 64.0), 0.01, &mut rng());
        let first = patrol.waypoints()[0];
        for expected in [1, 2, 3, 0, 1] {
            patrol.advance();
            assert_eq!(patrol.index(), expected);
        }
        patrol.advance();
        patrol.advance();
        patrol.advance();
        assert_eq!(patrol.index(), 0);
        assert_eq!(patrol.waypoints()[patrol.index()], first);
    }

    #[test]
    fn test_certain_patrol_moves_immediately() {
        let config = GameConfig {
            patrol_chance: 1.0,
            ..GameConfig::default()
        };
        let mut enemy = Entity::enemy(vec2(128.0, 128.0), &config, &mut rng());
        let waypoint = enemy.patrol().map(|p| p.waypoints()[1]);

        enemy.update(&mut rng());

        assert!(enemy.moving);
        assert_eq!(enemy.patrol().map(Patrol::index), Some(1));
        assert_eq!(Some(enemy.target), waypoint);
    }

    #[test]
    fn test_never_patrolling_enemy_stays_put() {
        let config = GameConfig {
            patrol_chance: 0.0,
            ..GameConfig::default()
        };
        let mut rng = rng();
        let mut enemy = Entity::enemy(vec2(128.0, 128.0), &config, &mut rng);
        for _ in 0..500 {
            enemy.update(&mut rng);
        }
        assert!(!enemy.moving);
        assert_eq!(enemy.position, vec2(128.0, 128.0));
        assert_eq!(enemy.patrol().map(Patrol::index), Some(0));
    }
}
