//! Headless host: scripted input, kinematics and collision-enter delivery.

use std::error::Error;
use std::fmt;

use crate::config::{ConfigError, GameConfig};
use crate::game::{Game, GameStats};
use crate::host::{ContactTracker, Key, ObjectRegistry, ScriptedInput};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub keys: Vec<Key>,
    pub frames: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ScriptError {
    UnknownAction(String),
    BadCount(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::UnknownAction(a) => write!(f, "unknown script action '{}'", a),
            ScriptError::BadCount(c) => write!(f, "bad frame count '{}'", c),
        }
    }
}

impl Error for ScriptError {}

/// Parses `right:120,left:60,jump,idle:30`. Actions combine with `+`
/// (`right+jump:10`); a missing count means one frame.
pub fn parse_script(s: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (actions, count) = match token.split_once(':') {
            Some((a, c)) => {
                let frames = c
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ScriptError::BadCount(c.to_string()))?;
                (a, frames)
            }
            None => (token, 1),
        };
        let mut keys = Vec::new();
        for action in actions.split('+').map(str::trim) {
            match action.to_ascii_lowercase().as_str() {
                "right" => keys.push(Key::Right),
                "left" => keys.push(Key::Left),
                "jump" => keys.push(Key::Space),
                "both" => keys.extend([Key::Left, Key::Right]),
                "idle" => {}
                _ => return Err(ScriptError::UnknownAction(action.to_string())),
            }
        }
        steps.push(Step {
            keys,
            frames: count,
        });
    }
    Ok(steps)
}

#[derive(Clone, Debug)]
pub struct SimReport {
    pub frames: u64,
    pub avatar_x: f32,
    pub avatar_y: f32,
    pub energy: f32,
    pub window: (f32, f32),
    pub bounds: (f32, f32),
    pub live_trees: usize,
    pub stashed_trees: usize,
    pub live_columns: usize,
    pub rain_drops: usize,
    pub objects: usize,
    pub stats: GameStats,
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames={} avatar=({:.1}, {:.1}) energy={} window=[{}, {}] bounds=[{}, {}] \
             trees={} stashed={} columns={} drops={} objects={} shifts={} (frontier {}) \
             jumps={} fruit={}",
            self.frames,
            self.avatar_x,
            self.avatar_y,
            self.energy,
            self.window.0,
            self.window.1,
            self.bounds.0,
            self.bounds.1,
            self.live_trees,
            self.stashed_trees,
            self.live_columns,
            self.rain_drops,
            self.objects,
            self.stats.shifts,
            self.stats.frontier_shifts,
            self.stats.jumps,
            self.stats.fruits_eaten
        )
    }
}

pub struct Sim {
    game: Game<ObjectRegistry, ScriptedInput>,
    contacts: ContactTracker,
    dt: f32,
}

impl Sim {
    pub fn new(config: GameConfig, dt: f32) -> Result<Self, ConfigError> {
        let game = Game::new(config, ObjectRegistry::new(), ScriptedInput::new())?;
        Ok(Self {
            game,
            contacts: ContactTracker::default(),
            dt,
        })
    }

    /// Runs one frame with `keys` held.
    pub fn step(&mut self, keys: &[Key]) {
        let dt = self.dt;
        self.game.input_mut().set_held(keys);
        self.game.update(dt);
        self.game.avatar_mut().integrate(dt);

        let body = self.game.avatar_id();
        let bounds = self.game.avatar().bounds();
        let entered = self.contacts.entered(self.game.registry(), body, &bounds);
        for other in entered {
            self.game.on_collision_enter(other);
        }
        self.game.sync_avatar();
        self.game.stream();
        let bounds = self.game.avatar().bounds();
        self.contacts.settle(self.game.registry(), body, &bounds);
    }

    pub fn run(&mut self, script: &[Step]) {
        for step in script {
            for _ in 0..step.frames {
                self.step(&step.keys);
            }
        }
    }

    pub fn game(&self) -> &Game<ObjectRegistry, ScriptedInput> {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game<ObjectRegistry, ScriptedInput> {
        &mut self.game
    }

    pub fn report(&self) -> SimReport {
        let g = &self.game;
        let window = g.window();
        let bounds = g.historical_bounds();
        SimReport {
            frames: g.stats().frames,
            avatar_x: g.avatar().position().x,
            avatar_y: g.avatar().position().y,
            energy: g.avatar().energy(),
            window: (window.min, window.max),
            bounds: (bounds.min(), bounds.max()),
            live_trees: g.world().flora().len(),
            stashed_trees: g.world().stash().len(),
            live_columns: g.world().terrain().len(),
            rain_drops: g.rain().len(),
            objects: g.registry().len(),
            stats: g.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_counts_and_combos() {
        let steps = parse_script("right:120, left:60,jump,idle:30,right+jump:2,both").unwrap();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[0], Step { keys: vec![Key::Right], frames: 120 });
        assert_eq!(steps[2], Step { keys: vec![Key::Space], frames: 1 });
        assert_eq!(steps[3], Step { keys: vec![], frames: 30 });
        assert_eq!(steps[4].keys, vec![Key::Right, Key::Space]);
        assert_eq!(steps[5].keys, vec![Key::Left, Key::Right]);
    }

    #[test]
    fn empty_script_is_empty() {
        assert!(parse_script("").unwrap().is_empty());
        assert!(parse_script(" , ").unwrap().is_empty());
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_script("fly:3"),
            Err(ScriptError::UnknownAction("fly".into()))
        );
        assert_eq!(
            parse_script("left:x"),
            Err(ScriptError::BadCount("x".into()))
        );
    }
}
