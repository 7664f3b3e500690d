use crate::game::constants::{BAIT_MAX_CHANCE, BLOCKER_SPAWN_CHANCE};
use crate::game::engine::GameConfig;
use std::env;

const DEFAULT_PORT: u16 = 8787;

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub port: u16,
    pub game: GameConfig,
}

impl Config {
    /// Reads `PORT`, `TROLL_SNAKE_TRAP_CHANCE`, `TROLL_SNAKE_BAIT_CHANCE` and
    /// `TROLL_SNAKE_SEED`. Missing or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let trap_chance = lookup("TROLL_SNAKE_TRAP_CHANCE")
            .and_then(|value| parse_probability(&value))
            .unwrap_or(BLOCKER_SPAWN_CHANCE);
        let bait_chance = lookup("TROLL_SNAKE_BAIT_CHANCE")
            .and_then(|value| parse_probability(&value))
            .map(|value| value.min(BAIT_MAX_CHANCE))
            .unwrap_or(0.0);
        let seed = lookup("TROLL_SNAKE_SEED").and_then(|value| value.trim().parse().ok());

        Self {
            port,
            game: GameConfig {
                trap_chance,
                bait_chance,
                seed,
            },
        }
    }
}

fn parse_probability(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(0.0, 1.0))
}
