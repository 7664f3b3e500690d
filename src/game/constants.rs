use super::types::{Direction, Position};

pub const GRID_SIZE: i32 = 20;
pub const TICK_MS: u64 = 100;
pub const REVERSE_DURATION_SECS: u32 = 10;
pub const REVERSE_COUNTDOWN_MS: u64 = 1000;
pub const BLOCKER_ACTIVATE_MS: u64 = 300;
pub const BLOCKER_LIFETIME_MS: u64 = 4000;
pub const BLOCKER_SPAWN_CHANCE: f64 = 0.45;
pub const BLOCKER_MIN_FOOD_DISTANCE: i32 = 3;
pub const BLOCKER_MAX_FOOD_DISTANCE: i32 = 9;
pub const BLOCKER_GIVE_UP_DISTANCE: i32 = 8;
pub const BAIT_TRIGGER_DISTANCE: i32 = 4;
pub const BAIT_RUSH_CHANCE: f64 = 0.1;
pub const BAIT_MAX_DODGES: u32 = 3;
pub const BAIT_MAX_CHANCE: f64 = 0.3;
pub const NORMAL_A_THRESHOLD: f64 = 0.5;
pub const NORMAL_B_THRESHOLD: f64 = 0.8;
pub const MAX_SPAWN_ATTEMPTS: usize = 64;

pub const INITIAL_HEAD: Position = Position { x: 10, y: 10 };
pub const INITIAL_DIRECTION: Direction = Direction::Right;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logo {
  pub name: &'static str,
  pub url: &'static str,
}

pub const PROPRIETARY_LOGOS: [Logo; 2] = [
  Logo {
    name: "windows",
    url: "https://upload.wikimedia.org/wikipedia/commons/2/2f/Google_2015_logo.svg",
  },
  Logo {
    name: "googlemeet",
    url: "https://upload.wikimedia.org/wikipedia/commons/9/9b/Google_Meet_icon_%282020%29.svg",
  },
];

pub const OPEN_SOURCE_LOGOS: [Logo; 2] = [
  Logo {
    name: "Linux",
    url: "https://upload.wikimedia.org/wikipedia/commons/thumb/3/35/Tux.svg/1200px-Tux.svg.png",
  },
  Logo {
    name: "Firefox",
    url: "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a0/Firefox_logo%2C_2019.svg/1200px-Firefox_logo%2C_2019.svg.png",
  },
];
