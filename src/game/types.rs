use super::constants::{Logo, OPEN_SOURCE_LOGOS, PROPRIETARY_LOGOS};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
  pub x: i32,
  pub y: i32,
}

impl Position {
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }

  pub fn offset(self, dx: i32, dy: i32) -> Self {
    Self {
      x: self.x + dx,
      y: self.y + dy,
    }
  }

  pub fn step(self, direction: Direction) -> Self {
    let (dx, dy) = direction.delta();
    self.offset(dx, dy)
  }
}

/// Grid heading. `Up` is negative y, matching screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Up,
  Down,
  Left,
  Right,
}

impl Direction {
  pub fn delta(self) -> (i32, i32) {
    match self {
      Direction::Up => (0, -1),
      Direction::Down => (0, 1),
      Direction::Left => (-1, 0),
      Direction::Right => (1, 0),
    }
  }

  pub fn inverse(self) -> Self {
    match self {
      Direction::Up => Direction::Down,
      Direction::Down => Direction::Up,
      Direction::Left => Direction::Right,
      Direction::Right => Direction::Left,
    }
  }

  pub fn is_horizontal(self) -> bool {
    matches!(self, Direction::Left | Direction::Right)
  }
}

/// Per-tick displacement of an active blocker. Either component may be zero,
/// and both may be non-zero for a diagonal run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Velocity {
  pub dx: i32,
  pub dy: i32,
}

impl From<Direction> for Velocity {
  fn from(direction: Direction) -> Self {
    let (dx, dy) = direction.delta();
    Self { dx, dy }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FoodKind {
  #[serde(rename = "windows")]
  NormalA,
  #[serde(rename = "googlemeet")]
  NormalB,
  #[serde(rename = "moving")]
  MovingBait,
  #[serde(rename = "reverse")]
  Reverse,
}

impl FoodKind {
  /// Proprietary kinds turn into an open-source logo when eaten.
  pub fn converts(self) -> bool {
    matches!(self, FoodKind::NormalA | FoodKind::NormalB)
  }

  pub fn logo(self) -> Option<&'static Logo> {
    match self {
      FoodKind::NormalA => Some(&PROPRIETARY_LOGOS[0]),
      FoodKind::NormalB => Some(&PROPRIETARY_LOGOS[1]),
      FoodKind::MovingBait | FoodKind::Reverse => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
  pub position: Position,
  pub kind: FoodKind,
  pub dodges_left: u32,
  pub logo: usize,
}

impl Food {
  pub fn conversion_logo(&self) -> &'static Logo {
    &OPEN_SOURCE_LOGOS[self.logo % OPEN_SOURCE_LOGOS.len()]
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blocker {
  #[default]
  Absent,
  Pending {
    position: Position,
    spawned_at: u64,
  },
  Active {
    position: Position,
    velocity: Velocity,
    spawned_at: u64,
  },
}

impl Blocker {
  pub fn position(&self) -> Option<Position> {
    match *self {
      Blocker::Absent => None,
      Blocker::Pending { position, .. } | Blocker::Active { position, .. } => Some(position),
    }
  }

  pub fn is_absent(&self) -> bool {
    matches!(self, Blocker::Absent)
  }

  #[cfg(test)]
  pub fn is_pending(&self) -> bool {
    matches!(self, Blocker::Pending { .. })
  }

  pub fn is_active(&self) -> bool {
    matches!(self, Blocker::Active { .. })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameOverCause {
  Wall,
  SelfBite,
  /// The active blocker stepped onto the head.
  Crushed,
  /// The active blocker stepped onto a body segment.
  BlockerSmash,
  /// The head ran into the blocker.
  Bonk,
}

impl GameOverCause {
  pub fn message(self) -> &'static str {
    match self {
      GameOverCause::Wall => "collided with wall",
      GameOverCause::SelfBite => "collided with itself",
      GameOverCause::Crushed => "CRUSHED!",
      GameOverCause::BlockerSmash => "BLOCKER SMASH!",
      GameOverCause::Bonk => "BONK! BLOCKER",
    }
  }

  pub fn mood(self) -> Mood {
    match self {
      GameOverCause::Wall | GameOverCause::SelfBite => Mood::Dead,
      GameOverCause::Crushed | GameOverCause::BlockerSmash | GameOverCause::Bonk => Mood::Dizzy,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Running,
  Reversed { seconds_left: u32 },
  GameOver { cause: GameOverCause },
}

impl Phase {
  pub fn is_over(&self) -> bool {
    matches!(self, Phase::GameOver { .. })
  }

  pub fn is_reversed(&self) -> bool {
    matches!(self, Phase::Reversed { .. })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
  Normal,
  Dead,
  Troll,
  Scared,
  Dizzy,
  Cool,
}

impl Mood {
  pub fn face(self) -> &'static str {
    match self {
      Mood::Normal => "\u{1F610}",
      Mood::Dead => "\u{1F480}",
      Mood::Troll => "\u{1F92A}",
      Mood::Scared => "\u{1F631}",
      Mood::Dizzy => "\u{1F635}",
      Mood::Cool => "\u{1F60E}",
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSnapshot {
  pub position: Position,
  pub kind: FoodKind,
  pub dodges_left: u32,
  pub logo_url: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockerSnapshot {
  pub position: Position,
  pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
  pub now: u64,
  pub grid_size: i32,
  pub score: u32,
  pub snake: Vec<Position>,
  pub direction: Direction,
  pub food: Option<FoodSnapshot>,
  pub blocker: Option<BlockerSnapshot>,
  pub reversed: bool,
  pub reverse_seconds_left: u32,
  pub game_over: Option<GameOverCause>,
  pub mood: Mood,
  pub face: &'static str,
}
