use super::adversary::Dodge;
use super::types::{FoodKind, GameOverCause, Position, Velocity};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TrapClearReason {
  LeftGrid,
  GaveUp,
}

/// Things the front end animates. The engine never waits on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
  BaitDodged {
    position: Position,
    dodge: Dodge,
    #[serde(rename = "dodgesLeft")]
    dodges_left: u32,
  },
  TrapSpawned {
    position: Position,
  },
  TrapActivated {
    position: Position,
    velocity: Velocity,
  },
  TrapExpired,
  TrapCleared {
    reason: TrapClearReason,
  },
  TrapAteFood {
    position: Position,
  },
  FoodEaten {
    position: Position,
    kind: FoodKind,
    score: u32,
  },
  Converted {
    position: Position,
    name: &'static str,
    url: &'static str,
  },
  ReverseStarted {
    seconds: u32,
  },
  ReverseTick {
    #[serde(rename = "secondsLeft")]
    seconds_left: u32,
  },
  ControlsRestored,
  GameOver {
    cause: GameOverCause,
    score: u32,
  },
  Reset,
}

impl GameEvent {
  pub fn banner(&self) -> Option<&'static str> {
    match self {
      GameEvent::BaitDodged {
        dodge: Dodge::Rush, ..
      } => Some("WAIT NO!"),
      GameEvent::BaitDodged { .. } => Some("TOO SLOW!"),
      GameEvent::TrapSpawned { .. } => Some("TRAP SPAWNED"),
      GameEvent::Converted { .. } => Some("SWITCHED TO OPEN SOURCE!"),
      GameEvent::ReverseStarted { .. } => Some("BRAIN DAMAGE!"),
      GameEvent::ControlsRestored => Some("CONTROLS RESTORED"),
      GameEvent::GameOver { cause, .. } => match cause {
        GameOverCause::Wall | GameOverCause::SelfBite => None,
        _ => Some(cause.message()),
      },
      _ => None,
    }
  }

  pub fn shakes_screen(&self) -> bool {
    matches!(
      self,
      GameEvent::TrapSpawned { .. } | GameEvent::ReverseStarted { .. } | GameEvent::GameOver { .. }
    )
  }
}
