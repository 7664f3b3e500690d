use super::constants::{BAIT_RUSH_CHANCE, BAIT_TRIGGER_DISTANCE};
use super::grid::{clamp_to_grid, in_bounds, manhattan_distance, occupied_by_snake};
use super::types::{Direction, Food, FoodKind, Position, Velocity};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dodge {
  /// Feint one cell toward the head on both axes.
  Rush,
  /// Step one cell away from the head on a single axis.
  Sidestep,
}

/// Moves bait food away from (or, rarely, toward) a nearby head.
/// Returns `None` when the bait does not react this tick.
pub fn evade<R: Rng + ?Sized>(head: Position, food: &Food, rng: &mut R) -> Option<(Food, Dodge)> {
  if food.kind != FoodKind::MovingBait || food.dodges_left == 0 {
    return None;
  }
  if manhattan_distance(head, food.position) >= BAIT_TRIGGER_DISTANCE {
    return None;
  }

  let current = food.position;
  let (moved, dodge) = if rng.gen_bool(BAIT_RUSH_CHANCE) {
    let toward = current.offset(-(current.x - head.x).signum(), -(current.y - head.y).signum());
    (toward, Dodge::Rush)
  } else {
    let away = if rng.gen_bool(0.5) {
      current.offset(if head.x < current.x { 1 } else { -1 }, 0)
    } else {
      current.offset(0, if head.y < current.y { 1 } else { -1 })
    };
    (away, Dodge::Sidestep)
  };

  Some((
    Food {
      position: clamp_to_grid(moved),
      dodges_left: food.dodges_left - 1,
      ..*food
    },
    dodge,
  ))
}

/// Velocity fixed at activation: from the spawn cell toward the head, or the
/// snake's heading when the head sits on the spawn cell.
pub fn blocker_velocity(head: Position, spawn: Position, heading: Direction) -> Velocity {
  let dx = (head.x - spawn.x).signum();
  let dy = (head.y - spawn.y).signum();
  if dx == 0 && dy == 0 {
    return Velocity::from(heading);
  }
  Velocity { dx, dy }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockerStep {
  LeftGrid,
  Crushed(Position),
  Smashed(Position),
  AteFood(Position),
  Moved(Position),
}

pub fn step_blocker(
  position: Position,
  velocity: Velocity,
  snake: &[Position],
  food: Option<Position>,
) -> BlockerStep {
  let next = position.offset(velocity.dx, velocity.dy);
  if !in_bounds(next) {
    return BlockerStep::LeftGrid;
  }
  if snake.first() == Some(&next) {
    return BlockerStep::Crushed(next);
  }
  if occupied_by_snake(next, snake) {
    return BlockerStep::Smashed(next);
  }
  if food == Some(next) {
    return BlockerStep::AteFood(next);
  }
  BlockerStep::Moved(next)
}
