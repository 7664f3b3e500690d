use super::constants::{
  BAIT_MAX_CHANCE, BAIT_MAX_DODGES, BLOCKER_MAX_FOOD_DISTANCE, BLOCKER_MIN_FOOD_DISTANCE,
  GRID_SIZE, MAX_SPAWN_ATTEMPTS, NORMAL_A_THRESHOLD, NORMAL_B_THRESHOLD, OPEN_SOURCE_LOGOS,
};
use super::grid::{all_cells, cell_count, manhattan_distance, occupied_by_snake};
use super::types::{Blocker, Direction, Food, FoodKind, Position};
use rand::seq::SliceRandom;
use rand::Rng;

/// Maps one uniform draw in `[0, 1)` to a food kind.
///
/// With `bait_chance == 0` this is the plain 50/30/20 split between the two
/// proprietary kinds and reverse food. A positive bait chance carves the bait
/// band out of the top of the `NormalB` band, so reverse food keeps its share.
pub fn food_kind_from_roll(roll: f64, bait_chance: f64) -> FoodKind {
  let bait_chance = bait_chance.clamp(0.0, BAIT_MAX_CHANCE);
  if roll <= NORMAL_A_THRESHOLD {
    FoodKind::NormalA
  } else if roll <= NORMAL_B_THRESHOLD - bait_chance {
    FoodKind::NormalB
  } else if roll <= NORMAL_B_THRESHOLD {
    FoodKind::MovingBait
  } else {
    FoodKind::Reverse
  }
}

/// Picks a free cell by rejection sampling, falling back to a scan of the
/// free cells once the board is crowded. `None` means the snake fills the grid.
pub fn random_free_cell<R: Rng + ?Sized>(snake: &[Position], rng: &mut R) -> Option<Position> {
  if snake.len() >= cell_count() {
    return None;
  }
  for _ in 0..MAX_SPAWN_ATTEMPTS {
    let candidate = Position::new(rng.gen_range(0..GRID_SIZE), rng.gen_range(0..GRID_SIZE));
    if !occupied_by_snake(candidate, snake) {
      return Some(candidate);
    }
  }

  let free: Vec<Position> = all_cells()
    .filter(|cell| !occupied_by_snake(*cell, snake))
    .collect();
  free.choose(rng).copied()
}

pub fn spawn_food<R: Rng + ?Sized>(snake: &[Position], bait_chance: f64, rng: &mut R) -> Option<Food> {
  let position = random_free_cell(snake, rng)?;
  let kind = food_kind_from_roll(rng.gen::<f64>(), bait_chance);
  let logo = rng.gen_range(0..OPEN_SOURCE_LOGOS.len());
  let dodges_left = if kind == FoodKind::MovingBait {
    rng.gen_range(1..=BAIT_MAX_DODGES)
  } else {
    0
  };
  Some(Food {
    position,
    kind,
    dodges_left,
    logo,
  })
}

/// True when the food shares a row or column with the head along the axis the
/// snake is travelling, at a distance where a trap is worth springing.
pub fn blocker_trigger(head: Position, food: Position, direction: Direction) -> bool {
  let aligned = if direction.is_horizontal() {
    food.y == head.y
  } else {
    food.x == head.x
  };
  let distance = manhattan_distance(head, food);
  aligned && (BLOCKER_MIN_FOOD_DISTANCE..=BLOCKER_MAX_FOOD_DISTANCE).contains(&distance)
}

pub fn maybe_spawn_blocker<R: Rng + ?Sized>(
  head: Position,
  food: Position,
  direction: Direction,
  existing: &Blocker,
  chance: f64,
  now: u64,
  rng: &mut R,
) -> Option<Blocker> {
  if !existing.is_absent() || !blocker_trigger(head, food, direction) {
    return None;
  }
  if !rng.gen_bool(chance.clamp(0.0, 1.0)) {
    return None;
  }
  Some(Blocker::Pending {
    position: food,
    spawned_at: now,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::grid::in_bounds;
  use rand::rngs::mock::StepRng;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn low_rng() -> StepRng {
    StepRng::new(0, 0)
  }

  fn high_rng() -> StepRng {
    StepRng::new(u64::MAX, 0)
  }

  #[test]
  fn roll_thresholds_follow_the_half_and_eighty_percent_split() {
    assert_eq!(food_kind_from_roll(0.0, 0.0), FoodKind::NormalA);
    assert_eq!(food_kind_from_roll(0.5, 0.0), FoodKind::NormalA);
    assert_eq!(food_kind_from_roll(0.500_1, 0.0), FoodKind::NormalB);
    assert_eq!(food_kind_from_roll(0.8, 0.0), FoodKind::NormalB);
    assert_eq!(food_kind_from_roll(0.800_1, 0.0), FoodKind::Reverse);
    assert_eq!(food_kind_from_roll(0.999, 0.0), FoodKind::Reverse);
  }

  #[test]
  fn bait_band_only_exists_when_enabled() {
    for step in 0..1000 {
      let roll = step as f64 / 1000.0;
      assert_ne!(food_kind_from_roll(roll, 0.0), FoodKind::MovingBait);
    }
    assert_eq!(food_kind_from_roll(0.75, 0.1), FoodKind::MovingBait);
    assert_eq!(food_kind_from_roll(0.65, 0.1), FoodKind::NormalB);
    assert_eq!(food_kind_from_roll(0.9, 0.1), FoodKind::Reverse);
    // capped so the proprietary A band is never eaten into
    assert_eq!(food_kind_from_roll(0.45, 0.9), FoodKind::NormalA);
  }

  #[test]
  fn spawned_food_never_lands_on_the_snake() {
    let mut rng = StdRng::seed_from_u64(7);
    let snake: Vec<Position> = all_cells().take(cell_count() / 2).collect();
    for _ in 0..500 {
      let food = spawn_food(&snake, 0.0, &mut rng).unwrap();
      assert!(in_bounds(food.position));
      assert!(!occupied_by_snake(food.position, &snake));
    }
  }

  #[test]
  fn nearly_full_board_still_finds_the_last_cell() {
    let mut rng = StdRng::seed_from_u64(11);
    let hole = Position::new(13, 17);
    let snake: Vec<Position> = all_cells().filter(|cell| *cell != hole).collect();
    assert_eq!(snake.len(), cell_count() - 1);
    let food = spawn_food(&snake, 0.0, &mut rng).unwrap();
    assert_eq!(food.position, hole);
  }

  #[test]
  fn full_board_yields_no_food() {
    let snake: Vec<Position> = all_cells().collect();
    assert!(spawn_food(&snake, 0.0, &mut low_rng()).is_none());
  }

  #[test]
  fn constant_rng_falls_back_to_scanning_free_cells() {
    // every rejection-sampled candidate is (0, 0)
    let snake = vec![Position::new(0, 0)];
    let food = spawn_food(&snake, 0.0, &mut low_rng()).unwrap();
    assert_ne!(food.position, Position::new(0, 0));
  }

  #[test]
  fn dodges_only_assigned_to_bait() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut saw_bait = false;
    for _ in 0..400 {
      let food = spawn_food(&[], BAIT_MAX_CHANCE, &mut rng).unwrap();
      if food.kind == FoodKind::MovingBait {
        saw_bait = true;
        assert!((1..=BAIT_MAX_DODGES).contains(&food.dodges_left));
      } else {
        assert_eq!(food.dodges_left, 0);
      }
      assert!(food.logo < OPEN_SOURCE_LOGOS.len());
    }
    assert!(saw_bait);
  }

  #[test]
  fn trigger_requires_alignment_with_travel_axis() {
    let head = Position::new(10, 10);
    assert!(blocker_trigger(head, Position::new(15, 10), Direction::Right));
    assert!(!blocker_trigger(head, Position::new(15, 10), Direction::Up));
    assert!(blocker_trigger(head, Position::new(10, 4), Direction::Up));
    assert!(!blocker_trigger(head, Position::new(11, 4), Direction::Up));
  }

  #[test]
  fn trigger_distance_window_is_inclusive() {
    let head = Position::new(5, 5);
    assert!(!blocker_trigger(head, Position::new(7, 5), Direction::Right));
    assert!(blocker_trigger(head, Position::new(8, 5), Direction::Right));
    assert!(blocker_trigger(head, Position::new(14, 5), Direction::Right));
    assert!(!blocker_trigger(head, Position::new(15, 5), Direction::Right));
  }

  #[test]
  fn blocker_spawns_pending_on_the_food_cell() {
    let head = Position::new(10, 10);
    let food = Position::new(15, 10);
    let spawned =
      maybe_spawn_blocker(head, food, Direction::Right, &Blocker::Absent, 0.45, 1200, &mut low_rng());
    assert_eq!(
      spawned,
      Some(Blocker::Pending {
        position: food,
        spawned_at: 1200
      })
    );
  }

  #[test]
  fn blocker_respects_bernoulli_draw_and_existing_trap() {
    let head = Position::new(10, 10);
    let food = Position::new(15, 10);
    assert!(
      maybe_spawn_blocker(head, food, Direction::Right, &Blocker::Absent, 0.45, 0, &mut high_rng())
        .is_none()
    );
    let existing = Blocker::Pending {
      position: Position::new(1, 1),
      spawned_at: 0,
    };
    assert!(
      maybe_spawn_blocker(head, food, Direction::Right, &existing, 1.0, 0, &mut low_rng()).is_none()
    );
  }
}
