use super::constants::GRID_SIZE;
use super::types::Position;

pub fn in_bounds(position: Position) -> bool {
  (0..GRID_SIZE).contains(&position.x) && (0..GRID_SIZE).contains(&position.y)
}

pub fn occupied_by_snake(position: Position, snake: &[Position]) -> bool {
  snake.iter().any(|segment| *segment == position)
}

pub fn manhattan_distance(a: Position, b: Position) -> i32 {
  (a.x - b.x).abs() + (a.y - b.y).abs()
}

pub fn clamp_to_grid(position: Position) -> Position {
  Position {
    x: position.x.clamp(0, GRID_SIZE - 1),
    y: position.y.clamp(0, GRID_SIZE - 1),
  }
}

pub fn cell_count() -> usize {
  (GRID_SIZE * GRID_SIZE) as usize
}

pub fn all_cells() -> impl Iterator<Item = Position> {
  (0..GRID_SIZE).flat_map(|y| (0..GRID_SIZE).map(move |x| Position::new(x, y)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bounds_cover_the_square_only() {
    assert!(in_bounds(Position::new(0, 0)));
    assert!(in_bounds(Position::new(GRID_SIZE - 1, GRID_SIZE - 1)));
    assert!(!in_bounds(Position::new(-1, 5)));
    assert!(!in_bounds(Position::new(5, GRID_SIZE)));
  }

  #[test]
  fn manhattan_distance_sums_axis_gaps() {
    assert_eq!(manhattan_distance(Position::new(1, 1), Position::new(4, 5)), 7);
    assert_eq!(manhattan_distance(Position::new(4, 5), Position::new(1, 1)), 7);
    assert_eq!(manhattan_distance(Position::new(3, 3), Position::new(3, 3)), 0);
  }

  #[test]
  fn clamp_pulls_back_onto_grid() {
    assert_eq!(clamp_to_grid(Position::new(-2, GRID_SIZE + 3)), Position::new(0, GRID_SIZE - 1));
  }

  #[test]
  fn all_cells_enumerates_every_position_once() {
    let cells: Vec<Position> = all_cells().collect();
    assert_eq!(cells.len(), cell_count());
    assert!(cells.iter().all(|cell| in_bounds(*cell)));
  }
}
