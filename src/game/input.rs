use super::types::Direction;

pub fn parse_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" => Some(Direction::Up),
        "ArrowDown" | "s" => Some(Direction::Down),
        "ArrowLeft" | "a" => Some(Direction::Left),
        "ArrowRight" | "d" => Some(Direction::Right),
        _ => None,
    }
}

pub fn effective_direction(requested: Direction, reversed: bool) -> Direction {
    if reversed {
        requested.inverse()
    } else {
        requested
    }
}

/// Anything but an exact U-turn is accepted, including the current heading.
pub fn accepts(effective: Direction, committed: Direction) -> bool {
    effective != committed.inverse()
}
