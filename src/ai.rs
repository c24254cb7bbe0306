use crate::grid::{Cell, GridState};
use crate::input::Direction;
use crate::snake::Snake;

/// Candidate order; equal-distance ties resolve to the earlier entry.
pub const CANDIDATE_ORDER: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Down,
    Direction::Up,
];

/// Greedy choice of the AI snake's next heading.
///
/// Candidates are ranked by the Manhattan distance from the resulting head to
/// `food` (stable, so ties keep [`CANDIDATE_ORDER`]). The reverse of the
/// current heading is skipped unless the snake is a single segment. The first
/// candidate that stays in bounds, misses the snake's own body and misses every
/// wall wins. When none qualifies the current heading is kept and the collision
/// is left to the resolver.
#[must_use]
pub fn choose_direction(snake: &Snake, food: Cell, grid: &GridState) -> Direction {
    let head = snake.head();
    let current = snake.heading();

    let mut candidates: Vec<Direction> = CANDIDATE_ORDER
        .into_iter()
        .filter(|direction| snake.len() <= 1 || *direction != current.opposite())
        .collect();
    candidates.sort_by_key(|direction| head.step(*direction).manhattan(food));

    candidates
        .into_iter()
        .find(|direction| {
            let next = head.step(*direction);
            grid.contains(next) && !snake.body_occupies(next) && !grid.is_wall(next)
        })
        .unwrap_or(current)
}
