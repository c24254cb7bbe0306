use crate::grid::{Cell, GridState};
use crate::snake::Snake;

/// What a snake's head ran into.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Collision {
    Boundary,
    Wall,
    SelfBody,
    Opponent,
}

/// Returns true if `head` left the grid or landed on a wall.
#[must_use]
pub fn hits_boundary_or_wall(head: Cell, grid: &GridState) -> bool {
    boundary_or_wall(head, grid).is_some()
}

/// Returns true if `head` lies on any segment of `other`.
#[must_use]
pub fn hits_snake(head: Cell, other: Option<&Snake>) -> bool {
    other.is_some_and(|snake| snake.occupies(head))
}

fn boundary_or_wall(head: Cell, grid: &GridState) -> Option<Collision> {
    if !grid.contains(head) {
        Some(Collision::Boundary)
    } else if grid.is_wall(head) {
        Some(Collision::Wall)
    } else {
        None
    }
}

/// Classifies a player collision after the player has moved.
///
/// Self-collision only counts when `self_collision` is enabled.
#[must_use]
pub fn player_collision(
    player: &Snake,
    ai: Option<&Snake>,
    grid: &GridState,
    self_collision: bool,
) -> Option<Collision> {
    let head = player.head();
    boundary_or_wall(head, grid)
        .or_else(|| (self_collision && player.head_overlaps_body()).then_some(Collision::SelfBody))
        .or_else(|| hits_snake(head, ai).then_some(Collision::Opponent))
}

/// Classifies an AI collision after the AI has moved.
///
/// Striking the player takes precedence, since only that outcome scores.
#[must_use]
pub fn ai_collision(ai: &Snake, player: &Snake, grid: &GridState) -> Option<Collision> {
    let head = ai.head();
    if player.occupies(head) {
        return Some(Collision::Opponent);
    }

    boundary_or_wall(head, grid).or_else(|| ai.head_overlaps_body().then_some(Collision::SelfBody))
}
