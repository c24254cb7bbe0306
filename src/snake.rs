use std::collections::VecDeque;

use crate::grid::Cell;
use crate::input::{Direction, direction_change_is_valid};

/// Segment list and target length shared by the player and the AI.
///
/// `length` is the length the body grows towards: movement prepends a new head
/// and then drops tail segments until the body is no longer than `length`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
    length: usize,
    heading: Direction,
    pending: Direction,
}

impl Snake {
    /// Creates a one-segment snake at `start` that will grow to `length`.
    #[must_use]
    pub fn new(start: Cell, direction: Direction, length: usize) -> Self {
        Self {
            body: VecDeque::from([start]),
            length: length.max(1),
            heading: direction,
            pending: direction,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// The target length equals the segment count.
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");
        let length = segments.len();
        Self {
            body: VecDeque::from(segments),
            length,
            heading: direction,
            pending: direction,
        }
    }

    /// Requests a heading change for the next move.
    ///
    /// Returns `false` and leaves the snake untouched when `direction`
    /// reverses the current heading of a multi-segment snake.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.heading, direction, self.body.len()) {
            return false;
        }
        self.pending = direction;
        true
    }

    /// Raises the target length; the next move keeps its tail.
    pub fn grow(&mut self) {
        self.length += 1;
    }

    /// Applies one movement step in the pending direction.
    pub fn move_forward(&mut self) {
        self.heading = self.pending;
        let next_head = self.next_head_position();

        self.body.push_front(next_head);
        self.body.truncate(self.length);
    }

    /// Returns where the head lands on the next move.
    #[must_use]
    pub fn next_head_position(&self) -> Cell {
        self.head().step(self.pending)
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Cell {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Returns true if any non-head segment occupies `cell`.
    #[must_use]
    pub fn body_occupies(&self, cell: Cell) -> bool {
        self.body.iter().skip(1).any(|segment| *segment == cell)
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        self.body_occupies(self.head())
    }

    /// Clamps every segment into a `tile_count` grid after a resize.
    pub fn clamp_to(&mut self, tile_count: u16) {
        for segment in &mut self.body {
            *segment = segment.clamped(tile_count);
        }
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the length the body is growing towards.
    #[must_use]
    pub fn target_length(&self) -> usize {
        self.length
    }

    /// Returns the direction of the most recent move.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Returns the direction the next move will use.
    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }
}
