use rand::Rng;

use crate::error::EngineError;
use crate::grid::Cell;

/// Random draws tried before falling back to scanning for free cells.
pub const MAX_SPAWN_ATTEMPTS: usize = 256;

/// Picks a uniformly random cell of the `tile_count` grid not rejected by
/// `is_occupied`.
///
/// Draws are rejection-sampled first. On a crowded grid, once
/// [`MAX_SPAWN_ATTEMPTS`] draws have all hit occupied cells, the free cells are
/// enumerated and one is picked directly, so the call always terminates.
pub fn spawn_position<R, F>(
    rng: &mut R,
    tile_count: u16,
    is_occupied: F,
) -> Result<Cell, EngineError>
where
    R: Rng + ?Sized,
    F: Fn(Cell) -> bool,
{
    let upper = i32::from(tile_count);
    if upper == 0 {
        return Err(EngineError::GridFull { tile_count });
    }

    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let candidate = Cell::new(rng.gen_range(0..upper), rng.gen_range(0..upper));
        if !is_occupied(candidate) {
            return Ok(candidate);
        }
    }

    let mut candidates = Vec::new();
    for y in 0..upper {
        for x in 0..upper {
            let cell = Cell::new(x, y);
            if !is_occupied(cell) {
                candidates.push(cell);
            }
        }
    }

    if candidates.is_empty() {
        return Err(EngineError::GridFull { tile_count });
    }

    let index = rng.gen_range(0..candidates.len());
    Ok(candidates[index])
}
