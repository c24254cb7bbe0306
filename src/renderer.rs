use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::engine::{GameStatus, SimulationEngine};
use crate::grid::Cell;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};
use crate::ui::popup::render_level_up;

/// Terminal columns per tile; two keeps tiles roughly square.
const TILE_WIDTH: u16 = 2;
const GLYPH_TILE: &str = "██";
const GLYPH_FOOD: &str = "◆ ";
const GLYPH_EMPTY: &str = "· ";

const COLOR_PLAYER: Color = Color::LightGreen;
const COLOR_PLAYER_HEAD: Color = Color::White;
const COLOR_AI: Color = Color::LightRed;
const COLOR_WALL: Color = Color::DarkGray;
const COLOR_FOOD: Color = Color::Yellow;
const COLOR_FLOOR: Color = Color::Rgb(40, 40, 40);

/// Front-end state that is not part of the simulation.
#[derive(Debug, Clone, Copy)]
pub struct ViewState {
    pub started: bool,
    pub paused: bool,
    pub best_score: u32,
    pub now: Duration,
    pub level_up: Option<u32>,
}

/// Maps the visible part of the grid onto terminal cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Viewport {
    area: Rect,
    origin: Cell,
}

impl Viewport {
    /// Fits as much of the grid as possible, scrolled to keep `focus` visible.
    fn new(area: Rect, tile_count: u16, focus: Cell) -> Self {
        let columns = area.width / TILE_WIDTH;
        let rows = area.height;
        Self {
            area,
            origin: Cell::new(
                scroll_origin(focus.x, columns, tile_count),
                scroll_origin(focus.y, rows, tile_count),
            ),
        }
    }

    fn to_terminal(self, cell: Cell) -> Option<(u16, u16)> {
        let column = u16::try_from(cell.x - self.origin.x).ok()?;
        let row = u16::try_from(cell.y - self.origin.y).ok()?;

        let x = self.area.x.checked_add(column.checked_mul(TILE_WIDTH)?)?;
        let y = self.area.y.checked_add(row)?;
        if x + TILE_WIDTH > self.area.right() || y >= self.area.bottom() {
            return None;
        }

        Some((x, y))
    }
}

/// First visible coordinate on one axis: centred on `focus`, clamped so the
/// view never scrolls past the grid edge.
fn scroll_origin(focus: i32, visible: u16, tile_count: u16) -> i32 {
    let visible = i32::from(visible);
    let tile_count = i32::from(tile_count);
    if visible >= tile_count {
        return 0;
    }

    (focus - visible / 2).clamp(0, tile_count - visible)
}

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, engine: &SimulationEngine, view: ViewState) {
    let area = frame.area();
    let play_area = render_hud(
        frame,
        area,
        engine,
        HudInfo {
            best_score: view.best_score,
            now: view.now,
        },
    );

    let tile_count = engine.tile_count();
    let block = Block::bordered()
        .title(format!(" {tile_count}x{tile_count} "))
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    let viewport = Viewport::new(inner, tile_count, engine.state().player.head());
    render_arena(frame, viewport, engine);

    if !view.started {
        render_start_menu(frame, play_area, view.best_score);
        return;
    }

    if engine.status() != GameStatus::Running {
        render_game_over_menu(
            frame,
            play_area,
            engine.score(),
            view.best_score,
            engine.status(),
            engine.state().death_reason,
        );
        return;
    }

    if view.paused {
        render_pause_menu(frame, play_area);
    } else if let Some(threshold) = view.level_up {
        render_level_up(frame, play_area, threshold);
    }
}

fn render_arena(frame: &mut Frame<'_>, viewport: Viewport, engine: &SimulationEngine) {
    let tile_count = i32::from(engine.tile_count());
    let buffer = frame.buffer_mut();
    let mut paint = |cell: Cell, glyph: &str, style: Style| {
        if let Some((x, y)) = viewport.to_terminal(cell) {
            buffer.set_string(x, y, glyph, style);
        }
    };

    for y in 0..tile_count {
        for x in 0..tile_count {
            paint(Cell::new(x, y), GLYPH_EMPTY, Style::default().fg(COLOR_FLOOR));
        }
    }

    for wall in engine.walls() {
        paint(*wall, GLYPH_TILE, Style::default().fg(COLOR_WALL));
    }

    paint(engine.food(), GLYPH_FOOD, Style::default().fg(COLOR_FOOD));

    for segment in engine.ai_segments() {
        paint(*segment, GLYPH_TILE, Style::default().fg(COLOR_AI));
    }

    for segment in engine.player_segments().skip(1) {
        paint(*segment, GLYPH_TILE, Style::default().fg(COLOR_PLAYER));
    }
    paint(
        engine.state().player.head(),
        GLYPH_TILE,
        Style::default()
            .fg(COLOR_PLAYER_HEAD)
            .add_modifier(Modifier::BOLD),
    );
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use crate::grid::Cell;

    use super::{Viewport, scroll_origin};

    #[test]
    fn whole_grid_fits_without_scrolling() {
        assert_eq!(scroll_origin(35, 50, 40), 0);
    }

    #[test]
    fn scroll_keeps_focus_centred_inside_grid() {
        assert_eq!(scroll_origin(20, 10, 40), 15);
        assert_eq!(scroll_origin(2, 10, 40), 0);
        assert_eq!(scroll_origin(39, 10, 40), 30);
    }

    #[test]
    fn cells_outside_the_view_are_not_drawn() {
        let viewport = Viewport::new(Rect::new(1, 1, 20, 10), 40, Cell::new(0, 0));

        assert_eq!(viewport.to_terminal(Cell::new(0, 0)), Some((1, 1)));
        assert_eq!(viewport.to_terminal(Cell::new(9, 9)), Some((19, 10)));
        assert_eq!(viewport.to_terminal(Cell::new(10, 0)), None);
        assert_eq!(viewport.to_terminal(Cell::new(-1, 0)), None);
    }
}
