use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::engine::{AiStatus, SimulationEngine};

const SEPARATOR: &str = " │ ";

/// Supplemental values displayed by the HUD rows.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    pub best_score: u32,
    /// Game time of this frame, for the respawn countdown.
    pub now: Duration,
}

/// Renders the two-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    engine: &SimulationEngine,
    info: HudInfo,
) -> Rect {
    let [play_area, score_area, status_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(score_line(engine, info.best_score))
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        score_area,
    );
    frame.render_widget(
        Paragraph::new(status_line(engine, info.now))
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        status_area,
    );

    play_area
}

fn score_line(engine: &SimulationEngine, best_score: u32) -> Line<'static> {
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let score_style = if engine.score() > best_score {
        value.fg(Color::Yellow)
    } else {
        value
    };

    Line::from(vec![
        Span::raw("Length "),
        Span::styled(engine.state().player.len().to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw("Level "),
        Span::styled(engine.level().to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw("Score "),
        Span::styled(engine.score().to_string(), score_style),
        Span::raw(SEPARATOR),
        Span::raw("Best "),
        Span::styled(best_score.max(engine.score()).to_string(), value),
    ])
}

fn status_line(engine: &SimulationEngine, now: Duration) -> Line<'static> {
    let tile_count = engine.tile_count();
    let mut spans = vec![
        Span::raw(format!("{tile_count}x{tile_count}")),
        Span::raw(SEPARATOR),
        Span::raw(format!("walls {}", engine.walls().len())),
        Span::raw(SEPARATOR),
        ai_span(engine.ai_status(), now),
    ];

    if engine.is_double_active() {
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::styled(
            "x2",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }

    Line::from(spans)
}

fn ai_span(status: AiStatus, now: Duration) -> Span<'static> {
    match status {
        AiStatus::Active => Span::styled("AI hunting", Style::default().fg(Color::LightRed)),
        AiStatus::RespawnPending { respawn_at } => {
            let remaining = respawn_at.saturating_sub(now);
            Span::raw(format!("AI back in {:.1}s", remaining.as_secs_f32()))
        }
    }
}
