use std::collections::VecDeque;
use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::ui::menu::centered_popup;

/// Level-up notifications shown one after another.
///
/// The engine reports every crossed threshold at once; this queue spreads them
/// out so each stays on screen for `display_for`.
#[derive(Debug, Clone)]
pub struct LevelUpQueue {
    display_for: Duration,
    pending: VecDeque<u32>,
    current: Option<(u32, Duration)>,
}

impl LevelUpQueue {
    #[must_use]
    pub fn new(display_for: Duration) -> Self {
        Self {
            display_for,
            pending: VecDeque::new(),
            current: None,
        }
    }

    pub fn push(&mut self, threshold: u32) {
        self.pending.push_back(threshold);
    }

    /// Retires the shown notification once it has expired and promotes the
    /// next one.
    pub fn update(&mut self, now: Duration) {
        if let Some((_, shown_at)) = self.current {
            if now.saturating_sub(shown_at) < self.display_for {
                return;
            }
            self.current = None;
        }

        self.current = self.pending.pop_front().map(|threshold| (threshold, now));
    }

    /// Threshold currently on screen.
    #[must_use]
    pub fn current(&self) -> Option<u32> {
        self.current.map(|(threshold, _)| threshold)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.current = None;
    }
}

/// Draws the level-up banner over the play area.
pub fn render_level_up(frame: &mut Frame<'_>, area: Rect, threshold: u32) {
    let popup = centered_popup(area, 50, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::styled(
            "LEVEL UP!",
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Score: {threshold}")),
        Line::styled("The world is expanding!", Style::default().fg(Color::Cyan)),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(Style::default().fg(Color::LightGreen))),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::LevelUpQueue;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn thresholds_are_shown_one_at_a_time_in_order() {
        let mut queue = LevelUpQueue::new(ms(2_400));
        queue.push(10);
        queue.push(20);

        queue.update(ms(0));
        assert_eq!(queue.current(), Some(10));

        queue.update(ms(2_399));
        assert_eq!(queue.current(), Some(10));

        queue.update(ms(2_400));
        assert_eq!(queue.current(), Some(20));

        queue.update(ms(4_800));
        assert_eq!(queue.current(), None);
    }

    #[test]
    fn clear_drops_everything() {
        let mut queue = LevelUpQueue::new(ms(100));
        queue.push(10);
        queue.update(ms(0));
        queue.push(20);

        queue.clear();
        queue.update(ms(500));

        assert_eq!(queue.current(), None);
    }
}
