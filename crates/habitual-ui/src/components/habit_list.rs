use habitual_core::habit::Difficulty;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::view::HabitCard;

/// Terminal rendering of the habit grid: the visible cards as a selectable
/// list, or the empty-state placeholder.
pub struct HabitList<'a> {
    cards: Vec<&'a HabitCard>,
    selected: usize,
    empty_state: bool,
    loading: bool,
}

impl<'a> HabitList<'a> {
    pub fn new(
        cards: impl Iterator<Item = &'a HabitCard>,
        selected: usize,
        empty_state: bool,
        loading: bool,
    ) -> Self {
        Self {
            cards: cards.collect(),
            selected,
            empty_state,
            loading,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" Habits ({}) ", self.cards.len());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        if self.loading {
            let p = Paragraph::new("Loading…")
                .block(block)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(p, area);
            return;
        }

        if self.empty_state {
            let p = Paragraph::new("No habits yet. Press n to create your first one!")
                .block(block)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(p, area);
            return;
        }

        let items: Vec<ListItem> = self.cards.iter().map(|card| card_item(card)).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if !self.cards.is_empty() {
            state.select(Some(self.selected.min(self.cards.len() - 1)));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn card_item(card: &HabitCard) -> ListItem<'static> {
    let check = if card.completed {
        Span::styled("[✓] ", Style::default().fg(Color::Green).bold())
    } else {
        Span::styled("[ ] ", Style::default().fg(Color::DarkGray))
    };
    let mut first = vec![
        check,
        Span::raw(format!("{} ", card.icon)),
        Span::styled(card.name.clone(), Style::default().bold()),
        Span::raw("  "),
        Span::styled(
            card.difficulty.display_name(),
            difficulty_color(card.difficulty),
        ),
    ];
    if let Some(ref category) = card.category {
        first.push(Span::styled(
            format!("  #{category}"),
            Style::default().fg(Color::Magenta),
        ));
    }

    let mut lines = vec![Line::from(first)];
    if let Some(ref description) = card.description {
        lines.push(Line::from(Span::styled(
            format!("    {description}"),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!(
            "    streak {} (best {})  ·  {:.1}%  ·  goal {}x/week",
            card.streak.current, card.streak.best, card.completion_rate, card.goal_frequency
        ),
        Style::default().fg(Color::DarkGray),
    )));
    ListItem::new(lines)
}

fn difficulty_color(difficulty: Difficulty) -> Style {
    match difficulty {
        Difficulty::Easy => Style::default().fg(Color::Green),
        Difficulty::Medium => Style::default().fg(Color::Yellow),
        Difficulty::Hard => Style::default().fg(Color::Red),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::render_habit_cards;
    use habitual_core::Habit;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(list: &HabitList) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 12)).unwrap();
        terminal.draw(|frame| list.render(frame, frame.area())).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_state_placeholder() {
        let list = HabitList::new(std::iter::empty(), 0, true, false);
        assert!(draw(&list).contains("No habits yet"));
    }

    #[test]
    fn cards_show_completion_marker() {
        let habits: Vec<Habit> = serde_json::from_value(serde_json::json!([
            {"id": 1, "name": "Read", "completed_today": true},
            {"id": 2, "name": "Run", "completed_today": false},
        ]))
        .unwrap();
        let cards = render_habit_cards(&habits);
        let screen = draw(&HabitList::new(cards.iter(), 1, false, false));
        assert!(screen.contains("[✓]"));
        assert!(screen.contains("[ ]"));
        assert!(screen.contains("Habits (2)"));
    }
}
