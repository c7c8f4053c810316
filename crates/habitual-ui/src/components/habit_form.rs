use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::modal::{FormField, HabitForm};
use crate::view::CategoryOption;

/// Centered popup of the given size, clamped to `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render(frame: &mut Frame, form: &HabitForm, categories: &[CategoryOption]) {
    let area = centered_rect(60, 11, frame.area());
    frame.render_widget(Clear, area);

    let category = form
        .category_id
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.label.as_str())
        .unwrap_or("No category");

    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| {
            let value = match field {
                FormField::Name => form.name.clone(),
                FormField::Description => form.description.clone(),
                FormField::Category => format!("‹ {category} ›"),
                FormField::Difficulty => format!("‹ {} ›", form.difficulty.display_name()),
                FormField::GoalFrequency => form.goal_frequency.clone(),
            };
            let focused = *field == form.focus;
            let label_style = if focused {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            let cursor = if focused && matches!(
                field,
                FormField::Name | FormField::Description | FormField::GoalFrequency
            ) {
                "_"
            } else {
                ""
            };
            Line::from(vec![
                Span::styled(format!("{:<18}", field.label()), label_style),
                Span::raw(format!("{value}{cursor}")),
            ])
        })
        .chain([
            Line::raw(""),
            Line::styled(
                "Tab: next field  ←/→: change  Enter: create  Esc: cancel",
                Style::default().fg(Color::DarkGray),
            ),
        ])
        .collect();

    let block = Block::default()
        .title(" New habit ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_clamped_to_area() {
        let area = Rect::new(0, 0, 40, 8);
        let r = centered_rect(60, 11, area);
        assert_eq!(r, Rect::new(0, 0, 40, 8));

        let r = centered_rect(20, 4, Rect::new(0, 0, 100, 50));
        assert_eq!(r, Rect::new(40, 23, 20, 4));
    }
}
