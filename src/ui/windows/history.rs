use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListState, Paragraph},
};

use super::{centered_popup_area, selectable_items};

pub struct HistoryWindow;

impl HistoryWindow {
    pub fn render(frame: &mut Frame, area: Rect, keywords: &[String], selected_index: usize) {
        let popup_area = centered_popup_area(area, 50, 60);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Search History").borders(Borders::ALL);
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);
        let footer = Paragraph::new("Enter search | d delete | D clear | Esc close");

        if keywords.is_empty() {
            let paragraph =
                Paragraph::new("No searches yet").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(paragraph, rows[0]);
            frame.render_widget(footer, rows[1]);
            return;
        }

        let lines = keywords.iter().map(|k| Line::from(k.clone())).collect();
        let mut list_state = ListState::default().with_selected(Some(selected_index));
        frame.render_stateful_widget(List::new(selectable_items(lines, selected_index)), rows[0], &mut list_state);
        frame.render_widget(footer, rows[1]);
    }
}
