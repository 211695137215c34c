use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, Paragraph},
};

use super::{centered_popup_area, selectable_items};
use crate::models::FavoriteEntry;

pub struct FavoritesWindow;

impl FavoritesWindow {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        entries: &[FavoriteEntry],
        selected_index: usize,
        page: usize,
        page_count: usize,
    ) {
        let popup_area = centered_popup_area(area, 80, 80);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(
                "Favorites ({}/{}) d delete, y/Y copy, p per page",
                page,
                page_count.max(1)
            ))
            .borders(Borders::ALL);
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);
        let footer = Paragraph::new("Enter open | d remove | ←/→ page | Esc close");

        if entries.is_empty() {
            let paragraph =
                Paragraph::new("No favorites yet").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(paragraph, rows[0]);
            frame.render_widget(footer, rows[1]);
            return;
        }

        let lines = entries
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(format!("{:<12}", entry.reference()), Style::default().fg(Color::Yellow)),
                    Span::raw(" "),
                    Span::raw(entry.content.clone()),
                ])
            })
            .collect();

        frame.render_widget(List::new(selectable_items(lines, selected_index)), rows[0]);
        frame.render_widget(footer, rows[1]);
    }
}
