pub mod books;
pub mod favorites;
pub mod help;
pub mod history;
pub mod search;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::ListItem,
};

/// Compute a centered popup area within the given area.
pub fn centered_popup_area(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let width = (area.width * width_percent) / 100;
    let height = (area.height * height_percent) / 100;
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;

    Rect::new(x, y, width, height)
}

pub(crate) fn selectable_items<'a>(entries: Vec<Line<'a>>, selected_index: usize) -> Vec<ListItem<'a>> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == selected_index {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            ListItem::new(entry).style(style)
        })
        .collect()
}
