use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, Paragraph},
};

use super::selectable_items;
use crate::search::Segment;

/// One verse on the current results page.
pub struct SearchRow<'a> {
    pub reference: String,
    pub segments: Vec<Segment<'a>>,
    pub favorite: bool,
}

/// What the search popup shows for one frame.
pub struct SearchView<'a> {
    pub query: &'a str,
    pub filter: &'a str,
    pub results: Vec<SearchRow<'a>>,
    pub selected_index: usize,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    /// False until a search has run for the query as typed.
    pub searched: bool,
}

pub struct SearchWindow;

impl SearchWindow {
    pub fn render(frame: &mut Frame, area: Rect, view: &SearchView<'_>) {
        let popup_area = Rect::new(
            area.x + area.width / 8,
            area.y + area.height / 6,
            area.width * 3 / 4,
            area.height * 2 / 3,
        );

        frame.render_widget(Clear, popup_area);

        let header = Paragraph::new(Line::from(format!("/{}", view.query)))
            .block(
                Block::default()
                    .title(format!("Search in: {} (Tab to change)", view.filter))
                    .borders(Borders::ALL),
            )
            .style(Style::default().add_modifier(Modifier::BOLD));

        let header_area = Rect::new(popup_area.x, popup_area.y, popup_area.width, 3);
        frame.render_widget(header, header_area);
        frame.set_cursor_position((
            header_area.x + 2 + textwrap::core::display_width(view.query) as u16,
            header_area.y + 1,
        ));

        let list_area = Rect::new(
            popup_area.x,
            popup_area.y + 3,
            popup_area.width,
            popup_area.height.saturating_sub(3),
        );

        if !view.searched || view.results.is_empty() {
            let text = if view.searched { "No matches" } else { "Press Enter to search" };
            let empty = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, list_area);
            return;
        }

        let lines = view.results.iter().map(result_line).collect();

        let list = List::new(selectable_items(lines, view.selected_index)).block(
            Block::default()
                .title(format!(
                    "{} results, page {}/{} (←/→, ^F favorite, ^Y/^U copy, ^P per page)",
                    view.total,
                    view.page,
                    view.page_count.max(1)
                ))
                .borders(Borders::ALL),
        );

        frame.render_widget(list, list_area);
    }
}

fn result_line<'a>(row: &SearchRow<'a>) -> Line<'a> {
    let mark = if row.favorite { "★" } else { " " };
    let mut spans = vec![
        Span::styled(mark, Style::default().fg(Color::Magenta)),
        Span::styled(format!("{:<12}", row.reference), Style::default().fg(Color::Yellow)),
        Span::raw(" "),
    ];
    spans.extend(row.segments.iter().map(|segment| {
        if segment.matched {
            Span::styled(segment.text, Style::default().fg(Color::Black).bg(Color::Yellow))
        } else {
            Span::raw(segment.text)
        }
    }));
    Line::from(spans)
}
