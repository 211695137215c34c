use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListState, Paragraph},
};

use super::{centered_popup_area, selectable_items};
use crate::canon::{OLD_TESTAMENT_LEN, english_name};
use crate::models::BookInfo;

pub struct BooksWindow;

impl BooksWindow {
    /// Book list, or the chapter labels of `open_book` once one is picked.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        books: &[BookInfo],
        selected_index: usize,
        open_book: Option<(&str, &[String])>,
        chapter_index: usize,
    ) {
        let popup_area = centered_popup_area(area, 50, 80);
        frame.render_widget(Clear, popup_area);

        if books.is_empty() {
            let empty_text = vec![
                Line::from("No books available"),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Esc to close",
                    Style::default().add_modifier(Modifier::ITALIC),
                )),
            ];
            let paragraph = Paragraph::new(empty_text)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title("Books").borders(Borders::ALL));
            frame.render_widget(paragraph, popup_area);
            return;
        }

        let (title, entries, selected) = match open_book {
            Some((book, labels)) => (
                book.to_string(),
                labels.iter().map(|label| Line::from(label.clone())).collect(),
                chapter_index,
            ),
            None => (
                "Books".to_string(),
                books
                    .iter()
                    .enumerate()
                    .map(|(i, book)| Self::book_line(i, book))
                    .collect(),
                selected_index,
            ),
        };

        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let list = List::new(selectable_items(entries, selected));
        let mut list_state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(list, rows[0], &mut list_state);

        let footer = if open_book.is_some() {
            "Enter open | Esc back to books"
        } else {
            "Enter chapters | Esc close"
        };
        frame.render_widget(Paragraph::new(footer), rows[1]);
    }

    fn book_line(index: usize, book: &BookInfo) -> Line<'static> {
        let testament = if index < OLD_TESTAMENT_LEN { "舊約" } else { "新約" };
        let mut spans = vec![Span::raw(book.name.clone())];
        if let Some(english) = english_name(&book.name) {
            spans.push(Span::styled(
                format!(" {}", english),
                Style::default().add_modifier(Modifier::ITALIC),
            ));
        }
        spans.push(Span::styled(
            format!("  {} · {} 章", testament, book.chapter_num),
            Style::default().fg(Color::DarkGray),
        ));
        Line::from(spans)
    }
}
