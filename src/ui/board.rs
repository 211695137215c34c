use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::corpus::Chapter;

/// Width of the verse-number gutter, including the favorite mark.
const GUTTER: usize = 6;

/// One wrapped display row of a chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLine {
    pub text: String,
    /// Verse the row belongs to; `None` for spacing rows.
    pub verse: Option<u32>,
    /// True on the first row of a verse, where the number is drawn.
    pub first: bool,
}

/// Colors and marks applied while drawing the chapter.
pub struct BoardStyle {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub selected_verse: Option<u32>,
}

/// Chapter text laid out for a given width.
#[derive(Debug, Clone, Default)]
pub struct Board {
    title: String,
    lines: Vec<BoardLine>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap every verse of `chapter` to `width` columns, with `spacing`
    /// blank rows between verses.
    pub fn layout(chapter: &Chapter<'_>, width: usize, spacing: usize) -> Self {
        let text_width = width.saturating_sub(GUTTER).max(10);
        let mut lines = Vec::new();

        for (i, verse) in chapter.verses.iter().enumerate() {
            if i > 0 {
                for _ in 0..spacing {
                    lines.push(BoardLine {
                        text: String::new(),
                        verse: None,
                        first: false,
                    });
                }
            }
            let number = verse.verse_number();
            for (row, wrapped) in textwrap::wrap(&verse.content, text_width).into_iter().enumerate() {
                lines.push(BoardLine {
                    text: wrapped.into_owned(),
                    verse: number,
                    first: row == 0,
                });
            }
        }

        Self {
            title: format!("{} {}", chapter.book, chapter.label),
            lines,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the total number of display rows
    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    /// First row of `verse`.
    pub fn row_of_verse(&self, verse: u32) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.first && line.verse == Some(verse))
    }

    /// First verse that starts at or after `row`.
    pub fn verse_from_row(&self, row: usize) -> Option<u32> {
        self.lines
            .iter()
            .skip(row)
            .find(|line| line.first)
            .and_then(|line| line.verse)
    }

    /// Verse numbers in display order.
    pub fn verses(&self) -> Vec<u32> {
        self.lines
            .iter()
            .filter(|line| line.first)
            .filter_map(|line| line.verse)
            .collect()
    }

    /// Top row adjusted so that all of `verse` fits in a viewport of
    /// `height` rows, moving as little as possible from `row`.
    pub fn scroll_to_show(&self, row: usize, height: usize, verse: u32) -> usize {
        let Some(start) = self.row_of_verse(verse) else {
            return row;
        };
        let end = self
            .lines
            .iter()
            .enumerate()
            .skip(start)
            .take_while(|(_, line)| line.verse == Some(verse))
            .last()
            .map(|(i, _)| i)
            .unwrap_or(start);

        if start < row {
            start
        } else if end >= row + height {
            (end + 1).saturating_sub(height).min(start)
        } else {
            row
        }
    }

    pub fn max_row(&self, height: usize) -> usize {
        self.lines.len().saturating_sub(height)
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        row: usize,
        style: &BoardStyle,
        is_favorite: impl Fn(u32) -> bool,
    ) {
        let base = Style::default().fg(style.fg).bg(style.bg);
        frame.render_widget(Block::default().style(base), area);

        let height = area.height as usize;
        let visible: Vec<Line> = self
            .lines
            .iter()
            .skip(row)
            .take(height)
            .map(|line| {
                let selected = line.verse.is_some() && line.verse == style.selected_verse;
                let gutter = match (line.first, line.verse) {
                    (true, Some(verse)) => {
                        let mark = if is_favorite(verse) { "★" } else { " " };
                        format!("{}{:>4} ", mark, verse)
                    }
                    _ => " ".repeat(GUTTER),
                };
                let mut gutter_style = Style::default().fg(style.accent);
                if selected {
                    gutter_style = gutter_style.add_modifier(Modifier::REVERSED);
                }
                let text_style = if selected {
                    base.add_modifier(Modifier::BOLD)
                } else {
                    base
                };
                Line::from(vec![
                    Span::styled(pad_to(&gutter, GUTTER), gutter_style),
                    Span::styled(line.text.clone(), text_style),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(visible).style(base), area);
    }
}

fn pad_to(text: &str, width: usize) -> String {
    let used = textwrap::core::display_width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(used)))
}
