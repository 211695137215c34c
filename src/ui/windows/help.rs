use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::settings::{Action, Keymap};

pub struct HelpWindow;

const SECTIONS: &[(&str, &[(Action, &str)])] = &[
    (
        " Reading:",
        &[
            (Action::ScrollUp, "Previous Verse"),
            (Action::ScrollDown, "Next Verse"),
            (Action::PageUp, "Page Up"),
            (Action::PageDown, "Page Down"),
            (Action::BeginningOfCh, "Chapter Start"),
            (Action::EndOfCh, "Chapter End"),
            (Action::PrevChapter, "Previous Chapter"),
            (Action::NextChapter, "Next Chapter"),
        ],
    ),
    (
        " Search:",
        &[
            (Action::Search, "Search Verses"),
            (Action::SearchHistory, "Search History"),
        ],
    ),
    (
        " Favorites & Copy:",
        &[
            (Action::ToggleFavorite, "Toggle Favorite"),
            (Action::ShowFavorites, "Favorites"),
            (Action::CopyVerse, "Copy Verse"),
            (Action::CopyLink, "Copy Link"),
        ],
    ),
    (
        " Display:",
        &[
            (Action::Enlarge, "Larger Text"),
            (Action::Shrink, "Smaller Text"),
            (Action::SwitchColor, "Light/Dark Theme"),
        ],
    ),
    (
        " Windows:",
        &[
            (Action::BookList, "Books & Chapters"),
            (Action::Help, "Help"),
            (Action::Quit, "Quit / Close Window"),
        ],
    ),
];

/// Keys inside the search and favorites windows; these are not remappable.
const LIST_KEYS: &[(&str, &[(&str, &str)])] = &[
    (
        " In Search:",
        &[
            ("Ctrl-F", "Toggle Favorite"),
            ("Ctrl-Y", "Copy Verse"),
            ("Ctrl-U", "Copy Link"),
            ("Ctrl-P", "Results Per Page"),
        ],
    ),
    (
        " In Favorites:",
        &[
            ("d", "Remove Favorite"),
            ("y", "Copy Verse"),
            ("Y", "Copy Link"),
            ("p", "Favorites Per Page"),
        ],
    ),
];

impl HelpWindow {
    pub fn lines(keymap: &Keymap) -> Vec<String> {
        let mut lines = vec![" Key Bindings:".to_string()];
        for (title, actions) in SECTIONS {
            lines.push(String::new());
            lines.push(title.to_string());
            for (action, label) in actions.iter() {
                lines.push(format!("   {:<18}{}", keymap.key_for(*action), label));
            }
        }
        for (title, keys) in LIST_KEYS {
            lines.push(String::new());
            lines.push(title.to_string());
            for (key, label) in keys.iter() {
                lines.push(format!("   {:<18}{}", key, label));
            }
        }
        lines
    }

    pub fn max_scroll_offset(area: Rect, keymap: &Keymap) -> u16 {
        let total = Self::lines(keymap).len() as u16 + 2;
        total.saturating_sub(area.height)
    }

    pub fn render(frame: &mut Frame, area: Rect, keymap: &Keymap, scroll_offset: u16) {
        let help_content: Vec<Line> = Self::lines(keymap).into_iter().map(Line::from).collect();

        let max_width = help_content.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let width = (max_width + 4).min(area.width);
        let height = (help_content.len() as u16 + 2).min(area.height);

        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        let popup_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup_area);

        let help_paragraph = Paragraph::new(help_content)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .scroll((scroll_offset, 0));

        frame.render_widget(help_paragraph, popup_area);
    }
}
