use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::pagination::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `bible-array.json` and friends. Falls back to
    /// `<data dir>/corpus`.
    pub corpus_dir: Option<String>,
    /// Prefix for copied verse links.
    pub base_url: String,
    pub case_sensitive_search: bool,
    pub page_size: usize,
    /// Terminals at most this wide use the small page size.
    pub narrow_width: u16,
    pub history_capacity: usize,
    pub highlight_favorites: bool,
    pub dark_color_fg: i16,
    pub dark_color_bg: i16,
    pub light_color_fg: i16,
    pub light_color_bg: i16,
    pub highlight_color: i16,
}

impl Settings {
    pub fn merge(&mut self, other: Self) {
        if other.corpus_dir.is_some() {
            self.corpus_dir = other.corpus_dir;
        }
        self.base_url = other.base_url;
        self.case_sensitive_search = other.case_sensitive_search;
        self.page_size = other.page_size;
        self.narrow_width = other.narrow_width;
        self.history_capacity = other.history_capacity;
        self.highlight_favorites = other.highlight_favorites;
        self.dark_color_fg = other.dark_color_fg;
        self.dark_color_bg = other.dark_color_bg;
        self.light_color_fg = other.light_color_fg;
        self.light_color_bg = other.light_color_bg;
        self.highlight_color = other.highlight_color;
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            corpus_dir: None,
            base_url: String::new(),
            case_sensitive_search: true,
            page_size: DEFAULT_PAGE_SIZE,
            narrow_width: 80,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            highlight_favorites: true,
            dark_color_fg: 252,
            dark_color_bg: 235,
            light_color_fg: 238,
            light_color_bg: 253,
            highlight_color: 220,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    NextChapter,
    PrevChapter,
    BeginningOfCh,
    EndOfCh,
    Search,
    ToggleFavorite,
    ShowFavorites,
    BookList,
    SearchHistory,
    CopyVerse,
    CopyLink,
    Enlarge,
    Shrink,
    SwitchColor,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keymap {
    pub scroll_up: String,
    pub scroll_down: String,
    pub page_up: String,
    pub page_down: String,
    pub next_chapter: String,
    pub prev_chapter: String,
    pub beginning_of_ch: String,
    pub end_of_ch: String,
    pub search: String,
    pub toggle_favorite: String,
    pub show_favorites: String,
    pub book_list: String,
    pub search_history: String,
    pub copy_verse: String,
    pub copy_link: String,
    pub enlarge: String,
    pub shrink: String,
    pub switch_color: String,
    pub help: String,
    pub quit: String,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            scroll_up: "k".to_string(),
            scroll_down: "j".to_string(),
            page_up: "h".to_string(),
            page_down: "l".to_string(),
            next_chapter: "L".to_string(),
            prev_chapter: "H".to_string(),
            beginning_of_ch: "g".to_string(),
            end_of_ch: "G".to_string(),
            search: "/".to_string(),
            toggle_favorite: "b".to_string(),
            show_favorites: "B".to_string(),
            book_list: "t".to_string(),
            search_history: "r".to_string(),
            copy_verse: "y".to_string(),
            copy_link: "Y".to_string(),
            enlarge: "+".to_string(),
            shrink: "-".to_string(),
            switch_color: "c".to_string(),
            help: "?".to_string(),
            quit: "q".to_string(),
        }
    }
}

impl Keymap {
    pub fn merge(&mut self, other: Self) {
        self.scroll_up = other.scroll_up;
        self.scroll_down = other.scroll_down;
        self.page_up = other.page_up;
        self.page_down = other.page_down;
        self.next_chapter = other.next_chapter;
        self.prev_chapter = other.prev_chapter;
        self.beginning_of_ch = other.beginning_of_ch;
        self.end_of_ch = other.end_of_ch;
        self.search = other.search;
        self.toggle_favorite = other.toggle_favorite;
        self.show_favorites = other.show_favorites;
        self.book_list = other.book_list;
        self.search_history = other.search_history;
        self.copy_verse = other.copy_verse;
        self.copy_link = other.copy_link;
        self.enlarge = other.enlarge;
        self.shrink = other.shrink;
        self.switch_color = other.switch_color;
        self.help = other.help;
        self.quit = other.quit;
    }

    fn bindings(&self) -> [(&str, Action); 20] {
        [
            (self.scroll_up.as_str(), Action::ScrollUp),
            (self.scroll_down.as_str(), Action::ScrollDown),
            (self.page_up.as_str(), Action::PageUp),
            (self.page_down.as_str(), Action::PageDown),
            (self.next_chapter.as_str(), Action::NextChapter),
            (self.prev_chapter.as_str(), Action::PrevChapter),
            (self.beginning_of_ch.as_str(), Action::BeginningOfCh),
            (self.end_of_ch.as_str(), Action::EndOfCh),
            (self.search.as_str(), Action::Search),
            (self.toggle_favorite.as_str(), Action::ToggleFavorite),
            (self.show_favorites.as_str(), Action::ShowFavorites),
            (self.book_list.as_str(), Action::BookList),
            (self.search_history.as_str(), Action::SearchHistory),
            (self.copy_verse.as_str(), Action::CopyVerse),
            (self.copy_link.as_str(), Action::CopyLink),
            (self.enlarge.as_str(), Action::Enlarge),
            (self.shrink.as_str(), Action::Shrink),
            (self.switch_color.as_str(), Action::SwitchColor),
            (self.help.as_str(), Action::Help),
            (self.quit.as_str(), Action::Quit),
        ]
    }

    /// First action bound to the typed character.
    pub fn action_for(&self, c: char) -> Option<Action> {
        let mut buf = [0u8; 4];
        let typed: &str = c.encode_utf8(&mut buf);
        self.bindings()
            .into_iter()
            .find(|(key, _)| *key == typed)
            .map(|(_, action)| action)
    }

    /// Key shown in the help window for an action.
    pub fn key_for(&self, action: Action) -> &str {
        self.bindings()
            .into_iter()
            .find(|(_, a)| *a == action)
            .map(|(key, _)| key)
            .unwrap_or("")
    }
}
