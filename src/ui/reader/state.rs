use eyre::Result;
use std::time::{Duration, Instant};

use crate::chapter::{ChapterReader, Location};
use crate::error::Error;
use crate::favorites::Toggle;
use crate::models::{FavoriteEntry, Verse, WindowType};
use crate::pagination::{PAGE_SIZE_OPTIONS, page_count, page_size_for_width};
use crate::search::BookFilter;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Warning,
    Error,
}

/// UI-specific state management
#[derive(Debug, Clone)]
pub struct UiState {
    pub active_window: WindowType,
    pub search_query: String,
    pub search_filter: BookFilter,
    /// Query or filter edited since the last search ran.
    pub search_dirty: bool,
    pub selected_search_result: usize,
    pub books_selected_index: usize,
    /// Book whose chapter list is shown in the books window.
    pub open_book: Option<String>,
    pub chapters_selected_index: usize,
    pub favorites_page: usize,
    pub favorites_selected_index: usize,
    pub history_selected_index: usize,
    pub help_scroll_offset: u16,
    /// Rows per page in the search and favorites lists.
    pub page_size: usize,
    pub message: Option<String>,
    pub message_type: MessageType,
    pub message_time: Option<Instant>,
}

impl UiState {
    pub fn new(page_size: usize) -> Self {
        Self {
            active_window: WindowType::Reader,
            search_query: String::new(),
            search_filter: BookFilter::All,
            search_dirty: true,
            selected_search_result: 0,
            books_selected_index: 0,
            open_book: None,
            chapters_selected_index: 0,
            favorites_page: 1,
            favorites_selected_index: 0,
            history_selected_index: 0,
            help_scroll_offset: 0,
            page_size: page_size.max(1),
            message: None,
            message_type: MessageType::Info,
            message_time: None,
        }
    }

    pub fn set_message(&mut self, message: String, message_type: MessageType) {
        self.message = Some(message);
        self.message_type = message_type;
        self.message_time = Some(Instant::now());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_time = None;
    }

    /// Returns true if the current message has expired (older than 3 seconds).
    pub fn message_expired(&self) -> bool {
        self.message_time
            .is_some_and(|t| t.elapsed() >= Duration::from_secs(3))
    }

    pub fn open_window(&mut self, window_type: WindowType) {
        match window_type {
            WindowType::Help => self.help_scroll_offset = 0,
            WindowType::Search => self.selected_search_result = 0,
            WindowType::Books => {
                self.open_book = None;
                self.chapters_selected_index = 0;
            }
            WindowType::Favorites => {
                self.favorites_page = 1;
                self.favorites_selected_index = 0;
            }
            WindowType::History => self.history_selected_index = 0,
            WindowType::Reader => {}
        }
        self.active_window = window_type;
    }
}

fn step(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}

/// Application state that encompasses all UI and reading state
pub struct ApplicationState {
    pub session: Session,
    pub reader: ChapterReader,
    pub selected_verse: Option<u32>,
    /// First display row of the chapter view.
    pub row: usize,
    pub ui_state: UiState,
    pub should_quit: bool,
    pub count_prefix: String, // For command repetition (e.g., "5j")
    /// Page size used on wide terminals: the configured one until the user
    /// picks another.
    preferred_page_size: usize,
    /// Whether the terminal was narrow when the page size was last fitted.
    narrow: Option<bool>,
}

impl ApplicationState {
    pub fn new(session: Session, location: Option<Location>) -> Result<Self> {
        let reader = session.reader_at(location.clone())?;
        let page_size = session.config.settings.page_size.max(1);
        let ui_state = UiState::new(page_size);
        let mut state = Self {
            session,
            reader,
            selected_verse: None,
            row: 0,
            ui_state,
            should_quit: false,
            count_prefix: String::new(),
            preferred_page_size: page_size,
            narrow: None,
        };
        state.select_after_open(location.and_then(|l| l.verse));
        Ok(state)
    }

    pub fn location(&self) -> &Location {
        self.reader.location()
    }

    /// Verse numbers of the open chapter.
    pub fn verses(&self) -> Vec<u32> {
        self.reader
            .chapter()
            .map(|chapter| chapter.verses.iter().filter_map(|v| v.verse_number()).collect())
            .unwrap_or_default()
    }

    fn select_after_open(&mut self, verse: Option<u32>) {
        let verses = self.verses();
        self.selected_verse = verse
            .filter(|v| verses.contains(v))
            .or_else(|| verses.first().copied());
    }

    pub fn move_selection(&mut self, delta: isize) {
        let verses = self.verses();
        let current = self
            .selected_verse
            .and_then(|v| verses.iter().position(|&n| n == v))
            .unwrap_or(0);
        self.selected_verse = verses.get(step(current, delta, verses.len())).copied();
    }

    pub fn select_first(&mut self) {
        self.selected_verse = self.verses().first().copied();
    }

    pub fn select_last(&mut self) {
        self.selected_verse = self.verses().last().copied();
    }

    pub fn open_location(&mut self, location: Location) -> Result<()> {
        let verse = location.verse;
        self.reader.go_to(Location::new(&location.book, location.chapter))?;
        self.row = 0;
        self.select_after_open(verse);
        Ok(())
    }

    pub fn next_chapter(&mut self) -> Result<()> {
        match self.reader.next_location() {
            Some(location) => self.open_location(location),
            None => {
                self.ui_state
                    .set_message("Already at the last chapter".to_string(), MessageType::Info);
                Ok(())
            }
        }
    }

    pub fn previous_chapter(&mut self) -> Result<()> {
        match self.reader.previous_location() {
            Some(location) => self.open_location(location),
            None => {
                self.ui_state
                    .set_message("Already at the first chapter".to_string(), MessageType::Info);
                Ok(())
            }
        }
    }

    pub fn is_favorite(&self, verse: u32) -> bool {
        self.reader.is_favorite(verse, &self.session.favorites)
    }

    pub fn toggle_favorite(&mut self) -> Result<()> {
        let Some(verse) = self.selected_verse else {
            return Ok(());
        };
        let toggle = self.reader.toggle_favorite(verse, &mut self.session.favorites)?;
        let reference = self.location().clone().with_verse(verse);
        let message = match toggle {
            Toggle::Added => format!("Added {} to favorites", reference),
            Toggle::Removed => format!("Removed {} from favorites", reference),
        };
        self.ui_state.set_message(message, MessageType::Info);
        Ok(())
    }

    fn selected(&self) -> Option<&Verse> {
        let verse = self.selected_verse?;
        let location = self.location();
        self.session.corpus.verse(&location.book, location.chapter, verse)
    }

    pub fn selected_verse_text(&self) -> Option<String> {
        self.selected().map(Verse::copy_text)
    }

    pub fn selected_verse_link(&self) -> Option<String> {
        let verse = self.selected_verse?;
        let location = self.location().clone().with_verse(verse);
        Some(location.url(&self.session.config.settings.base_url))
    }

    pub fn toggle_theme(&mut self) -> Result<()> {
        let theme = self.session.preferences.toggle_theme()?;
        self.ui_state
            .set_message(format!("Theme: {}", theme), MessageType::Info);
        Ok(())
    }

    pub fn enlarge(&mut self) -> Result<()> {
        let size = self.session.preferences.font_size().enlarged();
        self.session.preferences.set_font_size(size)
    }

    pub fn shrink(&mut self) -> Result<()> {
        let size = self.session.preferences.font_size().shrunk();
        self.session.preferences.set_font_size(size)
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        if page_size == self.ui_state.page_size {
            return;
        }
        self.ui_state.page_size = page_size;
        self.ui_state.favorites_page = 1;
        self.ui_state.favorites_selected_index = 0;
        self.ui_state.selected_search_result = 0;
        self.session.search.change_page(1, Some(page_size));
    }

    /// Apply the narrow-terminal page size when the width crosses the
    /// threshold; otherwise leave the current size alone.
    pub fn fit_page_size(&mut self, width: u16) {
        let narrow_width = self.session.config.settings.narrow_width;
        let narrow = width <= narrow_width;
        if self.narrow == Some(narrow) {
            return;
        }
        self.narrow = Some(narrow);
        self.set_page_size(page_size_for_width(width, narrow_width, self.preferred_page_size));
    }

    /// Step through the offered page sizes, wrapping around.
    pub fn cycle_page_size(&mut self) {
        let current = self.ui_state.page_size;
        let next = PAGE_SIZE_OPTIONS
            .iter()
            .copied()
            .find(|&size| size > current)
            .unwrap_or(PAGE_SIZE_OPTIONS[0]);
        self.preferred_page_size = next;
        self.set_page_size(next);
        self.ui_state
            .set_message(format!("{} per page", next), MessageType::Info);
    }

    // Search window

    pub fn search_input(&mut self, c: char) {
        self.ui_state.search_query.push(c);
        self.ui_state.search_dirty = true;
    }

    pub fn search_backspace(&mut self) {
        self.ui_state.search_query.pop();
        self.ui_state.search_dirty = true;
    }

    /// Move the book filter through "all" and then every book in order.
    pub fn cycle_search_filter(&mut self) {
        let books = self.session.corpus.books();
        let next = match &self.ui_state.search_filter {
            BookFilter::All => books.first(),
            BookFilter::Book(name) => books
                .iter()
                .position(|b| &b.name == name)
                .and_then(|i| books.get(i + 1)),
        };
        self.ui_state.search_filter = match next {
            Some(book) => BookFilter::Book(book.name.clone()),
            None => BookFilter::All,
        };
        self.ui_state.search_dirty = true;
    }

    pub fn submit_search(&mut self) -> Result<()> {
        self.session.search.change_page(1, Some(self.ui_state.page_size));
        let filter = self.ui_state.search_filter.clone();
        if !self.session.search(&self.ui_state.search_query, filter)? {
            return Ok(());
        }
        self.ui_state.search_dirty = false;
        self.ui_state.selected_search_result = 0;
        if self.session.search.total() == 0 {
            let keyword = self.session.search.searched_keyword().unwrap_or_default();
            self.ui_state
                .set_message(format!("No verses contain \"{}\"", keyword), MessageType::Info);
        }
        Ok(())
    }

    pub fn search_select(&mut self, delta: isize) {
        if self.ui_state.search_dirty {
            return;
        }
        let len = self.session.search.current_page().len();
        self.ui_state.selected_search_result = step(self.ui_state.selected_search_result, delta, len);
    }

    /// Page through the shown results; no-op while they are hidden behind
    /// an edited query.
    pub fn search_change_page(&mut self, delta: isize) {
        if self.ui_state.search_dirty {
            return;
        }
        let engine = &mut self.session.search;
        let count = engine.page_count();
        if count == 0 {
            return;
        }
        let page = engine.page().saturating_add_signed(delta).clamp(1, count);
        engine.change_page(page, None);
        self.ui_state.selected_search_result = 0;
    }

    fn selected_result(&self) -> Option<&Verse> {
        if self.ui_state.search_dirty {
            return None;
        }
        self.session
            .search
            .current_page()
            .get(self.ui_state.selected_search_result)
            .copied()
    }

    pub fn is_favorite_verse(&self, verse: &Verse) -> bool {
        verse
            .composite_id()
            .is_some_and(|id| self.session.favorites.contains(&id))
    }

    pub fn toggle_result_favorite(&mut self) -> Result<()> {
        let Some(verse) = self.selected_result() else {
            return Ok(());
        };
        let (Some(chapter), Some(number)) = (verse.chapter_number(), verse.verse_number()) else {
            return Err(Error::InvalidLocation(verse.reference()).into());
        };
        let (book, content) = (verse.book.clone(), verse.content.clone());

        let toggle = self
            .session
            .favorites
            .toggle(&book, &chapter.to_string(), &content, number)?;
        let reference = Location::new(&book, chapter).with_verse(number);
        let message = match toggle {
            Toggle::Added => format!("Added {} to favorites", reference),
            Toggle::Removed => format!("Removed {} from favorites", reference),
        };
        self.ui_state.set_message(message, MessageType::Info);
        Ok(())
    }

    pub fn selected_result_text(&self) -> Option<String> {
        self.selected_result().map(Verse::copy_text)
    }

    pub fn selected_result_link(&self) -> Option<String> {
        let location = Location::of_verse(self.selected_result()?)?;
        Some(location.url(&self.session.config.settings.base_url))
    }

    pub fn open_selected_result(&mut self) -> Result<()> {
        let location = self.selected_result().and_then(Location::of_verse);
        if let Some(location) = location {
            self.open_location(location)?;
            self.ui_state.open_window(WindowType::Reader);
        }
        Ok(())
    }

    // Books window

    pub fn open_books(&mut self) {
        self.ui_state.open_window(WindowType::Books);
        self.ui_state.books_selected_index = self
            .session
            .corpus
            .book_index(&self.reader.location().book)
            .unwrap_or(0);
    }

    pub fn books_select(&mut self, delta: isize) {
        match &self.ui_state.open_book {
            Some(book) => {
                let len = self.session.corpus.chapter_count(book) as usize;
                self.ui_state.chapters_selected_index =
                    step(self.ui_state.chapters_selected_index, delta, len);
            }
            None => {
                let len = self.session.corpus.books().len();
                self.ui_state.books_selected_index =
                    step(self.ui_state.books_selected_index, delta, len);
            }
        }
    }

    /// Pick the selected book, then the selected chapter of it.
    pub fn books_enter(&mut self) -> Result<()> {
        match self.ui_state.open_book.clone() {
            None => {
                let Some(book) = self.session.corpus.books().get(self.ui_state.books_selected_index) else {
                    return Ok(());
                };
                let name = book.name.clone();
                let location = self.reader.location();
                self.ui_state.chapters_selected_index = if location.book == name {
                    location.chapter.saturating_sub(1) as usize
                } else {
                    0
                };
                self.ui_state.open_book = Some(name);
            }
            Some(book) => {
                let chapter = self.ui_state.chapters_selected_index as u32 + 1;
                self.open_location(Location::new(&book, chapter))?;
                self.ui_state.open_window(WindowType::Reader);
            }
        }
        Ok(())
    }

    /// Back from a chapter list to the book list; false when already there.
    pub fn books_back(&mut self) -> bool {
        self.ui_state.open_book.take().is_some()
    }

    // Favorites window

    pub fn favorites_on_page(&self) -> &[FavoriteEntry] {
        self.session
            .favorites
            .list(self.ui_state.favorites_page, self.ui_state.page_size)
    }

    pub fn favorites_page_count(&self) -> usize {
        page_count(self.session.favorites.len(), self.ui_state.page_size)
    }

    pub fn favorites_select(&mut self, delta: isize) {
        let len = self.favorites_on_page().len();
        self.ui_state.favorites_selected_index =
            step(self.ui_state.favorites_selected_index, delta, len);
    }

    pub fn favorites_change_page(&mut self, delta: isize) {
        let count = self.favorites_page_count().max(1);
        self.ui_state.favorites_page = self
            .ui_state
            .favorites_page
            .saturating_add_signed(delta)
            .clamp(1, count);
        self.ui_state.favorites_selected_index = 0;
    }

    pub fn open_selected_favorite(&mut self) -> Result<()> {
        let Some(entry) = self
            .favorites_on_page()
            .get(self.ui_state.favorites_selected_index)
            .cloned()
        else {
            return Ok(());
        };
        let chapter: u32 = entry
            .chapter
            .parse()
            .map_err(|_| Error::InvalidLocation(entry.id.clone()))?;
        self.open_location(Location::new(&entry.book_name, chapter).with_verse(entry.verse_number))?;
        self.ui_state.open_window(WindowType::Reader);
        Ok(())
    }

    fn selected_favorite(&self) -> Option<&FavoriteEntry> {
        self.favorites_on_page()
            .get(self.ui_state.favorites_selected_index)
    }

    /// Favorites copy their bare content.
    pub fn selected_favorite_text(&self) -> Option<String> {
        self.selected_favorite().map(|entry| entry.content.clone())
    }

    pub fn selected_favorite_link(&self) -> Option<String> {
        let entry = self.selected_favorite()?;
        let chapter = entry.chapter.parse().ok()?;
        let location = Location::new(&entry.book_name, chapter).with_verse(entry.verse_number);
        Some(location.url(&self.session.config.settings.base_url))
    }

    pub fn remove_selected_favorite(&mut self) -> Result<()> {
        let Some(id) = self
            .favorites_on_page()
            .get(self.ui_state.favorites_selected_index)
            .map(|entry| entry.id.clone())
        else {
            return Ok(());
        };
        if let Some(entry) = self.session.favorites.remove(&id)? {
            self.ui_state
                .set_message(format!("Removed {} from favorites", entry.reference()), MessageType::Info);
        }

        // Stay on a page that still has entries
        let count = self.favorites_page_count().max(1);
        self.ui_state.favorites_page = self.ui_state.favorites_page.min(count);
        let len = self.favorites_on_page().len();
        self.ui_state.favorites_selected_index = self
            .ui_state
            .favorites_selected_index
            .min(len.saturating_sub(1));
        Ok(())
    }

    // History window

    pub fn history_select(&mut self, delta: isize) {
        let len = self.session.history.keywords().len();
        self.ui_state.history_selected_index =
            step(self.ui_state.history_selected_index, delta, len);
    }

    /// Search again for the selected keyword and show the results.
    pub fn run_selected_history(&mut self) -> Result<()> {
        let Some(keyword) = self
            .session
            .history
            .keywords()
            .get(self.ui_state.history_selected_index)
            .cloned()
        else {
            return Ok(());
        };
        self.ui_state.search_query = keyword;
        self.ui_state.open_window(WindowType::Search);
        self.submit_search()
    }

    pub fn delete_selected_history(&mut self) -> Result<()> {
        let Some(keyword) = self
            .session
            .history
            .keywords()
            .get(self.ui_state.history_selected_index)
            .cloned()
        else {
            return Ok(());
        };
        self.session.history.remove(&keyword)?;
        self.history_select(0);
        Ok(())
    }

    pub fn clear_history(&mut self) -> Result<()> {
        self.session.history.clear()?;
        self.ui_state.history_selected_index = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CONFIG_FILE, Config};
    use crate::corpus::Corpus;
    use crate::models::{BookInfo, FontSize, chapter_label, section_label};
    use crate::storage::{MemoryStorage, shared};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn verse(id: u32, book: &str, chapter: u32, section: u32, content: &str) -> Verse {
        Verse {
            id,
            book: book.to_string(),
            book_eng: String::new(),
            chapter: chapter_label(chapter),
            section: section_label(section),
            content: content.to_string(),
            is_favorite: false,
            is_bookmark: false,
        }
    }

    fn state() -> ApplicationState {
        let books = vec![
            BookInfo { name: "甲".to_string(), chapter_num: 2 },
            BookInfo { name: "乙".to_string(), chapter_num: 1 },
        ];
        let corpus = Corpus::new(
            books,
            HashMap::new(),
            vec![
                verse(1, "甲", 1, 1, "起初神創造天地"),
                verse(2, "甲", 1, 2, "地是空虛混沌"),
                verse(3, "甲", 1, 3, "神說要有光"),
                verse(4, "甲", 2, 1, "天地萬物都造齊了"),
                verse(5, "乙", 1, 1, "神愛世人"),
            ],
        );
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path().join(CONFIG_FILE)).unwrap();
        let session = Session::with_corpus(config, corpus, shared(MemoryStorage::new()));
        ApplicationState::new(session, None).unwrap()
    }

    #[test]
    fn test_opens_first_chapter_with_first_verse_selected() {
        let state = state();
        assert_eq!(state.location(), &Location::new("甲", 1));
        assert_eq!(state.selected_verse, Some(1));
        assert_eq!(state.verses(), vec![1, 2, 3]);
    }

    #[test]
    fn test_move_selection_is_clamped() {
        let mut state = state();
        state.move_selection(2);
        assert_eq!(state.selected_verse, Some(3));
        state.move_selection(5);
        assert_eq!(state.selected_verse, Some(3));
        state.move_selection(-10);
        assert_eq!(state.selected_verse, Some(1));
        state.select_last();
        assert_eq!(state.selected_verse, Some(3));
    }

    #[test]
    fn test_chapter_navigation_and_boundaries() {
        let mut state = state();
        state.previous_chapter().unwrap();
        assert_eq!(state.location(), &Location::new("甲", 1));
        assert!(state.ui_state.message.is_some());

        state.next_chapter().unwrap();
        state.next_chapter().unwrap();
        assert_eq!(state.location(), &Location::new("乙", 1));
        state.next_chapter().unwrap();
        assert_eq!(state.location(), &Location::new("乙", 1));
        state.previous_chapter().unwrap();
        assert_eq!(state.location(), &Location::new("甲", 2));
    }

    #[test]
    fn test_toggle_favorite_on_selected_verse() {
        let mut state = state();
        state.move_selection(1);
        state.toggle_favorite().unwrap();
        assert!(state.is_favorite(2));
        assert!(state.session.favorites.contains("甲-1-2"));
        state.toggle_favorite().unwrap();
        assert!(!state.is_favorite(2));
    }

    #[test]
    fn test_copy_text_and_link() {
        let mut state = state();
        state.session.config.settings.base_url = "https://bible.example/".to_string();
        assert_eq!(state.selected_verse_text().as_deref(), Some("甲 第 1 章:第 1 節 起初神創造天地"));
        assert_eq!(
            state.selected_verse_link().as_deref(),
            Some("https://bible.example/bible/甲/1#verse-1")
        );
    }

    #[test]
    fn test_search_flow() {
        let mut state = state();
        state.ui_state.open_window(WindowType::Search);
        for c in "神".chars() {
            state.search_input(c);
        }
        state.submit_search().unwrap();
        assert!(!state.ui_state.search_dirty);
        assert_eq!(state.session.search.total(), 3);
        assert_eq!(state.session.history.keywords(), &["神"]);

        state.search_select(2);
        state.open_selected_result().unwrap();
        assert_eq!(state.location(), &Location::new("乙", 1));
        assert_eq!(state.selected_verse, Some(1));
        assert_eq!(state.ui_state.active_window, WindowType::Reader);
    }

    #[test]
    fn test_search_filter_cycle() {
        let mut state = state();
        state.cycle_search_filter();
        assert_eq!(state.ui_state.search_filter, BookFilter::Book("甲".to_string()));
        state.cycle_search_filter();
        assert_eq!(state.ui_state.search_filter, BookFilter::Book("乙".to_string()));
        state.cycle_search_filter();
        assert_eq!(state.ui_state.search_filter, BookFilter::All);

        state.cycle_search_filter();
        state.ui_state.search_query = "神".to_string();
        state.submit_search().unwrap();
        assert_eq!(state.session.search.total(), 2);
    }

    #[test]
    fn test_search_pages() {
        let mut state = state();
        state.set_page_size(2);
        state.ui_state.search_query = "神".to_string();
        state.submit_search().unwrap();
        assert_eq!(state.session.search.page_count(), 2);
        state.search_change_page(1);
        assert_eq!(state.session.search.page(), 2);
        assert_eq!(state.session.search.current_page().len(), 1);
        state.search_change_page(5);
        assert_eq!(state.session.search.page(), 2);
        state.search_change_page(-5);
        assert_eq!(state.session.search.page(), 1);
    }

    #[test]
    fn test_page_keys_ignored_while_query_is_edited() {
        let mut state = state();
        state.set_page_size(2);
        state.ui_state.search_query = "神".to_string();
        state.submit_search().unwrap();

        state.search_input('光');
        state.search_change_page(1);
        state.search_select(1);
        assert_eq!(state.session.search.page(), 1);
        assert_eq!(state.ui_state.selected_search_result, 0);
    }

    #[test]
    fn test_page_size_choice_survives_until_width_threshold() {
        let mut state = state();
        state.fit_page_size(120);
        assert_eq!(state.ui_state.page_size, 10);

        state.cycle_page_size();
        assert_eq!(state.ui_state.page_size, 20);
        assert_eq!(state.session.search.page_size(), 20);
        state.fit_page_size(120);
        state.fit_page_size(100);
        assert_eq!(state.ui_state.page_size, 20);

        // Going narrow forces the small size; a choice made there sticks too
        state.fit_page_size(60);
        assert_eq!(state.ui_state.page_size, 5);
        state.cycle_page_size();
        assert_eq!(state.ui_state.page_size, 10);
        state.fit_page_size(60);
        assert_eq!(state.ui_state.page_size, 10);

        state.fit_page_size(120);
        assert_eq!(state.ui_state.page_size, 10);
        state.cycle_page_size();
        state.cycle_page_size();
        assert_eq!(state.ui_state.page_size, 50);
        state.cycle_page_size();
        assert_eq!(state.ui_state.page_size, 5);
    }

    #[test]
    fn test_favorite_and_copy_from_search_results() {
        let mut state = state();
        state.session.config.settings.base_url = "https://bible.example".to_string();
        state.ui_state.search_query = "神".to_string();
        state.submit_search().unwrap();

        state.toggle_result_favorite().unwrap();
        assert!(state.session.favorites.contains("甲-1-1"));
        assert!(state.is_favorite(1));
        let first = state.session.search.current_page()[0];
        assert!(state.is_favorite_verse(first));
        assert_eq!(state.ui_state.message.as_deref(), Some("Added 甲 1:1 to favorites"));

        state.search_select(2);
        assert_eq!(state.selected_result_text().as_deref(), Some("乙 第 1 章:第 1 節 神愛世人"));
        assert_eq!(
            state.selected_result_link().as_deref(),
            Some("https://bible.example/bible/乙/1#verse-1")
        );

        state.search_select(-2);
        state.toggle_result_favorite().unwrap();
        assert!(state.session.favorites.is_empty());

        // Nothing is selected while the results are hidden
        state.search_input('光');
        assert_eq!(state.selected_result_text(), None);
        state.toggle_result_favorite().unwrap();
        assert!(state.session.favorites.is_empty());
    }

    #[test]
    fn test_copy_from_favorites() {
        let mut state = state();
        state.session.config.settings.base_url = "https://bible.example".to_string();
        state.move_selection(2);
        state.toggle_favorite().unwrap();

        state.ui_state.open_window(WindowType::Favorites);
        assert_eq!(state.selected_favorite_text().as_deref(), Some("神說要有光"));
        assert_eq!(
            state.selected_favorite_link().as_deref(),
            Some("https://bible.example/bible/甲/1#verse-3")
        );

        state.remove_selected_favorite().unwrap();
        assert_eq!(state.selected_favorite_text(), None);
    }

    #[test]
    fn test_books_window() {
        let mut state = state();
        state.open_books();
        state.books_enter().unwrap();
        assert_eq!(state.ui_state.open_book.as_deref(), Some("甲"));
        state.books_select(1);
        state.books_enter().unwrap();
        assert_eq!(state.location(), &Location::new("甲", 2));
        assert_eq!(state.ui_state.active_window, WindowType::Reader);

        state.open_books();
        assert_eq!(state.ui_state.books_selected_index, 0);
        state.books_enter().unwrap();
        assert!(state.books_back());
        assert!(!state.books_back());
    }

    #[test]
    fn test_favorites_window() {
        let mut state = state();
        state.set_page_size(2);
        for _ in 0..3 {
            state.toggle_favorite().unwrap();
            state.move_selection(1);
        }
        assert_eq!(state.favorites_page_count(), 2);

        state.ui_state.open_window(WindowType::Favorites);
        state.favorites_change_page(1);
        assert_eq!(state.favorites_on_page().len(), 1);
        state.remove_selected_favorite().unwrap();
        assert_eq!(state.session.favorites.len(), 2);
        assert_eq!(state.ui_state.favorites_page, 1);

        state.favorites_select(1);
        state.open_selected_favorite().unwrap();
        assert_eq!(state.selected_verse, Some(2));
    }

    #[test]
    fn test_history_window() {
        let mut state = state();
        state.ui_state.search_query = "光".to_string();
        state.submit_search().unwrap();
        state.ui_state.search_query = "神".to_string();
        state.submit_search().unwrap();

        state.ui_state.open_window(WindowType::History);
        state.run_selected_history().unwrap();
        assert_eq!(state.ui_state.active_window, WindowType::Search);
        assert_eq!(state.session.search.searched_keyword(), Some("光"));
        assert_eq!(state.session.history.keywords().len(), 2);

        state.ui_state.open_window(WindowType::History);
        state.delete_selected_history().unwrap();
        assert_eq!(state.session.history.keywords(), &["神"]);
        state.clear_history().unwrap();
        assert!(state.session.history.keywords().is_empty());
    }

    #[test]
    fn test_preferences() {
        let mut state = state();
        let before = state.session.preferences.theme();
        state.toggle_theme().unwrap();
        assert_eq!(state.session.preferences.theme(), before.toggled());
        assert_ne!(state.session.preferences.theme(), before);

        state.enlarge().unwrap();
        state.enlarge().unwrap();
        state.enlarge().unwrap();
        assert_eq!(state.session.preferences.font_size(), FontSize::XLarge);
        state.shrink().unwrap();
        assert_eq!(state.session.preferences.font_size(), FontSize::Large);
    }
}
