mod state;

pub use state::{ApplicationState, MessageType, UiState};

use arboard::Clipboard;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::chapter::Location;
use crate::logging;
use crate::models::{FontSize, Theme, WindowType};
use crate::search::BookFilter;
use crate::session::Session;
use crate::settings::{Action, Settings};
use crate::ui::board::{Board, BoardStyle};
use crate::ui::windows::{
    books::BooksWindow,
    favorites::FavoritesWindow,
    help::HelpWindow,
    history::HistoryWindow,
    search::{SearchRow, SearchView, SearchWindow},
};

/// Main reader application struct
pub struct Reader {
    state: Rc<RefCell<ApplicationState>>,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    board: Board,
    /// Chapter, width and spacing the board was laid out for.
    board_key: Option<(String, u32, usize, usize)>,
    clipboard: Option<Clipboard>,
}

impl Reader {
    /// Create a new Reader instance
    pub fn new(session: Session, location: Option<Location>) -> eyre::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        let app_state = ApplicationState::new(session, location)?;

        let clipboard = match Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                logging::warn(format!("Clipboard unavailable: {}", err));
                None
            }
        };

        Ok(Self {
            state: Rc::new(RefCell::new(app_state)),
            terminal,
            board: Board::new(),
            board_key: None,
            clipboard,
        })
    }

    /// Run the main application loop
    pub fn run(&mut self) -> eyre::Result<()> {
        // Initialize terminal
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;

        self.terminal.clear()?;
        self.terminal.hide_cursor()?;

        let result = self.event_loop();

        // Cleanup terminal
        self.terminal.clear()?;
        self.terminal.show_cursor()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
        crossterm::terminal::disable_raw_mode()?;

        result
    }

    fn event_loop(&mut self) -> eyre::Result<()> {
        loop {
            if self.state.borrow().should_quit {
                break;
            }

            // Auto-clear expired messages before rendering
            {
                let mut state = self.state.borrow_mut();
                if state.ui_state.message_expired() {
                    state.ui_state.clear_message();
                }
            }

            let (term_width, term_height) = crossterm::terminal::size().unwrap_or((80, 24));
            self.prepare_frame(Rect::new(0, 0, term_width, term_height));

            // Render UI
            {
                let state = self.state.clone();
                let board = &self.board;
                self.terminal.draw(|f| {
                    let state_ref = state.borrow();
                    Self::render_static(f, &state_ref, board);
                })?;
            }

            // Poll with timeout so we can re-render when messages expire
            let poll_timeout = match self.state.borrow().ui_state.message_time {
                Some(t) => {
                    let expiry = Duration::from_secs(3);
                    expiry
                        .checked_sub(t.elapsed())
                        .unwrap_or(Duration::from_millis(100))
                }
                None => Duration::from_secs(60),
            };

            if !crossterm::event::poll(poll_timeout)? {
                continue;
            }

            // Resize needs no handling: the next frame lays the board out again
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }

        Ok(())
    }

    /// Lay the chapter out for the current size and keep the selected
    /// verse in view.
    fn prepare_frame(&mut self, frame_area: Rect) {
        let mut state = self.state.borrow_mut();
        let font_size = state.session.preferences.font_size();
        let content_area = Self::content_area(frame_area, font_size);
        let width = content_area.width as usize;
        let spacing = font_size.verse_spacing();

        let location = state.location();
        let key = (location.book.clone(), location.chapter, width, spacing);
        if self.board_key.as_ref() != Some(&key) {
            self.board = match state.reader.chapter() {
                Ok(chapter) => Board::layout(&chapter, width, spacing),
                Err(err) => {
                    logging::error(format!("Could not lay out {} {}: {}", key.0, key.1, err));
                    Board::new()
                }
            };
            self.board_key = Some(key);
        }

        let height = content_area.height as usize;
        let mut row = state.row.min(self.board.max_row(height));
        if let Some(verse) = state.selected_verse {
            row = self.board.scroll_to_show(row, height, verse);
        }
        state.row = row;

        state.fit_page_size(frame_area.width);
    }

    fn content_area(frame_area: Rect, font_size: FontSize) -> Rect {
        let chunks = Self::frame_chunks(frame_area);
        let main = chunks[2];
        let width = (main.width as u32 * font_size.width_percent() as u32 / 100) as u16;
        let left_pad = main.width.saturating_sub(width) / 2;
        Rect {
            x: main.x + left_pad,
            y: main.y,
            width,
            height: main.height,
        }
    }

    fn frame_chunks(frame_area: Rect) -> std::rc::Rc<[Rect]> {
        Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame_area)
    }

    /// Handle keyboard input events. Failures of an action are shown to
    /// the user instead of ending the session.
    fn handle_key_event(&mut self, key: KeyEvent) {
        {
            let mut state = self.state.borrow_mut();
            if state.ui_state.message.is_some()
                && state.ui_state.active_window == WindowType::Reader
            {
                state.ui_state.clear_message();
            }
        }

        let active_window = self.state.borrow().ui_state.active_window.clone();

        // Handle count prefix (number repetition)
        if active_window == WindowType::Reader {
            if let KeyCode::Char(c) = key.code {
                if c.is_ascii_digit() && !(c == '0' && self.state.borrow().count_prefix.is_empty()) {
                    let mut state = self.state.borrow_mut();
                    if state.count_prefix.len() < 4 {
                        state.count_prefix.push(c);
                    }
                    return;
                }
            }
        }

        let repeat_count = {
            let state = self.state.borrow();
            state.count_prefix.parse().unwrap_or(1usize)
        };

        let result = match active_window {
            WindowType::Search => self.handle_search_mode_keys(key),
            WindowType::Books => self.handle_books_mode_keys(key, repeat_count),
            WindowType::Favorites => self.handle_favorites_mode_keys(key, repeat_count),
            WindowType::History => self.handle_history_mode_keys(key, repeat_count),
            WindowType::Help => self.handle_help_mode_keys(key, repeat_count),
            WindowType::Reader => self.handle_normal_mode_keys(key, repeat_count),
        };

        let mut state = self.state.borrow_mut();
        state.count_prefix.clear();
        if let Err(err) = result {
            logging::error(format!("{:#}", err));
            state.ui_state.set_message(err.to_string(), MessageType::Error);
        }
    }

    /// Handle keys in normal reading mode
    fn handle_normal_mode_keys(&mut self, key: KeyEvent, repeat_count: usize) -> eyre::Result<()> {
        let steps = repeat_count as isize;
        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
            KeyCode::Char(c) => self.state.borrow().session.config.keymap.action_for(c),
            KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Left | KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Right | KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Home => Some(Action::BeginningOfCh),
            KeyCode::End => Some(Action::EndOfCh),
            _ => None,
        };
        let Some(action) = action else {
            return Ok(());
        };

        let mut state = self.state.borrow_mut();
        match action {
            Action::ScrollDown => state.move_selection(steps),
            Action::ScrollUp => state.move_selection(-steps),
            Action::PageDown | Action::PageUp => {
                let (_, term_height) = crossterm::terminal::size().unwrap_or((80, 24));
                let height = Self::frame_chunks(Rect::new(0, 0, 80, term_height))[2].height as usize;
                let delta = (height * repeat_count) as isize;
                let target = if action == Action::PageDown {
                    state.row.saturating_add_signed(delta)
                } else {
                    state.row.saturating_add_signed(-delta)
                };
                state.row = target.min(self.board.max_row(height));
                state.selected_verse = self
                    .board
                    .verse_from_row(state.row)
                    .or(state.selected_verse);
            }
            Action::BeginningOfCh => state.select_first(),
            Action::EndOfCh => state.select_last(),
            Action::NextChapter => {
                for _ in 0..repeat_count {
                    state.next_chapter()?;
                }
            }
            Action::PrevChapter => {
                for _ in 0..repeat_count {
                    state.previous_chapter()?;
                }
            }
            Action::Search => state.ui_state.open_window(WindowType::Search),
            Action::ToggleFavorite => state.toggle_favorite()?,
            Action::ShowFavorites => state.ui_state.open_window(WindowType::Favorites),
            Action::BookList => state.open_books(),
            Action::SearchHistory => state.ui_state.open_window(WindowType::History),
            Action::CopyVerse => {
                let text = state.selected_verse_text();
                drop(state);
                if let Some(text) = text {
                    self.copy_to_clipboard(text, "verse");
                }
            }
            Action::CopyLink => {
                let link = state.selected_verse_link();
                drop(state);
                if let Some(link) = link {
                    self.copy_to_clipboard(link, "link");
                }
            }
            Action::Enlarge => state.enlarge()?,
            Action::Shrink => state.shrink()?,
            Action::SwitchColor => state.toggle_theme()?,
            Action::Help => state.ui_state.open_window(WindowType::Help),
            Action::Quit => state.should_quit = true,
        }
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: String, what: &str) {
        let result = match self.clipboard.as_mut() {
            Some(clipboard) => clipboard.set_text(text).map_err(|err| err.to_string()),
            None => Err("no clipboard available".to_string()),
        };
        let mut state = self.state.borrow_mut();
        match result {
            Ok(()) => state
                .ui_state
                .set_message(format!("Copied {}", what), MessageType::Info),
            Err(err) => {
                logging::warn(format!("Copy failed: {}", err));
                state
                    .ui_state
                    .set_message(format!("Could not copy {}: {}", what, err), MessageType::Warning);
            }
        }
    }

    fn handle_search_mode_keys(&mut self, key: KeyEvent) -> eyre::Result<()> {
        let mut state = self.state.borrow_mut();
        match key.code {
            KeyCode::Enter => {
                if state.ui_state.search_dirty {
                    state.submit_search()?;
                } else {
                    state.open_selected_result()?;
                }
            }
            KeyCode::Esc => state.ui_state.open_window(WindowType::Reader),
            KeyCode::Tab => state.cycle_search_filter(),
            KeyCode::Backspace => state.search_backspace(),
            KeyCode::Down => state.search_select(1),
            KeyCode::Up => state.search_select(-1),
            KeyCode::Right | KeyCode::PageDown => state.search_change_page(1),
            KeyCode::Left | KeyCode::PageUp => state.search_change_page(-1),
            KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                state.toggle_result_favorite()?
            }
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                state.cycle_page_size()
            }
            KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let text = state.selected_result_text();
                drop(state);
                if let Some(text) = text {
                    self.copy_to_clipboard(text, "verse");
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let link = state.selected_result_link();
                drop(state);
                if let Some(link) = link {
                    self.copy_to_clipboard(link, "link");
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                state.search_input(c)
            }
            _ => {}
        }
        Ok(())
    }

    /// Shared list movement; returns true when the key was consumed.
    fn handle_list_nav(key: &KeyEvent, repeat_count: usize, select: impl FnOnce(isize)) -> bool {
        let steps = repeat_count as isize;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                select(steps);
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                select(-steps);
                true
            }
            _ => false,
        }
    }

    fn handle_books_mode_keys(&mut self, key: KeyEvent, repeat_count: usize) -> eyre::Result<()> {
        let mut state = self.state.borrow_mut();
        if Self::handle_list_nav(&key, repeat_count, |delta| state.books_select(delta)) {
            return Ok(());
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => state.books_enter()?,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Left => {
                if !state.books_back() {
                    state.ui_state.open_window(WindowType::Reader);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_favorites_mode_keys(&mut self, key: KeyEvent, repeat_count: usize) -> eyre::Result<()> {
        let mut state = self.state.borrow_mut();
        if Self::handle_list_nav(&key, repeat_count, |delta| state.favorites_select(delta)) {
            return Ok(());
        }
        match key.code {
            KeyCode::Enter => state.open_selected_favorite()?,
            KeyCode::Char('d') | KeyCode::Delete => state.remove_selected_favorite()?,
            KeyCode::Right | KeyCode::Char('l') => state.favorites_change_page(1),
            KeyCode::Left | KeyCode::Char('h') => state.favorites_change_page(-1),
            KeyCode::Char('p') => state.cycle_page_size(),
            KeyCode::Char('y') => {
                let text = state.selected_favorite_text();
                drop(state);
                if let Some(text) = text {
                    self.copy_to_clipboard(text, "verse");
                }
            }
            KeyCode::Char('Y') => {
                let link = state.selected_favorite_link();
                drop(state);
                if let Some(link) = link {
                    self.copy_to_clipboard(link, "link");
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => state.ui_state.open_window(WindowType::Reader),
            _ => {}
        }
        Ok(())
    }

    fn handle_history_mode_keys(&mut self, key: KeyEvent, repeat_count: usize) -> eyre::Result<()> {
        let mut state = self.state.borrow_mut();
        if Self::handle_list_nav(&key, repeat_count, |delta| state.history_select(delta)) {
            return Ok(());
        }
        match key.code {
            KeyCode::Enter => state.run_selected_history()?,
            KeyCode::Char('d') | KeyCode::Delete => state.delete_selected_history()?,
            KeyCode::Char('D') => state.clear_history()?,
            KeyCode::Esc | KeyCode::Char('q') => state.ui_state.open_window(WindowType::Reader),
            _ => {}
        }
        Ok(())
    }

    fn handle_help_mode_keys(&mut self, key: KeyEvent, repeat_count: usize) -> eyre::Result<()> {
        let (term_width, term_height) = crossterm::terminal::size().unwrap_or((80, 24));
        let mut state = self.state.borrow_mut();
        let max_offset = HelpWindow::max_scroll_offset(
            Rect::new(0, 0, term_width, term_height),
            &state.session.config.keymap,
        );

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                state.ui_state.open_window(WindowType::Reader);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                state.ui_state.help_scroll_offset = state
                    .ui_state
                    .help_scroll_offset
                    .saturating_add(repeat_count as u16)
                    .min(max_offset);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                state.ui_state.help_scroll_offset = state
                    .ui_state
                    .help_scroll_offset
                    .saturating_sub(repeat_count as u16);
            }
            _ => {}
        }
        Ok(())
    }

    fn theme_style(settings: &Settings, theme: Theme, selected_verse: Option<u32>) -> BoardStyle {
        let indexed = |value: i16| u8::try_from(value).map(Color::Indexed).unwrap_or(Color::Reset);
        let (fg, bg) = match theme {
            Theme::Dark => (settings.dark_color_fg, settings.dark_color_bg),
            Theme::Light => (settings.light_color_fg, settings.light_color_bg),
        };
        BoardStyle {
            fg: indexed(fg),
            bg: indexed(bg),
            accent: indexed(settings.highlight_color),
            selected_verse,
        }
    }

    fn render_static(frame: &mut Frame, state: &ApplicationState, board: &Board) {
        // Main reader view
        Self::render_reader_static(frame, state, board);

        let area = frame.area();
        match state.ui_state.active_window {
            WindowType::Help => HelpWindow::render(
                frame,
                area,
                &state.session.config.keymap,
                state.ui_state.help_scroll_offset,
            ),
            WindowType::Books => {
                let corpus = &state.session.corpus;
                let open_book = state
                    .ui_state
                    .open_book
                    .as_deref()
                    .map(|book| (book, corpus.chapter_labels(book)));
                BooksWindow::render(
                    frame,
                    area,
                    corpus.books(),
                    state.ui_state.books_selected_index,
                    open_book,
                    state.ui_state.chapters_selected_index,
                );
            }
            WindowType::Favorites => FavoritesWindow::render(
                frame,
                area,
                state.favorites_on_page(),
                state.ui_state.favorites_selected_index,
                state.ui_state.favorites_page,
                state.favorites_page_count(),
            ),
            WindowType::History => HistoryWindow::render(
                frame,
                area,
                state.session.history.keywords(),
                state.ui_state.history_selected_index,
            ),
            WindowType::Search => {
                let engine = &state.session.search;
                let filter = match &state.ui_state.search_filter {
                    BookFilter::All => "all books",
                    BookFilter::Book(book) => book.as_str(),
                };
                let results = if state.ui_state.search_dirty {
                    Vec::new()
                } else {
                    engine
                        .current_page()
                        .into_iter()
                        .map(|verse| SearchRow {
                            reference: verse.reference(),
                            segments: engine.highlight(&verse.content),
                            favorite: state.is_favorite_verse(verse),
                        })
                        .collect()
                };
                let view = SearchView {
                    query: &state.ui_state.search_query,
                    filter,
                    results,
                    selected_index: state.ui_state.selected_search_result,
                    page: engine.page(),
                    page_count: engine.page_count(),
                    total: engine.total(),
                    searched: !state.ui_state.search_dirty,
                };
                SearchWindow::render(frame, area, &view);
            }
            WindowType::Reader => {}
        }

        // Render message if present
        if let Some(ref message) = state.ui_state.message {
            Self::render_message_static(frame, message, &state.ui_state.message_type);
        }
    }

    fn render_reader_static(frame: &mut Frame, state: &ApplicationState, board: &Board) {
        let frame_area = frame.area();
        let chunks = Self::frame_chunks(frame_area);
        let settings = &state.session.config.settings;
        let preferences = &state.session.preferences;
        let style = Self::theme_style(settings, preferences.theme(), state.selected_verse);

        frame.render_widget(Block::default().style(Style::default().bg(style.bg)), frame_area);

        let position = match state.selected_verse {
            Some(verse) => format!("{}:{}", state.location().chapter, verse),
            None => state.location().chapter.to_string(),
        };
        let header_line = Self::build_header_line(board.title(), Some(&position), chunks[0].width);
        frame.render_widget(
            Paragraph::new(Line::from(header_line)).style(Style::default().fg(style.fg).bg(style.bg)),
            chunks[0],
        );

        let content_area = Self::content_area(frame_area, preferences.font_size());
        let highlight_favorites = settings.highlight_favorites;
        board.render(frame, content_area, state.row, &style, |verse| {
            highlight_favorites && state.is_favorite(verse)
        });

        let keymap = &state.session.config.keymap;
        let footer = format!(
            "{} help  {} search  {} favorite  {} books  ★ {}",
            keymap.key_for(Action::Help),
            keymap.key_for(Action::Search),
            keymap.key_for(Action::ToggleFavorite),
            keymap.key_for(Action::BookList),
            state.session.favorites.len(),
        );
        frame.render_widget(
            Paragraph::new(footer).style(Style::default().fg(style.accent).bg(style.bg)),
            chunks[3],
        );
    }

    fn build_header_line(title: &str, right_text: Option<&str>, width: u16) -> String {
        let width = width as usize;
        if width == 0 {
            return String::new();
        }

        let right_len = right_text.map(textwrap::core::display_width).unwrap_or(0);
        let content_width = if right_len > 0 {
            width.saturating_sub(right_len + 1)
        } else {
            width
        };

        let mut title_text = String::new();
        for ch in title.chars() {
            let candidate = format!("{}{}", title_text, ch);
            if textwrap::core::display_width(&candidate) > content_width {
                break;
            }
            title_text = candidate;
        }
        let title_width = textwrap::core::display_width(&title_text);
        let title_start = content_width.saturating_sub(title_width) / 2;

        let mut line = " ".repeat(title_start);
        line.push_str(&title_text);
        if let Some(right_text) = right_text {
            let used = title_start + title_width;
            line.push_str(&" ".repeat(width.saturating_sub(used + right_len)));
            line.push_str(right_text);
        }
        line
    }

    fn render_message_static(frame: &mut Frame, message: &str, message_type: &MessageType) {
        let color = match message_type {
            MessageType::Info => Color::Blue,
            MessageType::Warning => Color::Yellow,
            MessageType::Error => Color::Red,
        };

        let message_paragraph = Paragraph::new(message)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });

        let frame_area = frame.area();
        let area = Rect {
            x: frame_area.x + 2,
            y: frame_area.y + 2,
            width: frame_area.width.saturating_sub(4),
            height: 3.min(frame_area.height.saturating_sub(2)),
        };

        frame.render_widget(Clear, area);
        frame.render_widget(message_paragraph, area);
    }
}
