use eyre::Result;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::chapter::{ChapterReader, Location};
use crate::config::{Config, get_app_data_prefix};
use crate::corpus::Corpus;
use crate::favorites::{FavoritesStore, Toggle};
use crate::history::SearchHistory;
use crate::logging;
use crate::preferences::Preferences;
use crate::search::{BookFilter, SearchEngine};
use crate::storage::{SharedStorage, SqliteStorage, shared};

const CORPUS_DIR: &str = "corpus";

/// Everything a reading session needs: the loaded corpus and the stores
/// sharing one persistence backend.
pub struct Session {
    pub config: Config,
    pub corpus: Rc<Corpus>,
    pub favorites: FavoritesStore,
    pub history: SearchHistory,
    pub preferences: Preferences,
    pub search: SearchEngine,
}

impl Session {
    /// Load the corpus from `corpus_dir` and open the on-disk storage.
    pub fn open(config: Config, corpus_dir: &Path) -> Result<Self> {
        let corpus = Corpus::load(corpus_dir)?;
        let storage = shared(SqliteStorage::new()?);
        Ok(Self::with_corpus(config, corpus, storage))
    }

    pub fn with_corpus(config: Config, corpus: Corpus, storage: SharedStorage) -> Self {
        let settings = &config.settings;
        let favorites = FavoritesStore::load(storage.clone());
        let history = SearchHistory::load(storage.clone(), settings.history_capacity);
        let preferences = Preferences::load(storage);

        let corpus = Rc::new(corpus);
        let mut search = SearchEngine::new(settings.case_sensitive_search, settings.page_size);
        search.attach(corpus.clone());

        Self {
            config,
            corpus,
            favorites,
            history,
            preferences,
            search,
        }
    }

    /// `--corpus` wins over the configured directory, which wins over
    /// `<data dir>/corpus`.
    pub fn corpus_dir(config: &Config, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = cli_override {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = config.settings.corpus_dir.as_deref() {
            return Ok(PathBuf::from(dir));
        }
        Ok(get_app_data_prefix()?.join(CORPUS_DIR))
    }

    /// Open `location`, or the first chapter of the first book.
    pub fn reader_at(&self, location: Option<Location>) -> Result<ChapterReader> {
        match location {
            Some(location) => ChapterReader::open(self.corpus.clone(), location),
            None => ChapterReader::open_first(self.corpus.clone()),
        }
    }

    pub fn toggle_favorite(&mut self, location: &Location, verse_number: u32) -> Result<Toggle> {
        let reader = ChapterReader::open(self.corpus.clone(), location.clone())?;
        let toggle = reader.toggle_favorite(verse_number, &mut self.favorites)?;
        logging::info(format!("{:?} favorite {}:{}", toggle, location, verse_number));
        Ok(toggle)
    }

    /// Run a search and record it in the history.
    pub fn search(&mut self, keyword: &str, filter: BookFilter) -> Result<bool> {
        self.search.search(keyword, filter, &mut self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Verse, chapter_label, section_label};
    use crate::settings::{Keymap, Settings};
    use crate::config::CONFIG_FILE;
    use crate::storage::MemoryStorage;
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

    fn config(settings: Settings) -> Config {
        let dir = TempDir::new().unwrap();
        let mut config = Config::load_from(dir.path().join(CONFIG_FILE)).unwrap();
        config.settings = settings;
        config.keymap = Keymap::default();
        config
    }

    fn session(settings: Settings) -> Session {
        let corpus = Corpus::from_verses(vec![
            verse(1, "創世記", 1, 1, "起初，神創造天地。"),
            verse(2, "創世記", 1, 2, "神的靈運行在水面上。"),
            verse(3, "出埃及記", 1, 1, "以色列的眾子。"),
        ]);
        Session::with_corpus(config(settings), corpus, shared(MemoryStorage::new()))
    }

    #[test]
    fn test_search_is_ready_and_records_history() {
        let mut session = session(Settings::default());
        assert!(session.search.is_ready());
        assert!(session.search("神", BookFilter::All).unwrap());
        assert_eq!(session.search.total(), 2);
        assert_eq!(session.history.keywords(), &["神"]);
    }

    #[test]
    fn test_settings_flow_into_stores() {
        let settings = Settings {
            case_sensitive_search: false,
            page_size: 20,
            history_capacity: 3,
            ..Settings::default()
        };
        let session = session(settings);
        assert!(!session.search.case_sensitive());
        assert_eq!(session.search.page_size(), 20);
        assert_eq!(session.history.capacity(), 3);
    }

    #[test]
    fn test_toggle_favorite() {
        let mut session = session(Settings::default());
        let location = Location::new("創世記", 1);
        assert_eq!(session.toggle_favorite(&location, 2).unwrap(), Toggle::Added);
        assert!(session.favorites.contains("創世記-1-2"));
        assert_eq!(session.toggle_favorite(&location, 2).unwrap(), Toggle::Removed);
        assert!(session.favorites.is_empty());

        assert!(session.toggle_favorite(&location, 9).is_err());
        assert!(session.toggle_favorite(&Location::new("創世記", 7), 1).is_err());
    }

    #[test]
    fn test_reader_at() {
        let session = session(Settings::default());
        assert_eq!(session.reader_at(None).unwrap().location().book, "創世記");
        let reader = session.reader_at(Some(Location::new("出埃及記", 1))).unwrap();
        assert_eq!(reader.location().book, "出埃及記");
    }

    #[test]
    fn test_corpus_dir_precedence() {
        let mut settings = Settings::default();
        settings.corpus_dir = Some("/configured".to_string());
        let config = config(settings);
        assert_eq!(
            Session::corpus_dir(&config, Some(Path::new("/flag"))).unwrap(),
            PathBuf::from("/flag")
        );
        assert_eq!(Session::corpus_dir(&config, None).unwrap(), PathBuf::from("/configured"));
    }
}
