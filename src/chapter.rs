use eyre::Result;
use std::fmt;
use std::rc::Rc;

use crate::corpus::{Chapter, Corpus};
use crate::error::Error;
use crate::favorites::{FavoritesStore, Toggle};
use crate::logging;
use crate::models::{FavoriteEntry, Verse};

pub const ROUTE_PREFIX: &str = "/bible/";

/// A book + chapter position, optionally pointing at one verse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub book: String,
    pub chapter: u32,
    pub verse: Option<u32>,
}

impl Location {
    pub fn new(book: &str, chapter: u32) -> Self {
        Self {
            book: book.to_string(),
            chapter,
            verse: None,
        }
    }

    pub fn with_verse(mut self, verse: u32) -> Self {
        self.verse = Some(verse);
        self
    }

    /// Where `verse` sits, when its labels are readable.
    pub fn of_verse(verse: &Verse) -> Option<Self> {
        Some(Self::new(&verse.book, verse.chapter_number()?).with_verse(verse.verse_number()?))
    }

    /// Parse `/bible/{book}/{chapter}` with an optional `#verse-{n}` anchor.
    /// `/bible/{book}` means chapter 1.
    pub fn parse_path(path: &str) -> Result<Self> {
        let invalid = || Error::InvalidLocation(path.to_string());

        let (route, anchor) = match path.split_once('#') {
            Some((route, anchor)) => (route, Some(anchor)),
            None => (path, None),
        };
        let rest = route.strip_prefix(ROUTE_PREFIX).ok_or_else(invalid)?;
        let mut parts = rest.trim_end_matches('/').split('/');

        let book = parts.next().filter(|b| !b.is_empty()).ok_or_else(invalid)?;
        let chapter = match parts.next() {
            Some(raw) => raw.parse::<u32>().map_err(|_| invalid())?,
            None => 1,
        };
        if parts.next().is_some() {
            return Err(invalid().into());
        }

        let mut location = Self::new(book, chapter);
        if let Some(anchor) = anchor {
            let verse = anchor
                .strip_prefix("verse-")
                .and_then(|n| n.parse().ok())
                .ok_or_else(invalid)?;
            location.verse = Some(verse);
        }
        Ok(location)
    }

    /// Accepts a route path, `BOOK`, `BOOK CHAPTER`, or `BOOK CHAPTER:VERSE`.
    pub fn parse_args(args: &[String]) -> Result<Self> {
        match args {
            [single] if single.starts_with(ROUTE_PREFIX) => Self::parse_path(single),
            [book] => Ok(Self::new(book, 1)),
            [book, position] => {
                let invalid = || Error::InvalidLocation(format!("{} {}", book, position));
                let (chapter, verse) = match position.split_once(':') {
                    Some((chapter, verse)) => (chapter, Some(verse)),
                    None => (position.as_str(), None),
                };
                let mut location = Self::new(book, chapter.parse().map_err(|_| invalid())?);
                if let Some(verse) = verse {
                    location.verse = Some(verse.parse().map_err(|_| invalid())?);
                }
                Ok(location)
            }
            _ => Err(Error::InvalidLocation(args.join(" ")).into()),
        }
    }

    pub fn to_path(&self) -> String {
        match self.verse {
            Some(verse) => format!("{}{}/{}#verse-{}", ROUTE_PREFIX, self.book, self.chapter, verse),
            None => format!("{}{}/{}", ROUTE_PREFIX, self.book, self.chapter),
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.to_path())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verse {
            Some(verse) => write!(f, "{} {}:{}", self.book, self.chapter, verse),
            None => write!(f, "{} {}", self.book, self.chapter),
        }
    }
}

/// Previous/next chapter across book boundaries, following the book order
/// and per-book chapter lists of the corpus.
pub struct Navigator<'a> {
    corpus: &'a Corpus,
}

impl<'a> Navigator<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        Self { corpus }
    }

    pub fn previous(&self, book: &str, chapter: u32) -> Option<Location> {
        if chapter > 1 {
            return Some(Location::new(book, chapter - 1));
        }
        let index = self.corpus.book_index(book)?;
        let previous = self.corpus.books().get(index.checked_sub(1)?)?;
        let last = self.corpus.chapter_count(&previous.name);
        (last > 0).then(|| Location::new(&previous.name, last))
    }

    pub fn next(&self, book: &str, chapter: u32) -> Option<Location> {
        if chapter < self.corpus.chapter_count(book) {
            return Some(Location::new(book, chapter + 1));
        }
        let index = self.corpus.book_index(book)?;
        let next = self.corpus.books().get(index + 1)?;
        Some(Location::new(&next.name, 1))
    }
}

/// The chapter currently open for reading.
pub struct ChapterReader {
    corpus: Rc<Corpus>,
    location: Location,
}

impl ChapterReader {
    pub fn open(corpus: Rc<Corpus>, location: Location) -> Result<Self> {
        corpus.chapter(&location.book, location.chapter)?;
        Ok(Self { corpus, location })
    }

    /// First chapter of the first book.
    pub fn open_first(corpus: Rc<Corpus>) -> Result<Self> {
        let book = corpus
            .books()
            .first()
            .map(|b| b.name.clone())
            .ok_or_else(|| Error::NotFound("no books in corpus".to_string()))?;
        Self::open(corpus, Location::new(&book, 1))
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn chapter(&self) -> Result<Chapter<'_>> {
        self.corpus.chapter(&self.location.book, self.location.chapter)
    }

    pub fn go_to(&mut self, location: Location) -> Result<()> {
        self.corpus.chapter(&location.book, location.chapter)?;
        logging::debug(format!("Opening {}", location));
        self.location = location;
        Ok(())
    }

    pub fn previous_location(&self) -> Option<Location> {
        Navigator::new(&self.corpus).previous(&self.location.book, self.location.chapter)
    }

    pub fn next_location(&self) -> Option<Location> {
        Navigator::new(&self.corpus).next(&self.location.book, self.location.chapter)
    }

    pub fn has_previous(&self) -> bool {
        self.previous_location().is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next_location().is_some()
    }

    /// Returns false at the first chapter of the first book.
    pub fn previous_chapter(&mut self) -> Result<bool> {
        match self.previous_location() {
            Some(location) => self.go_to(location).map(|_| true),
            None => Ok(false),
        }
    }

    /// Returns false at the last chapter of the last book.
    pub fn next_chapter(&mut self) -> Result<bool> {
        match self.next_location() {
            Some(location) => self.go_to(location).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn favorite_id(&self, verse_number: u32) -> String {
        FavoriteEntry::composite_id(
            &self.location.book,
            &self.location.chapter.to_string(),
            verse_number,
        )
    }

    pub fn is_favorite(&self, verse_number: u32, favorites: &FavoritesStore) -> bool {
        favorites.contains(&self.favorite_id(verse_number))
    }

    pub fn toggle_favorite(&self, verse_number: u32, favorites: &mut FavoritesStore) -> Result<Toggle> {
        let verse = self
            .corpus
            .verse(&self.location.book, self.location.chapter, verse_number)
            .ok_or_else(|| {
                Error::NotFound(format!("{} {}:{}", self.location.book, self.location.chapter, verse_number))
            })?;
        favorites.toggle(
            &self.location.book,
            &self.location.chapter.to_string(),
            &verse.content,
            verse_number,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookInfo, Verse, chapter_label, section_label};
    use crate::storage::{MemoryStorage, shared};
    use std::collections::HashMap;

    fn verse(id: u32, book: &str, chapter: u32, section: u32) -> Verse {
        Verse {
            id,
            book: book.to_string(),
            book_eng: String::new(),
            chapter: chapter_label(chapter),
            section: section_label(section),
            content: format!("{} {}:{}", book, chapter, section),
            is_favorite: false,
            is_bookmark: false,
        }
    }

    /// Three books of 2, 1 and 3 chapters, each chapter with two verses.
    fn corpus() -> Rc<Corpus> {
        let books = vec![
            BookInfo { name: "甲".to_string(), chapter_num: 2 },
            BookInfo { name: "乙".to_string(), chapter_num: 1 },
            BookInfo { name: "丙".to_string(), chapter_num: 3 },
        ];
        let mut verses = Vec::new();
        let mut id = 0;
        for book in &books {
            for chapter in 1..=book.chapter_num {
                for section in 1..=2 {
                    id += 1;
                    verses.push(verse(id, &book.name, chapter, section));
                }
            }
        }
        Rc::new(Corpus::new(books, HashMap::new(), verses))
    }

    #[test]
    fn test_previous_at_start_is_noop() {
        let mut reader = ChapterReader::open(corpus(), Location::new("甲", 1)).unwrap();
        assert!(!reader.has_previous());
        assert!(!reader.previous_chapter().unwrap());
        assert_eq!(reader.location(), &Location::new("甲", 1));
    }

    #[test]
    fn test_next_at_end_is_noop() {
        let mut reader = ChapterReader::open(corpus(), Location::new("丙", 3)).unwrap();
        assert!(!reader.has_next());
        assert!(!reader.next_chapter().unwrap());
        assert_eq!(reader.location(), &Location::new("丙", 3));
    }

    #[test]
    fn test_next_crosses_into_following_book() {
        let mut reader = ChapterReader::open(corpus(), Location::new("甲", 1)).unwrap();
        assert!(reader.next_chapter().unwrap());
        assert_eq!(reader.location(), &Location::new("甲", 2));
        assert!(reader.next_chapter().unwrap());
        assert_eq!(reader.location(), &Location::new("乙", 1));
        assert!(reader.next_chapter().unwrap());
        assert_eq!(reader.location(), &Location::new("丙", 1));
    }

    #[test]
    fn test_previous_goes_to_last_chapter_of_previous_book() {
        let mut reader = ChapterReader::open(corpus(), Location::new("丙", 1)).unwrap();
        assert!(reader.previous_chapter().unwrap());
        assert_eq!(reader.location(), &Location::new("乙", 1));
        assert!(reader.previous_chapter().unwrap());
        assert_eq!(reader.location(), &Location::new("甲", 2));
        assert!(reader.previous_chapter().unwrap());
        assert_eq!(reader.location(), &Location::new("甲", 1));
    }

    #[test]
    fn test_open_not_found() {
        for location in [Location::new("丁", 1), Location::new("甲", 3), Location::new("甲", 0)] {
            let err = ChapterReader::open(corpus(), location).err().unwrap();
            assert!(Error::is_not_found(&err));
        }
    }

    #[test]
    fn test_open_first_and_chapter() {
        let reader = ChapterReader::open_first(corpus()).unwrap();
        let chapter = reader.chapter().unwrap();
        assert_eq!(chapter.book, "甲");
        assert_eq!(chapter.verses.len(), 2);
    }

    #[test]
    fn test_toggle_favorite_in_chapter() {
        let reader = ChapterReader::open(corpus(), Location::new("丙", 2)).unwrap();
        let mut favorites = FavoritesStore::load(shared(MemoryStorage::new()));

        assert_eq!(reader.toggle_favorite(2, &mut favorites).unwrap(), Toggle::Added);
        assert!(reader.is_favorite(2, &favorites));
        assert!(!reader.is_favorite(1, &favorites));
        assert_eq!(favorites.entries()[0].id, "丙-2-2");
        assert_eq!(favorites.entries()[0].content, "丙 2:2");

        assert_eq!(reader.toggle_favorite(2, &mut favorites).unwrap(), Toggle::Removed);
        assert!(favorites.is_empty());

        assert!(reader.toggle_favorite(9, &mut favorites).is_err());
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(Location::parse_path("/bible/創世記/3").unwrap(), Location::new("創世記", 3));
        assert_eq!(
            Location::parse_path("/bible/創世記/3#verse-5").unwrap(),
            Location::new("創世記", 3).with_verse(5)
        );
        assert_eq!(Location::parse_path("/bible/創世記").unwrap(), Location::new("創世記", 1));
        assert_eq!(Location::parse_path("/bible/創世記/").unwrap(), Location::new("創世記", 1));

        for bad in ["/search", "/bible/", "/bible/創世記/x", "/bible/a/1/2", "/bible/a/1#v5"] {
            assert!(Location::parse_path(bad).is_err(), "{} should be invalid", bad);
        }
    }

    #[test]
    fn test_parse_args() {
        let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(Location::parse_args(&args(&["詩篇"])).unwrap(), Location::new("詩篇", 1));
        assert_eq!(Location::parse_args(&args(&["詩篇", "23"])).unwrap(), Location::new("詩篇", 23));
        assert_eq!(
            Location::parse_args(&args(&["詩篇", "23:4"])).unwrap(),
            Location::new("詩篇", 23).with_verse(4)
        );
        assert_eq!(
            Location::parse_args(&args(&["/bible/詩篇/23"])).unwrap(),
            Location::new("詩篇", 23)
        );
        assert!(Location::parse_args(&args(&[])).is_err());
        assert!(Location::parse_args(&args(&["詩篇", "x"])).is_err());
    }

    #[test]
    fn test_location_formatting() {
        let location = Location::new("約翰福音", 3).with_verse(16);
        assert_eq!(location.to_path(), "/bible/約翰福音/3#verse-16");
        assert_eq!(location.url("https://example.org/"), "https://example.org/bible/約翰福音/3#verse-16");
        assert_eq!(location.to_string(), "約翰福音 3:16");
        assert_eq!(Location::new("約翰福音", 3).to_string(), "約翰福音 3");
    }
}
