use eyre::{Result, WrapErr};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::canon::canonical_books;
use crate::error::Error;
use crate::logging;
use crate::models::{BookInfo, Verse, chapter_label};

pub const VERSES_FILE: &str = "bible-array.json";
pub const BOOKS_FILE: &str = "books.json";
pub const CHAPTER_LISTS_FILE: &str = "bookslist.json";

/// The verses of one resolved chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter<'a> {
    pub book: &'a str,
    pub number: u32,
    pub label: &'a str,
    pub verses: Vec<&'a Verse>,
}

/// Read-only verse corpus plus the lookup tables built from it.
#[derive(Debug, Clone)]
pub struct Corpus {
    books: Vec<BookInfo>,
    chapter_labels: HashMap<String, Vec<String>>,
    verses: Vec<Verse>,
    chapter_index: HashMap<(String, u32), Vec<usize>>,
}

impl Corpus {
    /// Books without an explicit chapter-label list get "第 N 章" labels for
    /// `1..=chapter_num`.
    pub fn new(
        books: Vec<BookInfo>,
        mut chapter_labels: HashMap<String, Vec<String>>,
        verses: Vec<Verse>,
    ) -> Self {
        for book in &books {
            chapter_labels
                .entry(book.name.clone())
                .or_insert_with(|| (1..=book.chapter_num).map(chapter_label).collect());
        }

        let mut chapter_index: HashMap<(String, u32), Vec<usize>> = HashMap::new();
        for (position, verse) in verses.iter().enumerate() {
            match verse.chapter_number() {
                Some(number) => chapter_index
                    .entry((verse.book.clone(), number))
                    .or_default()
                    .push(position),
                None => logging::debug(format!(
                    "Verse {} has unreadable chapter label {:?}",
                    verse.id, verse.chapter
                )),
            }
        }

        Self {
            books,
            chapter_labels,
            verses,
            chapter_index,
        }
    }

    /// Corpus over the canonical book list.
    pub fn from_verses(verses: Vec<Verse>) -> Self {
        Self::new(canonical_books(), HashMap::new(), verses)
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let verses_path = dir.join(VERSES_FILE);
        let verses: Vec<Verse> = read_json(&verses_path)?;

        let books_path = dir.join(BOOKS_FILE);
        let books: Vec<BookInfo> = if books_path.exists() {
            read_json(&books_path)?
        } else {
            logging::debug("No books.json, using the canonical book list");
            canonical_books()
        };

        let lists_path = dir.join(CHAPTER_LISTS_FILE);
        let mut chapter_labels = HashMap::new();
        if lists_path.exists() {
            let lists: Vec<HashMap<String, Vec<String>>> = read_json(&lists_path)?;
            for entry in lists {
                chapter_labels.extend(entry);
            }
        }

        logging::info(format!(
            "Loaded {} verses in {} books from {}",
            verses.len(),
            books.len(),
            dir.display()
        ));
        Ok(Self::new(books, chapter_labels, verses))
    }

    pub fn books(&self) -> &[BookInfo] {
        &self.books
    }

    pub fn book_index(&self, name: &str) -> Option<usize> {
        self.books.iter().position(|b| b.name == name)
    }

    pub fn book(&self, name: &str) -> Option<&BookInfo> {
        self.books.iter().find(|b| b.name == name)
    }

    /// Chapter labels of a book; empty for unknown books.
    pub fn chapter_labels(&self, book: &str) -> &[String] {
        self.chapter_labels
            .get(book)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn chapter_count(&self, book: &str) -> u32 {
        self.chapter_labels(book).len() as u32
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn chapter(&self, book: &str, number: u32) -> Result<Chapter<'_>> {
        let Some((book_name, labels)) = self.chapter_labels.get_key_value(book) else {
            return Err(Error::NotFound(format!("book {}", book)).into());
        };
        if self.book(book).is_none() || number == 0 || number as usize > labels.len() {
            return Err(Error::NotFound(format!("{} chapter {}", book, number)).into());
        }

        let verses: Vec<&Verse> = self
            .chapter_index
            .get(&(book.to_string(), number))
            .map(|positions| positions.iter().map(|&i| &self.verses[i]).collect())
            .unwrap_or_default();
        if verses.is_empty() {
            return Err(Error::NotFound(format!("{} chapter {}", book, number)).into());
        }

        Ok(Chapter {
            book: book_name,
            number,
            label: &labels[number as usize - 1],
            verses,
        })
    }

    pub fn verse(&self, book: &str, chapter: u32, verse: u32) -> Option<&Verse> {
        self.chapter_index
            .get(&(book.to_string(), chapter))?
            .iter()
            .map(|&i| &self.verses[i])
            .find(|v| v.verse_number() == Some(verse))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("Could not read {}", path.display()))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("Could not parse {}", path.display()))
}
