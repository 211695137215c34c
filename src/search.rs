use eyre::Result;
use regex::{Regex, RegexBuilder};
use std::rc::Rc;

use crate::corpus::Corpus;
use crate::error::Error;
use crate::history::SearchHistory;
use crate::logging;
use crate::models::Verse;
use crate::pagination::{DEFAULT_PAGE_SIZE, page_count, paginate};

pub const ALL_BOOKS: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BookFilter {
    #[default]
    All,
    Book(String),
}

impl BookFilter {
    pub fn parse(value: &str) -> Self {
        if value == ALL_BOOKS {
            BookFilter::All
        } else {
            BookFilter::Book(value.to_string())
        }
    }

    pub fn matches(&self, verse: &Verse) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Book(book) => verse.book == *book,
        }
    }
}

/// A literal keyword compiled once and used for both filtering and
/// highlighting, so the two always agree on what a match is.
#[derive(Debug, Clone)]
pub struct Matcher {
    keyword: String,
    pattern: Regex,
}

impl Matcher {
    pub fn new(keyword: &str, case_sensitive: bool) -> Result<Self> {
        let pattern = RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(!case_sensitive)
            .build()?;
        Ok(Self {
            keyword: keyword.to_string(),
            pattern,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    pub fn highlight<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let mut segments = Vec::new();
        let mut last = 0;
        for mat in self.pattern.find_iter(text) {
            if mat.start() > last {
                segments.push(Segment::plain(&text[last..mat.start()]));
            }
            if !mat.as_str().is_empty() {
                segments.push(Segment::marked(mat.as_str()));
            }
            last = mat.end();
        }
        if last < text.len() {
            segments.push(Segment::plain(&text[last..]));
        }
        segments
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'t> {
    pub text: &'t str,
    pub matched: bool,
}

impl<'t> Segment<'t> {
    fn plain(text: &'t str) -> Self {
        Self { text, matched: false }
    }

    fn marked(text: &'t str) -> Self {
        Self { text, matched: true }
    }
}

#[derive(Debug, Clone, Default)]
enum Readiness {
    #[default]
    NotReady,
    Ready(Rc<Corpus>),
}

/// Keyword search over the corpus with the state of the current result list.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    corpus: Readiness,
    case_sensitive: bool,
    matcher: Option<Matcher>,
    filter: BookFilter,
    results: Vec<usize>,
    page: usize,
    page_size: usize,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(true, DEFAULT_PAGE_SIZE)
    }
}

impl SearchEngine {
    pub fn new(case_sensitive: bool, page_size: usize) -> Self {
        Self {
            corpus: Readiness::NotReady,
            case_sensitive,
            matcher: None,
            filter: BookFilter::All,
            results: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn attach(&mut self, corpus: Rc<Corpus>) {
        logging::debug(format!("Search engine ready with {} verses", corpus.len()));
        self.corpus = Readiness::Ready(corpus);
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.corpus, Readiness::Ready(_))
    }

    fn corpus(&self) -> Result<&Corpus> {
        match &self.corpus {
            Readiness::Ready(corpus) => Ok(corpus),
            Readiness::NotReady => Err(Error::CorpusNotReady.into()),
        }
    }

    /// Verses whose content contains `keyword` and whose book passes
    /// `filter`, in corpus order. Has no side effects.
    pub fn find(&self, keyword: &str, filter: &BookFilter) -> Result<Vec<&Verse>> {
        let corpus = self.corpus()?;
        if keyword.trim().is_empty() {
            return Ok(Vec::new());
        }
        let matcher = Matcher::new(keyword, self.case_sensitive)?;
        Ok(corpus
            .verses()
            .iter()
            .filter(|v| filter.matches(v) && matcher.is_match(&v.content))
            .collect())
    }

    /// Run a search and make it the current result list.
    ///
    /// Returns `Ok(false)` without touching anything when the keyword is
    /// blank. Otherwise the keyword is matched and recorded in `history` as
    /// given, surrounding spaces included, and the page resets to 1.
    pub fn search(&mut self, keyword: &str, filter: BookFilter, history: &mut SearchHistory) -> Result<bool> {
        if keyword.trim().is_empty() {
            return Ok(false);
        }

        let corpus = self.corpus()?;
        let matcher = Matcher::new(keyword, self.case_sensitive)?;
        let results: Vec<usize> = corpus
            .verses()
            .iter()
            .enumerate()
            .filter(|(_, v)| filter.matches(v) && matcher.is_match(&v.content))
            .map(|(i, _)| i)
            .collect();

        logging::info(format!(
            "Search {:?} in {:?}: {} results",
            keyword,
            filter,
            results.len()
        ));

        self.results = results;
        self.matcher = Some(matcher);
        self.filter = filter;
        self.page = 1;

        history.append(keyword)?;
        Ok(true)
    }

    pub fn searched_keyword(&self) -> Option<&str> {
        self.matcher.as_ref().map(Matcher::keyword)
    }

    pub fn filter(&self) -> &BookFilter {
        &self.filter
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        page_count(self.results.len(), self.page_size)
    }

    pub fn change_page(&mut self, page: usize, page_size: Option<usize>) {
        self.page = page.max(1);
        if let Some(size) = page_size {
            self.page_size = size.max(1);
        }
    }

    pub fn results(&self) -> Vec<&Verse> {
        self.resolve(&self.results)
    }

    pub fn current_page(&self) -> Vec<&Verse> {
        self.resolve(paginate(&self.results, self.page, self.page_size))
    }

    /// Split `text` around occurrences of the last searched keyword.
    pub fn highlight<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        match &self.matcher {
            Some(matcher) => matcher.highlight(text),
            None if text.is_empty() => Vec::new(),
            None => vec![Segment::plain(text)],
        }
    }

    pub fn clear(&mut self) {
        self.matcher = None;
        self.results.clear();
        self.page = 1;
    }

    fn resolve(&self, positions: &[usize]) -> Vec<&Verse> {
        match &self.corpus {
            Readiness::Ready(corpus) => positions
                .iter()
                .filter_map(|&i| corpus.verses().get(i))
                .collect(),
            Readiness::NotReady => Vec::new(),
        }
    }
}
