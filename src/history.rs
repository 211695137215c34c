use eyre::Result;

use crate::logging;
use crate::storage::{SEARCH_HISTORY_KEY, SharedStorage, load_json, save_json};

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Previously searched keywords, oldest first, without duplicates.
pub struct SearchHistory {
    storage: SharedStorage,
    keywords: Vec<String>,
    capacity: usize,
}

impl SearchHistory {
    pub fn load(storage: SharedStorage, capacity: usize) -> Self {
        let loaded: Vec<String> = load_json(&*storage.borrow(), SEARCH_HISTORY_KEY);

        let mut keywords: Vec<String> = Vec::with_capacity(loaded.len());
        for keyword in loaded {
            if !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }

        let mut history = Self {
            storage,
            keywords,
            capacity: capacity.max(1),
        };
        history.evict_overflow();
        history
    }

    /// Returns false when the keyword was already recorded.
    pub fn append(&mut self, keyword: &str) -> Result<bool> {
        if self.contains(keyword) {
            return Ok(false);
        }
        self.keywords.push(keyword.to_string());
        self.evict_overflow();
        self.persist()?;
        Ok(true)
    }

    pub fn remove(&mut self, keyword: &str) -> Result<bool> {
        let before = self.keywords.len();
        self.keywords.retain(|k| k != keyword);
        if self.keywords.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) -> Result<()> {
        self.keywords.clear();
        self.persist()
    }

    fn evict_overflow(&mut self) {
        if self.keywords.len() > self.capacity {
            let overflow = self.keywords.len() - self.capacity;
            logging::debug(format!("Dropping {} oldest search keywords", overflow));
            self.keywords.drain(..overflow);
        }
    }

    fn persist(&self) -> Result<()> {
        save_json(&mut *self.storage.borrow_mut(), SEARCH_HISTORY_KEY, &self.keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, shared};

    fn stored(storage: &SharedStorage) -> Vec<String> {
        load_json(&*storage.borrow(), SEARCH_HISTORY_KEY)
    }

    #[test]
    fn test_append_skips_duplicates() {
        let storage = shared(MemoryStorage::new());
        let mut history = SearchHistory::load(storage.clone(), DEFAULT_HISTORY_CAPACITY);

        assert!(history.append("神").unwrap());
        assert!(history.append("愛").unwrap());
        assert!(!history.append("神").unwrap());

        assert_eq!(history.keywords(), &["神".to_string(), "愛".to_string()]);
        assert_eq!(stored(&storage), vec!["神", "愛"]);
    }

    #[test]
    fn test_remove() {
        let storage = shared(MemoryStorage::new());
        let mut history = SearchHistory::load(storage.clone(), DEFAULT_HISTORY_CAPACITY);
        history.append("神").unwrap();
        history.append("生命").unwrap();

        assert!(history.remove("神").unwrap());
        assert!(!history.remove("神").unwrap());
        assert_eq!(stored(&storage), vec!["生命"]);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let storage = shared(MemoryStorage::new());
        let mut history = SearchHistory::load(storage.clone(), 3);
        for keyword in ["a", "b", "c", "d", "e"] {
            history.append(keyword).unwrap();
        }
        assert_eq!(history.keywords(), &["c", "d", "e"]);
        assert_eq!(stored(&storage), vec!["c", "d", "e"]);
    }

    #[test]
    fn test_load_trims_to_capacity_and_dedups() {
        let storage = shared(
            MemoryStorage::new().with_item(SEARCH_HISTORY_KEY, r#"["a","b","a","c","d"]"#),
        );
        let history = SearchHistory::load(storage, 2);
        assert_eq!(history.keywords(), &["c", "d"]);
        assert_eq!(history.capacity(), 2);
    }

    #[test]
    fn test_malformed_history_is_empty() {
        let storage = shared(MemoryStorage::new().with_item(SEARCH_HISTORY_KEY, "\"not a list\""));
        let mut history = SearchHistory::load(storage.clone(), DEFAULT_HISTORY_CAPACITY);
        assert!(history.keywords().is_empty());
        history.append("光").unwrap();
        assert_eq!(stored(&storage), vec!["光"]);
    }

    #[test]
    fn test_clear() {
        let storage = shared(MemoryStorage::new());
        let mut history = SearchHistory::load(storage.clone(), DEFAULT_HISTORY_CAPACITY);
        history.append("光").unwrap();
        history.clear().unwrap();
        assert!(history.keywords().is_empty());
        assert!(stored(&storage).is_empty());
    }
}
