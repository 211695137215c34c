use eyre::Result;

use crate::logging;
use crate::models::FavoriteEntry;
use crate::pagination::paginate;
use crate::storage::{FAVORITES_KEY, SharedStorage, load_json, save_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Bookmarked verses in insertion order.
///
/// The ordered list is the only record of membership; `contains` looks into
/// it directly, so there is nothing to keep in sync after a mutation.
pub struct FavoritesStore {
    storage: SharedStorage,
    entries: Vec<FavoriteEntry>,
}

impl FavoritesStore {
    pub fn load(storage: SharedStorage) -> Self {
        let loaded: Vec<FavoriteEntry> = load_json(&*storage.borrow(), FAVORITES_KEY);

        // Collapse duplicates a hand-edited or racing writer may have left.
        let mut entries: Vec<FavoriteEntry> = Vec::with_capacity(loaded.len());
        for entry in loaded {
            if entries.iter().any(|e| e.id == entry.id) {
                logging::debug(format!("Dropping duplicate favorite {}", entry.id));
                continue;
            }
            entries.push(entry);
        }

        logging::debug(format!("Loaded {} favorites", entries.len()));
        Self { storage, entries }
    }

    pub fn add(&mut self, book_name: &str, chapter: &str, content: &str, verse_number: u32) -> Result<bool> {
        let entry = FavoriteEntry::new(book_name, chapter, content, verse_number);
        if self.contains(&entry.id) {
            return Ok(false);
        }
        logging::info(format!("Adding favorite {}", entry.id));
        self.entries.push(entry);
        self.persist()?;
        Ok(true)
    }

    pub fn remove(&mut self, id: &str) -> Result<Option<FavoriteEntry>> {
        let Some(position) = self.entries.iter().position(|e| e.id == id) else {
            return Ok(None);
        };
        let removed = self.entries.remove(position);
        logging::info(format!("Removing favorite {}", removed.id));
        self.persist()?;
        Ok(Some(removed))
    }

    pub fn toggle(&mut self, book_name: &str, chapter: &str, content: &str, verse_number: u32) -> Result<Toggle> {
        let id = FavoriteEntry::composite_id(book_name, chapter, verse_number);
        if self.remove(&id)?.is_some() {
            Ok(Toggle::Removed)
        } else {
            self.add(book_name, chapter, content, verse_number)?;
            Ok(Toggle::Added)
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// 1-based page of favorites in insertion order.
    pub fn list(&self, page: usize, page_size: usize) -> &[FavoriteEntry] {
        paginate(&self.entries, page, page_size)
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        save_json(&mut *self.storage.borrow_mut(), FAVORITES_KEY, &self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Storage, shared};

    fn empty_store() -> (FavoritesStore, SharedStorage) {
        let storage = shared(MemoryStorage::new());
        (FavoritesStore::load(storage.clone()), storage)
    }

    fn stored_ids(storage: &SharedStorage) -> Vec<String> {
        let entries: Vec<FavoriteEntry> = load_json(&*storage.borrow(), FAVORITES_KEY);
        entries.into_iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_toggle_scenario() {
        let (mut store, storage) = empty_store();

        let result = store.toggle("創世記", "1", "起初...", 1).unwrap();
        assert_eq!(result, Toggle::Added);
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].id, "創世記-1-1");
        assert!(store.contains("創世記-1-1"));
        assert_eq!(stored_ids(&storage), vec!["創世記-1-1"]);

        let result = store.toggle("創世記", "1", "起初...", 1).unwrap();
        assert_eq!(result, Toggle::Removed);
        assert!(store.is_empty());
        assert!(!store.contains("創世記-1-1"));
        assert!(stored_ids(&storage).is_empty());
    }

    #[test]
    fn test_toggle_twice_preserves_order_of_others() {
        let (mut store, _storage) = empty_store();
        store.add("創世記", "1", "a", 1).unwrap();
        store.add("創世記", "1", "b", 2).unwrap();
        store.add("創世記", "1", "c", 3).unwrap();
        let before = store.entries().to_vec();

        store.toggle("創世記", "2", "d", 4).unwrap();
        assert!(store.contains("創世記-2-4"));
        store.toggle("創世記", "2", "d", 4).unwrap();
        assert_eq!(store.entries(), before.as_slice());
        assert!(!store.contains("創世記-2-4"));

        store.toggle("創世記", "1", "b", 2).unwrap();
        assert_eq!(store.len(), 2);
        store.toggle("創世記", "1", "b", 2).unwrap();

        // The re-added entry goes to the end; everything else keeps its order.
        let ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["創世記-1-1", "創世記-1-3", "創世記-1-2"]);
        assert_eq!(store.len(), before.len());
    }

    #[test]
    fn test_add_then_remove_restores_list() {
        let (mut store, storage) = empty_store();
        store.add("詩篇", "23", "耶和華是我的牧者", 1).unwrap();
        store.add("約翰福音", "3", "神愛世人", 16).unwrap();
        let before = store.entries().to_vec();

        store.add("羅馬書", "8", "萬事都互相效力", 28).unwrap();
        let removed = store.remove("羅馬書-8-28").unwrap();
        assert_eq!(removed.map(|e| e.verse_number), Some(28));
        assert_eq!(store.entries(), before.as_slice());
        assert_eq!(stored_ids(&storage), vec!["詩篇-23-1", "約翰福音-3-16"]);
    }

    #[test]
    fn test_add_is_idempotent() {
        let (mut store, _storage) = empty_store();
        assert!(store.add("創世記", "1", "a", 1).unwrap());
        assert!(!store.add("創世記", "1", "a", 1).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (mut store, storage) = empty_store();
        assert_eq!(store.remove("nope-1-1").unwrap(), None);
        // Nothing was written
        assert_eq!(storage.borrow().get_item(FAVORITES_KEY).unwrap(), None);
    }

    #[test]
    fn test_list_pages() {
        let (mut store, _storage) = empty_store();
        for verse in 1..=25 {
            store.add("詩篇", "119", "…", verse).unwrap();
        }
        let page2: Vec<u32> = store.list(2, 10).iter().map(|e| e.verse_number).collect();
        assert_eq!(page2, (11..=20).collect::<Vec<_>>());
        let page3: Vec<u32> = store.list(3, 10).iter().map(|e| e.verse_number).collect();
        assert_eq!(page3, (21..=25).collect::<Vec<_>>());
        assert!(store.list(4, 10).is_empty());
    }

    #[test]
    fn test_load_from_existing_storage() {
        let raw = r#"[
            {"id":"創世記-1-1","bookName":"創世記","chapter":1,"verseNumber":"1","content":"起初"},
            {"id":"創世記-1-1","bookName":"創世記","chapter":"1","verseNumber":1,"content":"起初"},
            {"id":"出埃及記-3-14","bookName":"出埃及記","chapter":"3","verseNumber":14,"content":"我是自有永有的"}
        ]"#;
        let storage = shared(MemoryStorage::new().with_item(FAVORITES_KEY, raw));
        let store = FavoritesStore::load(storage);
        assert_eq!(store.len(), 2);
        assert!(store.contains("出埃及記-3-14"));
    }

    #[test]
    fn test_corrupt_storage_starts_empty_and_heals() {
        let storage = shared(MemoryStorage::new().with_item(FAVORITES_KEY, "[{oops"));
        let mut store = FavoritesStore::load(storage.clone());
        assert!(store.is_empty());

        store.add("創世記", "1", "起初", 1).unwrap();
        assert_eq!(stored_ids(&storage), vec!["創世記-1-1"]);
    }

    #[test]
    fn test_clear() {
        let (mut store, storage) = empty_store();
        store.add("創世記", "1", "a", 1).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(stored_ids(&storage).is_empty());
    }
}
