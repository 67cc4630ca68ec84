//! Ordered in-memory storage for books.

use std::collections::HashMap;

use super::models::Book;

/// Books in insertion order, with an id → position index.
///
/// The store does no validation; callers are expected to check ids and
/// payloads before mutating it.
#[derive(Debug, Default)]
pub struct BookStore {
    books: Vec<Book>,
    positions: HashMap<String, usize>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the end.
    pub fn append(&mut self, book: Book) {
        self.positions.insert(book.id.clone(), self.books.len());
        self.books.push(book);
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Book> {
        self.find_index_by_id(id).map(|index| &self.books[index])
    }

    pub fn find_index_by_id(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn all(&self) -> &[Book] {
        &self.books
    }

    /// Overwrite the record at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn replace_at(&mut self, index: usize, book: Book) {
        let previous = std::mem::replace(&mut self.books[index], book);
        if previous.id != self.books[index].id {
            self.positions.remove(&previous.id);
            self.positions.insert(self.books[index].id.clone(), index);
        }
    }

    /// Remove the record at `index`, shifting later records down.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Book {
        let removed = self.books.remove(index);
        self.positions.remove(&removed.id);
        for (position, book) in self.books.iter().enumerate().skip(index) {
            self.positions.insert(book.id.clone(), position);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn book(id: &str) -> Book {
        let now = OffsetDateTime::UNIX_EPOCH;
        Book {
            id: id.to_string(),
            name: format!("Book {id}"),
            year: 2020,
            author: "Author".to_string(),
            summary: "Summary".to_string(),
            publisher: "Publisher".to_string(),
            page_count: 100,
            read_page: 10,
            reading: true,
            finished: false,
            inserted_at: now,
            updated_at: now,
        }
    }

    fn ids(store: &BookStore) -> Vec<&str> {
        store.all().iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut store = BookStore::new();
        for id in ["a", "b", "c"] {
            store.append(book(id));
        }

        assert_eq!(store.len(), 3);
        assert_eq!(ids(&store), vec!["a", "b", "c"]);
        assert_eq!(store.find_index_by_id("c"), Some(2));
    }

    #[test]
    fn lookups_miss_on_unknown_id() {
        let mut store = BookStore::new();
        assert!(store.is_empty());
        store.append(book("a"));

        assert!(store.find_by_id("zzz").is_none());
        assert_eq!(store.find_index_by_id("zzz"), None);
    }

    #[test]
    fn remove_reindexes_following_records() {
        let mut store = BookStore::new();
        for id in ["a", "b", "c", "d"] {
            store.append(book(id));
        }

        let removed = store.remove_at(1);
        assert_eq!(removed.id, "b");
        assert_eq!(ids(&store), vec!["a", "c", "d"]);
        assert_eq!(store.find_index_by_id("a"), Some(0));
        assert_eq!(store.find_index_by_id("c"), Some(1));
        assert_eq!(store.find_index_by_id("d"), Some(2));
        assert!(store.find_by_id("b").is_none());
    }

    #[test]
    fn replace_overwrites_in_place() {
        let mut store = BookStore::new();
        store.append(book("a"));
        store.append(book("b"));

        let mut updated = book("a");
        updated.name = "Renamed".to_string();
        store.replace_at(0, updated);

        assert_eq!(store.find_by_id("a").unwrap().name, "Renamed");
        assert_eq!(ids(&store), vec!["a", "b"]);
    }
}
