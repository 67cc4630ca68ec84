//! Validation rules and CRUD operations over the [`BookStore`].

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use super::models::{Book, BookFilter, BookPayload, BookSummary};
use super::providers::{Clock, IdProvider, SystemClock, UuidIdProvider};
use super::store::BookStore;

/// A payload that breaks a business rule.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing name")]
    MissingName,

    #[error("readPage exceeds pageCount")]
    ReadPageExceedsPageCount,
}

#[derive(Error, Debug)]
pub enum BookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("book {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Checks the rules shared by create and update, in order.
pub fn validate(payload: &BookPayload) -> Result<(), ValidationError> {
    if payload.name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if payload.read_page > payload.page_count {
        return Err(ValidationError::ReadPageExceedsPageCount);
    }
    Ok(())
}

/// Shared handle to the book store.
///
/// Cloning is cheap; every clone sees the same books. Each operation holds
/// the store lock for its whole duration.
#[derive(Clone)]
pub struct BookService {
    store: Arc<Mutex<BookStore>>,
    ids: Arc<dyn IdProvider>,
    clock: Arc<dyn Clock>,
}

impl BookService {
    pub fn new(ids: Arc<dyn IdProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(Mutex::new(BookStore::new())),
            ids,
            clock,
        }
    }

    /// Empty store with UUID ids and the system clock
    pub fn in_memory() -> Self {
        Self::new(Arc::new(UuidIdProvider), Arc::new(SystemClock))
    }

    fn store(&self) -> Result<MutexGuard<'_, BookStore>, BookError> {
        self.store
            .lock()
            .map_err(|_| BookError::Internal(anyhow::anyhow!("book store lock poisoned")))
    }

    pub fn create(&self, payload: BookPayload) -> Result<String, BookError> {
        validate(&payload)?;

        let now = self.clock.now();
        let book = Book {
            id: self.ids.next_id(),
            finished: payload.page_count == payload.read_page,
            name: payload.name,
            year: payload.year,
            author: payload.author,
            summary: payload.summary,
            publisher: payload.publisher,
            page_count: payload.page_count,
            read_page: payload.read_page,
            reading: payload.reading,
            inserted_at: now,
            updated_at: now,
        };
        let id = book.id.clone();

        let mut store = self.store()?;
        if store.find_index_by_id(&id).is_some() {
            return Err(BookError::Internal(anyhow::anyhow!(
                "id provider returned duplicate id {id}"
            )));
        }
        store.append(book);

        tracing::info!(book_id = %id, total = store.len(), "book added");
        Ok(id)
    }

    pub fn list(&self, filter: &BookFilter) -> Result<Vec<BookSummary>, BookError> {
        let store = self.store()?;
        Ok(store
            .all()
            .iter()
            .filter(|book| filter.matches(book))
            .map(Book::summary)
            .collect())
    }

    pub fn get_by_id(&self, id: &str) -> Result<Book, BookError> {
        let store = self.store()?;
        store
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| BookError::NotFound(id.to_string()))
    }

    /// Replace everything but `id`, `insertedAt` and `finished`.
    ///
    /// The payload is validated before the id is looked up.
    pub fn update(&self, id: &str, payload: BookPayload) -> Result<(), BookError> {
        validate(&payload)?;

        let mut store = self.store()?;
        let index = store
            .find_index_by_id(id)
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;

        let current = &store.all()[index];
        let updated = Book {
            id: current.id.clone(),
            finished: current.finished,
            inserted_at: current.inserted_at,
            name: payload.name,
            year: payload.year,
            author: payload.author,
            summary: payload.summary,
            publisher: payload.publisher,
            page_count: payload.page_count,
            read_page: payload.read_page,
            reading: payload.reading,
            updated_at: self.clock.now(),
        };
        store.replace_at(index, updated);

        tracing::info!(book_id = %id, "book updated");
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), BookError> {
        let mut store = self.store()?;
        let index = store
            .find_index_by_id(id)
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;
        store.remove_at(index);

        tracing::info!(book_id = %id, total = store.len(), "book deleted");
        Ok(())
    }

    /// Number of books currently held
    pub fn count(&self) -> Result<usize, BookError> {
        Ok(self.store()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicU64, Ordering};
    use time::{Duration, OffsetDateTime};

    struct SequentialIds(AtomicU64);

    impl IdProvider for SequentialIds {
        fn next_id(&self) -> String {
            format!("book-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    /// Advances one second per reading.
    struct TickingClock(AtomicU64);

    impl Clock for TickingClock {
        fn now(&self) -> OffsetDateTime {
            let tick = self.0.fetch_add(1, Ordering::SeqCst) as i64;
            OffsetDateTime::UNIX_EPOCH + Duration::seconds(tick)
        }
    }

    fn service() -> BookService {
        BookService::new(
            Arc::new(SequentialIds(AtomicU64::new(0))),
            Arc::new(TickingClock(AtomicU64::new(0))),
        )
    }

    fn payload(name: &str, page_count: u32, read_page: u32, reading: bool) -> BookPayload {
        BookPayload {
            name: name.to_string(),
            year: 2010,
            author: "John Doe".to_string(),
            summary: "Lorem ipsum dolor sit amet".to_string(),
            publisher: "Dicoding Indonesia".to_string(),
            page_count,
            read_page,
            reading,
        }
    }

    fn all_ids(service: &BookService) -> Vec<String> {
        service
            .list(&BookFilter::default())
            .unwrap()
            .into_iter()
            .map(|summary| summary.id)
            .collect()
    }

    #[rstest]
    #[case(100, 100, true)]
    #[case(100, 50, false)]
    #[case(0, 0, true)]
    fn create_derives_finished(
        #[case] page_count: u32,
        #[case] read_page: u32,
        #[case] finished: bool,
    ) {
        let service = service();
        let id = service
            .create(payload("Book", page_count, read_page, false))
            .unwrap();

        let book = service.get_by_id(&id).unwrap();
        assert_eq!(book.finished, finished);
        assert_eq!(book.inserted_at, book.updated_at);
    }

    #[test]
    fn create_rejects_empty_name_before_page_check() {
        let service = service();
        let err = service.create(payload("", 10, 20, false)).unwrap_err();
        assert!(matches!(
            err,
            BookError::Validation(ValidationError::MissingName)
        ));
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn create_rejects_read_page_above_page_count() {
        let service = service();
        let err = service.create(payload("Book", 10, 11, false)).unwrap_err();
        assert!(matches!(
            err,
            BookError::Validation(ValidationError::ReadPageExceedsPageCount)
        ));
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn list_returns_every_book_in_creation_order() {
        let service = service();
        let created: Vec<String> = (0..5)
            .map(|i| {
                service
                    .create(payload(&format!("Book {i}"), 10, 0, false))
                    .unwrap()
            })
            .collect();

        assert_eq!(all_ids(&service), created);
    }

    #[test]
    fn list_on_empty_store_is_empty() {
        assert!(service().list(&BookFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let service = service();
        service.create(payload("War and Peace", 10, 0, false)).unwrap();
        service.create(payload("warfare", 10, 0, false)).unwrap();
        service.create(payload("Peace", 10, 0, false)).unwrap();

        let filter = BookFilter {
            name: Some("WAR".to_string()),
            ..BookFilter::default()
        };
        let names: Vec<String> = service
            .list(&filter)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["War and Peace", "warfare"]);
    }

    #[rstest]
    #[case(Some(true), None, vec!["book-1", "book-3"])]
    #[case(Some(false), None, vec!["book-2"])]
    #[case(None, Some(true), vec!["book-1", "book-2"])]
    #[case(Some(true), Some(false), vec!["book-3"])]
    fn flag_filters_compose(
        #[case] reading: Option<bool>,
        #[case] finished: Option<bool>,
        #[case] expected: Vec<&str>,
    ) {
        let service = service();
        service.create(payload("A", 10, 10, true)).unwrap();
        service.create(payload("B", 10, 10, false)).unwrap();
        service.create(payload("C", 10, 5, true)).unwrap();

        let filter = BookFilter {
            name: None,
            reading,
            finished,
        };
        let ids: Vec<String> = service
            .list(&filter)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let err = service().get_by_id("nope").unwrap_err();
        assert!(matches!(err, BookError::NotFound(id) if id == "nope"));
    }

    #[test]
    fn update_replaces_fields_but_keeps_identity_and_finished() {
        let service = service();
        let id = service.create(payload("Old", 100, 100, false)).unwrap();
        let before = service.get_by_id(&id).unwrap();

        service.update(&id, payload("New", 200, 20, true)).unwrap();
        let after = service.get_by_id(&id).unwrap();

        assert_eq!(after.id, before.id);
        assert_eq!(after.inserted_at, before.inserted_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.name, "New");
        assert_eq!(after.page_count, 200);
        assert_eq!(after.read_page, 20);
        assert!(after.reading);
        // finished is fixed at creation
        assert!(after.finished);
    }

    #[test]
    fn update_unknown_id_leaves_store_unchanged() {
        let service = service();
        let id = service.create(payload("Keep", 10, 1, false)).unwrap();
        let before = service.get_by_id(&id).unwrap();

        let err = service.update("missing", payload("X", 10, 1, false)).unwrap_err();
        assert!(matches!(err, BookError::NotFound(_)));
        assert_eq!(service.get_by_id(&id).unwrap(), before);
        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn update_validates_before_looking_up_id() {
        let service = service();
        let err = service.update("missing", payload("", 10, 1, false)).unwrap_err();
        assert!(matches!(
            err,
            BookError::Validation(ValidationError::MissingName)
        ));

        let id = service.create(payload("Keep", 10, 1, false)).unwrap();
        let before = service.get_by_id(&id).unwrap();
        let err = service.update(&id, payload("Keep", 10, 50, false)).unwrap_err();
        assert!(matches!(
            err,
            BookError::Validation(ValidationError::ReadPageExceedsPageCount)
        ));
        assert_eq!(service.get_by_id(&id).unwrap(), before);
    }

    #[test]
    fn delete_removes_only_target_and_keeps_order() {
        let service = service();
        let a = service.create(payload("A", 10, 0, false)).unwrap();
        let b = service.create(payload("B", 10, 0, false)).unwrap();
        let c = service.create(payload("C", 10, 0, false)).unwrap();

        service.delete(&b).unwrap();
        assert_eq!(all_ids(&service), vec![a.clone(), c.clone()]);
        assert!(service.get_by_id(&c).is_ok());

        let err = service.delete(&b).unwrap_err();
        assert!(matches!(err, BookError::NotFound(_)));
        assert_eq!(all_ids(&service), vec![a, c]);
    }

    #[test]
    fn clones_share_the_same_store() {
        let service = service();
        let other = service.clone();
        let id = service.create(payload("Shared", 1, 0, false)).unwrap();
        assert_eq!(other.get_by_id(&id).unwrap().name, "Shared");
    }

    #[test]
    fn duplicate_ids_from_provider_are_internal_errors() {
        struct FixedId;
        impl IdProvider for FixedId {
            fn next_id(&self) -> String {
                "same".to_string()
            }
        }

        let service = BookService::new(Arc::new(FixedId), Arc::new(SystemClock));
        service.create(payload("First", 1, 0, false)).unwrap();
        let err = service.create(payload("Second", 1, 0, false)).unwrap_err();
        assert!(matches!(err, BookError::Internal(_)));
        assert_eq!(service.count().unwrap(), 1);
    }
}
