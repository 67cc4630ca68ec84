use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// A book on the shelf together with its reading progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, assigned at creation
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    /// Total number of pages
    pub page_count: u32,
    /// Pages read so far, never above `page_count`
    pub read_page: u32,
    pub reading: bool,
    /// Whether every page had been read when the book was added
    pub finished: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Request model for creating or replacing a book.
///
/// A missing or `null` name decodes as empty so it is reported by validation
/// rather than as a decode error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Projection returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

/// Criteria for listing books; every field that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    pub reading: Option<bool>,
    pub finished: Option<bool>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(name) = &self.name {
            if !book.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if self.reading.is_some_and(|reading| book.reading != reading) {
            return false;
        }
        if self.finished.is_some_and(|finished| book.finished != finished) {
            return false;
        }
        true
    }
}

/// `data` of a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBook {
    pub book_id: String,
}

/// `data` of a successful list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

/// `data` of a successful fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDetail {
    pub book: Book,
}
