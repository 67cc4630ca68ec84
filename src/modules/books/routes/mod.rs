//! HTTP handlers for `/books`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use bookshelf_http::{router::endpoint_not_found, ApiResponse, AppError};
use super::models::{BookDetail, BookFilter, BookList, BookPayload, CreatedBook};
use super::service::{BookError, BookService, ValidationError};

/// Builds the books router around a shared service handle.
pub fn router(service: BookService) -> Router {
    Router::new()
        .route(
            "/books",
            get(list_books)
                .post(add_book)
                .fallback(endpoint_not_found),
        )
        .route(
            "/books/{book_id}",
            get(get_book)
                .put(update_book)
                .delete(delete_book)
                .fallback(endpoint_not_found),
        )
        .with_state(service)
}

/// Raw `GET /books` query string.
#[derive(Debug, Default)]
pub struct ListQuery {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

impl ListQuery {
    /// Picks the known keys out of decoded pairs. A key given more than once
    /// is treated as absent.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let single = |key: &str| {
            let mut values = pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v);
            match (values.next(), values.next()) {
                (Some(value), None) => Some(value.clone()),
                _ => None,
            }
        };

        Self {
            name: single("name"),
            reading: single("reading"),
            finished: single("finished"),
        }
    }

    /// `"1"`/`"0"` become flags; other values and an empty name filter nothing.
    pub fn into_filter(self) -> BookFilter {
        BookFilter {
            name: self.name.filter(|name| !name.is_empty()),
            reading: self.reading.as_deref().and_then(parse_flag),
            finished: self.finished.as_deref().and_then(parse_flag),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Add,
    Fetch,
    Update,
    Delete,
}

impl Action {
    fn failure(self) -> &'static str {
        match self {
            Action::Add => "Failed to add book",
            Action::Fetch => "Failed to fetch book",
            Action::Update => "Failed to update book",
            Action::Delete => "Failed to delete book",
        }
    }

    fn error(self, err: BookError) -> AppError {
        match err {
            BookError::Validation(ValidationError::MissingName) => AppError::bad_request(format!(
                "{}. Please provide the book name",
                self.failure()
            )),
            BookError::Validation(ValidationError::ReadPageExceedsPageCount) => {
                AppError::bad_request(format!(
                    "{}. readPage must not be greater than pageCount",
                    self.failure()
                ))
            }
            BookError::NotFound(_) => match self {
                Action::Fetch => AppError::not_found("Book not found"),
                _ => AppError::not_found(format!("{}. Id not found", self.failure())),
            },
            BookError::Internal(e) => AppError::Internal(e),
        }
    }
}

fn decode_payload(
    payload: Result<Json<BookPayload>, JsonRejection>,
    action: Action,
) -> Result<BookPayload, AppError> {
    payload.map(|Json(payload)| payload).map_err(|rejection| {
        AppError::bad_request(format!("{}. {}", action.failure(), rejection.body_text()))
    })
}

async fn add_book(
    State(service): State<BookService>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<ApiResponse<CreatedBook>, AppError> {
    let payload = decode_payload(payload, Action::Add)?;
    let book_id = service.create(payload).map_err(|e| Action::Add.error(e))?;

    Ok(ApiResponse::created(CreatedBook { book_id }).with_message("Book added successfully"))
}

async fn list_books(
    State(service): State<BookService>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<ApiResponse<BookList>, AppError> {
    let query = match query {
        Ok(Query(pairs)) => ListQuery::from_pairs(&pairs),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "unreadable list query; listing unfiltered");
            ListQuery::default()
        }
    };
    let filter = query.into_filter();
    tracing::debug!(?filter, "listing books");

    let books = service.list(&filter).map_err(|e| Action::Fetch.error(e))?;
    Ok(ApiResponse::ok(BookList { books }))
}

async fn get_book(
    State(service): State<BookService>,
    Path(book_id): Path<String>,
) -> Result<ApiResponse<BookDetail>, AppError> {
    let book = service
        .get_by_id(&book_id)
        .map_err(|e| Action::Fetch.error(e))?;
    Ok(ApiResponse::ok(BookDetail { book }))
}

async fn update_book(
    State(service): State<BookService>,
    Path(book_id): Path<String>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<ApiResponse<()>, AppError> {
    let payload = decode_payload(payload, Action::Update)?;
    service
        .update(&book_id, payload)
        .map_err(|e| Action::Update.error(e))?;
    Ok(ApiResponse::message("Book updated successfully"))
}

async fn delete_book(
    State(service): State<BookService>,
    Path(book_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    service
        .delete(&book_id)
        .map_err(|e| Action::Delete.error(e))?;
    Ok(ApiResponse::message("Book deleted successfully"))
}
