pub mod models;
pub mod providers;
pub mod routes;
pub mod service;
pub mod store;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use service::BookService;

/// Books module: the in-memory bookshelf and its `/books` routes
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new() -> Self {
        Self::with_service(BookService::in_memory())
    }

    /// Build the module around an existing service handle
    pub fn with_service(service: BookService) -> Self {
        Self { service }
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let fail = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/FailResponse" }
                    }
                }
            })
        };
        let book_id_param = json!({
            "name": "bookId",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });
        let flag_param = |name: &str| {
            json!({
                "name": name,
                "in": "query",
                "required": false,
                "schema": { "type": "string", "enum": ["0", "1"] }
            })
        };
        let payload_body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                }
            }
        });

        Some(json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "name",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "string" }
                            },
                            flag_param("reading"),
                            flag_param("finished")
                        ],
                        "responses": {
                            "200": { "description": "Summaries of matching books" },
                            "500": fail("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": payload_body.clone(),
                        "responses": {
                            "201": { "description": "Book added" },
                            "400": fail("Invalid payload"),
                            "500": fail("Internal server error")
                        }
                    }
                },
                "/books/{bookId}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [book_id_param.clone()],
                        "responses": {
                            "200": { "description": "The full book record" },
                            "404": fail("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Update a book",
                        "tags": ["Books"],
                        "parameters": [book_id_param.clone()],
                        "requestBody": payload_body,
                        "responses": {
                            "200": { "description": "Book updated" },
                            "400": fail("Invalid payload"),
                            "404": fail("Book not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [book_id_param],
                        "responses": {
                            "200": { "description": "Book deleted" },
                            "404": fail("Book not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "BookPayload": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "year": { "type": "integer" },
                            "author": { "type": "string" },
                            "summary": { "type": "string" },
                            "publisher": { "type": "string" },
                            "pageCount": { "type": "integer", "minimum": 0 },
                            "readPage": { "type": "integer", "minimum": 0 },
                            "reading": { "type": "boolean" }
                        },
                        "required": [
                            "name", "year", "author", "summary",
                            "publisher", "pageCount", "readPage", "reading"
                        ]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let discarded = self.service.count()?;
        tracing::info!(
            module = self.name(),
            discarded,
            "books module stopped; in-memory books discarded"
        );
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
