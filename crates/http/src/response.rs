//! Uniform `{status, message, data}` envelope returned by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Outcome marker carried in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Fail,
}

/// Wire shape shared by success and failure responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// A successful response: envelope plus the status code it is sent with.
#[derive(Debug)]
pub struct ApiResponse<T> {
    code: StatusCode,
    envelope: Envelope<T>,
}

impl<T> ApiResponse<T> {
    /// 200 with a data payload
    pub fn ok(data: T) -> Self {
        Self::with_code(StatusCode::OK, data)
    }

    /// 201 with a data payload
    pub fn created(data: T) -> Self {
        Self::with_code(StatusCode::CREATED, data)
    }

    fn with_code(code: StatusCode, data: T) -> Self {
        Self {
            code,
            envelope: Envelope {
                status: Status::Success,
                message: None,
                data: Some(data),
            },
        }
    }

    /// Attach a human readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.envelope.message = Some(message.into());
        self
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn envelope(&self) -> &Envelope<T> {
        &self.envelope
    }
}

impl ApiResponse<()> {
    /// 200 carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::OK,
            envelope: Envelope {
                status: Status::Success,
                message: Some(message.into()),
                data: None,
            },
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self.envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn created_carries_message_and_data() {
        let response = ApiResponse::created(json!({"bookId": "abc"})).with_message("Book added");
        assert_eq!(response.code(), StatusCode::CREATED);
        assert_eq!(
            serde_json::to_value(response.envelope()).unwrap(),
            json!({"status": "success", "message": "Book added", "data": {"bookId": "abc"}})
        );
    }

    #[test]
    fn message_only_omits_data() {
        let response = ApiResponse::message("Book deleted");
        assert_eq!(response.code(), StatusCode::OK);
        assert_eq!(
            serde_json::to_value(response.envelope()).unwrap(),
            json!({"status": "success", "message": "Book deleted"})
        );
    }

    #[test]
    fn ok_without_message_omits_message() {
        let response = ApiResponse::ok(json!({"books": []}));
        let value = serde_json::to_value(response.envelope()).unwrap();
        assert!(value.get("message").is_none());
        assert_eq!(value["data"]["books"], json!([]));
    }
}
