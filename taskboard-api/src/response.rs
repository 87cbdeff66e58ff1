/// Success response envelope
///
/// Every successful response shares one shape: `status: true`, a
/// human-readable `message`, and optional `data`, pagination fields, and
/// `extra`. Optional fields are omitted entirely when unset, never emitted
/// as null.
///
/// Pagination fields travel together: `page`, `size`, and the scope `total`
/// are set by a single builder call, so a response can never carry a page
/// position without the total it is a page of.
///
/// # Example
///
/// ```
/// use taskboard_api::response::ApiResponse;
///
/// let body = ApiResponse::new("Tasks retrieved successfully")
///     .data(vec!["t1", "t2"])
///     .paginated(1, 10, 42);
///
/// let json = serde_json::to_value(&body).unwrap();
/// assert_eq!(json["status"], true);
/// assert_eq!(json["total"], 42);
/// ```

use axum::{response::IntoResponse, Json};
use serde::Serialize;

/// Success envelope
///
/// `T` is the payload type; use `()` for responses without data.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always true on the success path
    pub status: bool,

    /// Human-readable outcome message
    pub message: String,

    /// Payload, omitted when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Total rows in the filtered scope, omitted when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,

    /// Current page (1-based), only emitted together with `size`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// Page size, only emitted together with `page`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,

    /// Free-form extra payload, omitted when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a bare success envelope with only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
            data: None,
            total: None,
            page: None,
            size: None,
            extra: None,
        }
    }

    /// Attaches the payload
    pub fn data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Attaches pagination; page and size never appear without the total
    pub fn paginated(mut self, page: i64, size: i64, total: i64) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self.total = Some(total);
        self
    }

    /// Attaches a scope total on its own, for unpaginated counts
    pub fn total(mut self, total: i64) -> Self {
        self.total = Some(total);
        self
    }

    /// Attaches free-form extra payload
    pub fn extra(mut self, extra: serde_json::Value) -> Self {
        self.extra = Some(extra);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}
