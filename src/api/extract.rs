//! Extractors that report rejections through [`PulseError`].
//!
//! axum's stock `Json` and `Query` answer malformed input with a plain-text
//! body. These wrappers turn every rejection into the JSON error envelope
//! with code 1001.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::Json;

use crate::error::PulseError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(PulseError))]
pub struct ApiJson<T>(pub T);

/// Query-string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(PulseError))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for PulseError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for PulseError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}
