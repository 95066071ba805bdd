//! Uniform success/problem response envelopes for ClassConnect services
//!
//! Both shapes mirror RFC 7807: failures are `ProblemDetails`, successes are
//! `SuccessDetails` (same envelope, `message`/`data` instead of `detail`).
//! Every repository operation and middleware rejection in the platform
//! resolves to exactly one `ApiResponse`, and HTTP-facing callers translate
//! its status straight into a transport status code.

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An RFC 7807 problem document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
}

impl ProblemDetails {
    /// Build a problem document. `type` is always `about:blank`; the title
    /// carries the human-readable classification.
    pub fn new(status: u16, title: impl Into<String>, detail: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            type_: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: instance.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>, instance: impl Into<String>) -> Self {
        Self::new(400, "Invalid request", detail, instance)
    }

    pub fn unauthorized(detail: impl Into<String>, instance: impl Into<String>) -> Self {
        Self::new(401, "Unauthorized", detail, instance)
    }

    pub fn forbidden(detail: impl Into<String>, instance: impl Into<String>) -> Self {
        Self::new(403, "Forbidden", detail, instance)
    }

    pub fn not_found(detail: impl Into<String>, instance: impl Into<String>) -> Self {
        Self::new(404, "Not Found", detail, instance)
    }

    pub fn conflict(detail: impl Into<String>, instance: impl Into<String>) -> Self {
        Self::new(409, "Conflict", detail, instance)
    }

    pub fn internal_server_error(detail: impl Into<String>, instance: impl Into<String>) -> Self {
        Self::new(500, "Internal server error", detail, instance)
    }

    /// Map an arbitrary status code onto the closed problem taxonomy.
    /// Unrecognized codes collapse to 500.
    pub fn from_status(status: u16, detail: impl Into<String>, instance: impl Into<String>) -> Self {
        match status {
            400 => Self::bad_request(detail, instance),
            401 => Self::unauthorized(detail, instance),
            403 => Self::forbidden(detail, instance),
            404 => Self::not_found(detail, instance),
            409 => Self::conflict(detail, instance),
            _ => Self::internal_server_error(detail, instance),
        }
    }
}

/// The success twin of [`ProblemDetails`]: same envelope, but with a
/// `message` and a `data` payload serialized to a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub message: String,
    pub instance: String,
    pub data: String,
}

impl SuccessDetails {
    pub fn new(
        status: u16,
        title: impl Into<String>,
        message: impl Into<String>,
        instance: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            type_: "about:blank".to_string(),
            title: title.into(),
            status,
            message: message.into(),
            instance: instance.into(),
            data: data.into(),
        }
    }
}

/// Outcome of a platform operation: exactly one of success or problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Success(SuccessDetails),
    Problem(ProblemDetails),
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        match self {
            Self::Success(s) => s.status,
            Self::Problem(p) => p.status,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Success(s) => &s.title,
            Self::Problem(p) => &p.title,
        }
    }

    pub fn type_(&self) -> &str {
        match self {
            Self::Success(s) => &s.type_,
            Self::Problem(p) => &p.type_,
        }
    }

    pub fn instance(&self) -> &str {
        match self {
            Self::Success(s) => &s.instance,
            Self::Problem(p) => &p.instance,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<SuccessDetails> for ApiResponse {
    fn from(details: SuccessDetails) -> Self {
        Self::Success(details)
    }
}

impl From<ProblemDetails> for ApiResponse {
    fn from(details: ProblemDetails) -> Self {
        Self::Problem(details)
    }
}

impl Responder for ApiResponse {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status).json(self)
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("expected a success response, got problem: {0}")]
    NotSuccess(String),
    #[error("failed to deserialize data payload: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Pull the typed payload back out of a success envelope.
pub fn extract_success_data<T: DeserializeOwned>(resp: &ApiResponse) -> Result<T, ExtractError> {
    match resp {
        ApiResponse::Success(success) => Ok(serde_json::from_str(&success.data)?),
        ApiResponse::Problem(problem) => Err(ExtractError::NotSuccess(problem.title.clone())),
    }
}
