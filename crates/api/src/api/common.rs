// Common DTOs for public API
//
// These types are shared across multiple API endpoints.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use storefront_core::{listing::DEFAULT_LIMIT, Page, Role, SearchPattern, SortOrder};
use utoipa::{IntoParams, ToSchema};

use super::validation::ValidationError;
use crate::services::ServiceError;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Convert to axum response tuple
    pub fn into_response(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

/// Error type returned by every handler.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl From<ServiceError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Internal(e) => {
                tracing::error!(error = %e, "Request failed");
                return ErrorResponse::new("Internal server error")
                    .into_response(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };
        ErrorResponse::new(err.to_string()).into_response(status)
    }
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logout successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response wrapper for list endpoints: `{message, list: {count, items}}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    pub message: String,
    pub list: Page<T>,
}

impl<T> ListResponse<T> {
    pub fn new(message: impl Into<String>, list: Page<T>) -> Self {
        Self {
            message: message.into(),
            list,
        }
    }
}

/// Query parameters shared by list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page size (default 20, at least 1, capped at 200)
    pub limit: Option<usize>,
    /// Records to skip (default 0)
    pub skip: Option<usize>,
    /// Free-text search, matched case-insensitively
    pub searchtext: Option<String>,
    /// Restrict user listings to one role
    #[param(value_type = Option<String>)]
    pub role: Option<Role>,
    /// Field to sort by (default createdAt)
    pub sortkey: Option<String>,
    /// ASC or DESC (default DESC)
    #[param(value_type = Option<String>)]
    pub sortorder: Option<SortOrder>,
}

impl ListQuery {
    /// A page must hold at least one record. Oversized limits are capped instead.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.limit == Some(0) {
            return Err(ValidationError("limit must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn skip(&self) -> usize {
        self.skip.unwrap_or(0)
    }

    pub fn search(&self) -> Option<SearchPattern> {
        self.searchtext.as_deref().and_then(SearchPattern::new)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sortorder.unwrap_or_default()
    }

    pub fn sort_key(&self) -> &str {
        self.sortkey.as_deref().unwrap_or("createdAt")
    }
}
