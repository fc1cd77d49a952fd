use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;

/// Closed error taxonomy for the core workflows. Every rejected operation
/// surfaces one of these kinds; none of them is retryable by the caller.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ApiError {
    #[display(fmt = "validation error: {}", _0)]
    Validation(String),

    #[display(fmt = "forbidden: {}", _0)]
    Forbidden(String),

    #[display(fmt = "invalid transition: {}", _0)]
    InvalidTransition(String),

    #[display(
        fmt = "insufficient {} balance: have {}, need {}",
        leave_type,
        available,
        requested
    )]
    InsufficientBalance {
        leave_type: String,
        available: u32,
        requested: u32,
    },

    #[display(fmt = "{} not found", _0)]
    NotFound(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::InvalidTransition(_) => "invalid_transition",
            ApiError::InsufficientBalance { .. } => "insufficient_balance",
            ApiError::NotFound(_) => "not_found",
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::InvalidTransition(_) => StatusCode::CONFLICT,
            ApiError::InsufficientBalance { .. } => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn every_kind_maps_to_a_specific_status() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Forbidden("no".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::InvalidTransition("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::NotFound("leave request 9".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn insufficient_balance_display_names_the_numbers() {
        let err = ApiError::InsufficientBalance {
            leave_type: "annual".into(),
            available: 2,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient annual balance: have 2, need 5"
        );
        assert_eq!(err.kind(), "insufficient_balance");
    }
}
