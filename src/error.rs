use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Every failure a handler can surface, rendered as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("start_date cannot be after end_date")]
    InvalidRange,

    #[error("The selected dates contain no business days")]
    EmptyRange,

    #[error("You only have {available} offset days available")]
    InsufficientOffset { available: f64 },

    #[error("Offset days cannot exceed the total leave days ({total})")]
    OffsetExceedsTotal { total: u32 },

    #[error("Insufficient leave balance. You have {remaining} days remaining.")]
    InsufficientBalance { remaining: f64 },

    #[error("These dates overlap with an existing leave request")]
    Overlap,

    #[error("Leave request not found")]
    RequestNotFound,

    #[error("Leave request already processed")]
    AlreadyProcessed,

    #[error("Employee not found")]
    EmployeeNotFound,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Please provide details about the discrepancy")]
    MissingChangeNotes,

    #[error("Proposed records must cover the same months with non-negative values")]
    InvalidHistoryRecords,

    #[error("{0}")]
    Import(String),

    #[error("Please enter your Employee ID")]
    MissingEmployeeId,

    #[error("Please enter your Date of Birth in DDMMYYYY format")]
    InvalidDobFormat,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRange
            | AppError::EmptyRange
            | AppError::InsufficientOffset { .. }
            | AppError::OffsetExceedsTotal { .. }
            | AppError::InsufficientBalance { .. }
            | AppError::InvalidEmail
            | AppError::MissingChangeNotes
            | AppError::InvalidHistoryRecords
            | AppError::Import(_)
            | AppError::MissingEmployeeId
            | AppError::InvalidDobFormat => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::RequestNotFound | AppError::EmployeeNotFound => StatusCode::NOT_FOUND,
            AppError::Overlap | AppError::AlreadyProcessed => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(e) = self {
            tracing::error!(error = %e, "Internal error");
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_render_amounts_without_trailing_zeroes() {
        assert_eq!(
            AppError::InsufficientBalance { remaining: 4.0 }.to_string(),
            "Insufficient leave balance. You have 4 days remaining."
        );
        assert_eq!(
            AppError::OffsetExceedsTotal { total: 3 }.to_string(),
            "Offset days cannot exceed the total leave days (3)"
        );
    }

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(AppError::Overlap.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("HR only").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
