//! Validated operations over a loaded record set. Every check runs before any
//! mutation, so a rejected request leaves the records untouched.

pub mod fee_service;
pub mod school_service;
pub mod score_service;
pub mod student_service;

pub use fee_service::{FeeService, PaymentRequest};
pub use school_service::SchoolService;
pub use score_service::ScoreService;
pub use student_service::{NewStudent, StudentService};

use crate::errors::SchoolError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Records(#[from] SchoolError),
    #[error("{0}")]
    Invalid(String),
}

pub(crate) fn required<'a>(value: &'a str, what: &str) -> ServiceResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ServiceError::Invalid(format!("{} must not be empty", what)))
    } else {
        Ok(trimmed)
    }
}
