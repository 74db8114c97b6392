//! Request objects bound from callers.
//!
//! Each entity has the same five shapes: `GetPageReq` (search + paging), `GetReq`,
//! `InsertReq`, `UpdateReq` and `DeleteReq`.

pub mod class_info;
pub mod supplier;

use eduadmin_errors::ValidationViolation;

/// Field-level checks run before a request reaches storage.
pub trait Validate {
    /// # Errors
    /// Every rejected field, in declaration order.
    fn validate(&self) -> Result<(), Vec<ValidationViolation>>;
}

pub(crate) fn require_non_empty(
    violations: &mut Vec<ValidationViolation>,
    field: &str,
    value: &str,
) {
    if value.trim().is_empty() {
        violations.push(ValidationViolation {
            field: field.to_owned(),
            message: "must not be empty".to_owned(),
        });
    }
}

pub(crate) fn require_non_negative(
    violations: &mut Vec<ValidationViolation>,
    field: &str,
    value: i32,
) {
    if value < 0 {
        violations.push(ValidationViolation {
            field: field.to_owned(),
            message: "must not be negative".to_owned(),
        });
    }
}

pub(crate) fn into_result(violations: Vec<ValidationViolation>) -> Result<(), Vec<ValidationViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
