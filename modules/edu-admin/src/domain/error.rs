use eduadmin_db::crud::RegistrationError;
use eduadmin_db::secure::ScopeError;
use eduadmin_errors::catalog::{
    CONFIGURATION_ERROR, DATABASE_ERROR, DELETE_FORBIDDEN, NOT_FOUND_OR_FORBIDDEN,
    PERMISSION_UNRESOLVED, UPDATE_FORBIDDEN, VALIDATION_FAILED,
};
use eduadmin_errors::{Problem, ValidationViolation};
use eduadmin_security::ResolveError;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Missing row and row outside the caller's scope look the same.
    #[error("object does not exist or access is not permitted")]
    NotFoundOrForbidden,

    #[error("no permission to update this data")]
    UpdateForbidden,

    #[error("no permission to delete this data")]
    DeleteForbidden,

    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<ValidationViolation>),

    #[error("data permission could not be resolved: {0}")]
    Permission(#[from] ResolveError),

    #[error("database error: {0}")]
    Database(#[source] sea_orm::DbErr),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<ScopeError> for DomainError {
    fn from(e: ScopeError) -> Self {
        match e {
            ScopeError::Db(db) => Self::Database(db),
            e @ ScopeError::Misconfigured { .. } => Self::Configuration(e.to_string()),
            ScopeError::NotFoundOrForbidden => Self::NotFoundOrForbidden,
            ScopeError::UpdateDenied => Self::UpdateForbidden,
            ScopeError::DeleteDenied => Self::DeleteForbidden,
        }
    }
}

impl From<RegistrationError> for DomainError {
    fn from(e: RegistrationError) -> Self {
        Self::Configuration(e.to_string())
    }
}

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        let detail = e.to_string();
        match e {
            DomainError::NotFoundOrForbidden => NOT_FOUND_OR_FORBIDDEN.as_problem(detail),
            DomainError::UpdateForbidden => UPDATE_FORBIDDEN.as_problem(detail),
            DomainError::DeleteForbidden => DELETE_FORBIDDEN.as_problem(detail),
            DomainError::Validation(violations) => {
                VALIDATION_FAILED.as_problem(detail).with_errors(violations)
            }
            DomainError::Permission(_) => PERMISSION_UNRESOLVED.as_problem(detail),
            // Storage details stay in the logs.
            DomainError::Database(_) => DATABASE_ERROR.as_problem("internal database error"),
            DomainError::Configuration(_) => CONFIGURATION_ERROR.as_problem(detail),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn maps_scope_errors() {
        assert!(matches!(
            DomainError::from(ScopeError::UpdateDenied),
            DomainError::UpdateForbidden
        ));
        assert!(matches!(
            DomainError::from(ScopeError::DeleteDenied),
            DomainError::DeleteForbidden
        ));
        assert!(matches!(
            DomainError::from(ScopeError::Misconfigured {
                entity: "em_class_info".into(),
                reason: "no dept column",
            }),
            DomainError::Configuration(ref msg) if msg.contains("em_class_info")
        ));
    }

    #[test]
    fn problems_carry_stable_codes() {
        let cases = [
            (DomainError::NotFoundOrForbidden, 404, "not_found_or_forbidden"),
            (DomainError::UpdateForbidden, 403, "update_forbidden"),
            (DomainError::DeleteForbidden, 403, "delete_forbidden"),
            (DomainError::Validation(vec![]), 422, "validation_failed"),
            (
                DomainError::Permission(ResolveError::UnknownUser(5)),
                403,
                "permission_unresolved",
            ),
            (
                DomainError::Database(sea_orm::DbErr::Custom("disk full".into())),
                500,
                "database_error",
            ),
            (DomainError::Configuration("x".into()), 500, "configuration_error"),
        ];
        for (err, status, code) in cases {
            let problem = Problem::from(err);
            assert_eq!(problem.status.as_u16(), status);
            assert_eq!(problem.code, code);
        }
    }

    #[test]
    fn database_detail_is_not_leaked() {
        let problem = Problem::from(DomainError::Database(sea_orm::DbErr::Custom(
            "table em_class_info is locked".into(),
        )));
        assert!(!problem.detail.contains("em_class_info"));
    }
}
