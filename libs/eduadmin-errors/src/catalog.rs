//! Stable error codes shared by every admin entity.

use crate::problem::Problem;
use http::StatusCode;

#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    #[inline]
    pub fn as_problem(&self, detail: impl Into<String>) -> Problem {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Problem::new(status, self.title, detail.into())
            .with_code(self.code)
            .with_type(self.type_url)
    }
}

/// Row missing or outside the caller's data permission. The two are never told apart.
pub const NOT_FOUND_OR_FORBIDDEN: ErrDef = ErrDef {
    status: 404,
    title: "Not Found",
    code: "not_found_or_forbidden",
    type_url: "urn:eduadmin:error:not_found_or_forbidden",
};

pub const UPDATE_FORBIDDEN: ErrDef = ErrDef {
    status: 403,
    title: "Forbidden",
    code: "update_forbidden",
    type_url: "urn:eduadmin:error:update_forbidden",
};

pub const DELETE_FORBIDDEN: ErrDef = ErrDef {
    status: 403,
    title: "Forbidden",
    code: "delete_forbidden",
    type_url: "urn:eduadmin:error:delete_forbidden",
};

pub const PERMISSION_UNRESOLVED: ErrDef = ErrDef {
    status: 403,
    title: "Forbidden",
    code: "permission_unresolved",
    type_url: "urn:eduadmin:error:permission_unresolved",
};

pub const VALIDATION_FAILED: ErrDef = ErrDef {
    status: 422,
    title: "Validation Failed",
    code: "validation_failed",
    type_url: "urn:eduadmin:error:validation_failed",
};

pub const DATABASE_ERROR: ErrDef = ErrDef {
    status: 500,
    title: "Internal Server Error",
    code: "database_error",
    type_url: "urn:eduadmin:error:database_error",
};

pub const CONFIGURATION_ERROR: ErrDef = ErrDef {
    status: 500,
    title: "Internal Server Error",
    code: "configuration_error",
    type_url: "urn:eduadmin:error:configuration_error",
};
