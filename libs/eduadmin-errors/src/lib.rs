//! Structured failures returned by eduadmin operations.
//!
//! Every per-request error ends up as a [`Problem`]: an HTTP-style status, a stable
//! machine-readable `code` and a human-readable message. The [`catalog`] lists the codes.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod problem;

pub use catalog::ErrDef;
pub use problem::{Problem, ValidationViolation};
