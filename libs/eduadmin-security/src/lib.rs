#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Caller identity and row-level data permissions.
//!
//! A [`SecurityContext`] carries the authenticated caller. The [`PermissionResolver`]
//! turns it into a [`DataPermission`] by consulting a [`RoleStore`]; the permission is
//! then passed by value into every scoped storage operation.

pub mod context;
pub mod data_permission;
pub mod data_scope;
pub mod resolver;
pub mod static_store;

/// Identifier of an authenticated user.
pub type UserId = i32;

/// Identifier of a department in the organisation tree.
pub type DeptId = i32;

pub use context::SecurityContext;
pub use data_permission::{DataPermission, PermissionMode};
pub use data_scope::DataScope;
pub use resolver::{PermissionResolver, ResolveError, RoleAssignment, RoleGrant, RoleStore};
pub use static_store::{StaticRoleStore, StaticRoleStoreConfig};
