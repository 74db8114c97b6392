//! Row-level data permission for `SeaORM` queries.
//!
//! A [`DataPermission`] is compiled into a `Condition` by [`build_permission_condition`]
//! and ANDed into the WHERE clause of every read, update and delete. The typestate
//! wrappers ([`SecureSelect`], [`SecureUpdateMany`], [`SecureDeleteMany`]) only expose
//! execution once `.scope_with(&permission)` has been applied.
//!
//! ```ignore
//! use eduadmin_db::secure::{DataPermission, SecureEntityExt};
//!
//! let perm = DataPermission::own_records(7);
//! let rows = em_class_info::Entity::find()
//!     .secure()
//!     .scope_with(&perm)?
//!     .all(conn)
//!     .await?;
//! ```

mod cond;
mod db_ops;
mod entity_traits;
mod error;
mod secure_conn;
mod select;

/// Primary key type shared by every admin entity.
pub type RecordId = i32;

pub use cond::build_permission_condition;
pub use db_ops::{
    SecureDeleteExt, SecureDeleteMany, SecureUpdateExt, SecureUpdateMany, secure_insert,
    stamp_column,
};
pub use entity_traits::ScopableEntity;
pub use error::ScopeError;
pub use secure_conn::SecureConn;
pub use select::{Scoped, SecureEntityExt, SecureSelect, Unscoped};

pub use eduadmin_db_macros::Scopable;
pub use eduadmin_security::{DataPermission, PermissionMode, UserId};
