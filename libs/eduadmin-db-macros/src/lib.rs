//! # eduadmin-db-macros
//!
//! Derives for the `eduadmin-db` scoped data layer.
//!
//! ## `#[derive(Scopable)]`
//!
//! Implements `ScopableEntity` for a `SeaORM` entity. Every ownership dimension must be
//! declared explicitly:
//!
//! ```ignore
//! #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Scopable)]
//! #[sea_orm(table_name = "em_textbook_sup")]
//! #[secure(
//!     id_col = "id",
//!     dept_col = "dept_id",
//!     creator_col = "create_by",
//!     updater_col = "update_by"
//! )]
//! pub struct Model { /* ... */ }
//! ```
//!
//! - `id_col = "..."` (required)
//! - `dept_col = "..."` OR `no_dept`
//! - `creator_col = "..."` OR `no_creator`
//! - `updater_col = "..."` OR `no_updater`
//!
//! ## `#[derive(Searchable)]`
//!
//! Implements `SearchRequest` for a request struct. Fields tagged with
//! `#[search(op = "...", column = "...")]` become search conditions; a field tagged
//! `#[search(pagination)]` supplies the page request.

use proc_macro::TokenStream;
use proc_macro_error2::{abort, proc_macro_error};
use syn::{DeriveInput, parse_macro_input};

mod scopable;
mod searchable;

/// Derive `ScopableEntity` from `#[secure(...)]` attributes on a `SeaORM` `Model`.
#[proc_macro_derive(Scopable, attributes(secure))]
#[proc_macro_error]
pub fn derive_scopable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match scopable::expand(&input) {
        Ok(ts) => ts.into(),
        Err(err) => abort!(err.span(), "{}", err),
    }
}

/// Derive `SearchRequest` from `#[search(...)]` field attributes.
///
/// Supported operators: `exact`, `iexact`, `contains`, `icontains`, `startswith`,
/// `endswith`, `gt`, `gte`, `lt`, `lte`, `range`, `in`, `order`.
#[proc_macro_derive(Searchable, attributes(search))]
#[proc_macro_error]
pub fn derive_searchable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match searchable::expand(&input) {
        Ok(ts) => ts.into(),
        Err(err) => abort!(err.span(), "{}", err),
    }
}
