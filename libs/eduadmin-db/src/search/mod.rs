//! Declarative search conditions.
//!
//! A request type lists its searchable fields with `#[derive(Searchable)]`; each field carries
//! an operator tag and an optional column override. [`SearchPlan`] resolves the tags and
//! columns against an entity once, then turns each bound request into a `Condition` in which
//! only fields with a non-zero value take part.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paging::PageRequest;

mod plan;

pub use eduadmin_db_macros::Searchable;
pub use plan::SearchPlan;

/// Comparison operator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOp {
    Exact,
    IExact,
    Contains,
    IContains,
    StartsWith,
    EndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Inclusive on both ends.
    Range,
    In,
    /// Contributes `ORDER BY` rather than a predicate.
    Order,
}

impl SearchOp {
    pub const ALL: [SearchOp; 13] = [
        SearchOp::Exact,
        SearchOp::IExact,
        SearchOp::Contains,
        SearchOp::IContains,
        SearchOp::StartsWith,
        SearchOp::EndsWith,
        SearchOp::Gt,
        SearchOp::Gte,
        SearchOp::Lt,
        SearchOp::Lte,
        SearchOp::Range,
        SearchOp::In,
        SearchOp::Order,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchOp::Exact => "exact",
            SearchOp::IExact => "iexact",
            SearchOp::Contains => "contains",
            SearchOp::IContains => "icontains",
            SearchOp::StartsWith => "startswith",
            SearchOp::EndsWith => "endswith",
            SearchOp::Gt => "gt",
            SearchOp::Gte => "gte",
            SearchOp::Lt => "lt",
            SearchOp::Lte => "lte",
            SearchOp::Range => "range",
            SearchOp::In => "in",
            SearchOp::Order => "order",
        }
    }
}

impl FromStr for SearchOp {
    type Err = SearchConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| SearchConfigError::UnsupportedOperator(s.to_owned()))
    }
}

impl fmt::Display for SearchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one searchable field, emitted by `#[derive(Searchable)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchField {
    pub field: &'static str,
    pub op: &'static str,
    pub column: &'static str,
}

/// A bound field value, reduced to what the condition builder needs.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchValue {
    Empty,
    Int(i64),
    Text(String),
    Bool(bool),
    List(Vec<SearchValue>),
    Range {
        from: Box<SearchValue>,
        to: Box<SearchValue>,
    },
}

impl SearchValue {
    /// Zero values never contribute a clause, so "equals empty" and "equals 0" cannot be
    /// expressed through search.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            SearchValue::Empty => true,
            SearchValue::Int(i) => *i == 0,
            SearchValue::Text(s) => s.is_empty(),
            SearchValue::Bool(b) => !*b,
            SearchValue::List(items) => items.iter().all(SearchValue::is_zero),
            SearchValue::Range { from, to } => from.is_zero() && to.is_zero(),
        }
    }

    /// Scalar as a query value; `None` for zero scalars and composites.
    #[must_use]
    pub fn to_value(&self) -> Option<sea_orm::Value> {
        if self.is_zero() {
            return None;
        }
        match self {
            SearchValue::Int(i) => Some(sea_orm::Value::from(*i)),
            SearchValue::Text(s) => Some(sea_orm::Value::from(s.clone())),
            SearchValue::Bool(b) => Some(sea_orm::Value::from(*b)),
            SearchValue::Empty | SearchValue::List(_) | SearchValue::Range { .. } => None,
        }
    }
}

impl fmt::Display for SearchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchValue::Empty => Ok(()),
            SearchValue::Int(i) => write!(f, "{i}"),
            SearchValue::Text(s) => f.write_str(s),
            SearchValue::Bool(b) => write!(f, "{b}"),
            SearchValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            SearchValue::Range { from, to } => write!(f, "{from}..={to}"),
        }
    }
}

/// Conversion of a request field into a [`SearchValue`].
pub trait IntoSearchValue {
    fn to_search_value(&self) -> SearchValue;
}

impl IntoSearchValue for String {
    fn to_search_value(&self) -> SearchValue {
        SearchValue::Text(self.clone())
    }
}

impl IntoSearchValue for str {
    fn to_search_value(&self) -> SearchValue {
        SearchValue::Text(self.to_owned())
    }
}

impl IntoSearchValue for i32 {
    fn to_search_value(&self) -> SearchValue {
        SearchValue::Int(i64::from(*self))
    }
}

impl IntoSearchValue for i64 {
    fn to_search_value(&self) -> SearchValue {
        SearchValue::Int(*self)
    }
}

impl IntoSearchValue for u32 {
    fn to_search_value(&self) -> SearchValue {
        SearchValue::Int(i64::from(*self))
    }
}

impl IntoSearchValue for bool {
    fn to_search_value(&self) -> SearchValue {
        SearchValue::Bool(*self)
    }
}

impl<T: IntoSearchValue> IntoSearchValue for Option<T> {
    fn to_search_value(&self) -> SearchValue {
        self.as_ref()
            .map_or(SearchValue::Empty, IntoSearchValue::to_search_value)
    }
}

impl<T: IntoSearchValue> IntoSearchValue for Vec<T> {
    fn to_search_value(&self) -> SearchValue {
        SearchValue::List(self.iter().map(IntoSearchValue::to_search_value).collect())
    }
}

/// Two-sided bound for `range` fields. Either side may be left at its zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRange<T> {
    pub from: T,
    pub to: T,
}

impl<T: IntoSearchValue> IntoSearchValue for SearchRange<T> {
    fn to_search_value(&self) -> SearchValue {
        SearchValue::Range {
            from: Box::new(self.from.to_search_value()),
            to: Box::new(self.to.to_search_value()),
        }
    }
}

/// A bound request object with declared search fields.
///
/// Implemented by `#[derive(Searchable)]`; `search_values` yields one value per entry of
/// `FIELDS`, in the same order.
pub trait SearchRequest {
    const FIELDS: &'static [SearchField];

    fn search_values(&self) -> Vec<SearchValue>;

    fn page(&self) -> PageRequest {
        PageRequest::default()
    }
}

/// Search declarations that do not match the entity. Raised at registration, never per request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchConfigError {
    #[error("unsupported search operator '{0}'")]
    UnsupportedOperator(String),

    #[error("search field '{field}' refers to unknown column '{column}' of {entity}")]
    UnknownColumn {
        entity: String,
        field: &'static str,
        column: &'static str,
    },

    #[error("search field '{0}' is declared more than once")]
    DuplicateField(&'static str),
}
