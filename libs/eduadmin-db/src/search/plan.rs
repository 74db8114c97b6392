use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, Order};

use super::{SearchConfigError, SearchOp, SearchRequest, SearchValue};

struct Clause<C> {
    field: &'static str,
    op: SearchOp,
    column: C,
}

/// Search declarations of `R` resolved against the columns of `E`.
///
/// Built once when a service is registered; per request it only walks the clause list.
pub struct SearchPlan<E: EntityTrait, R> {
    clauses: Vec<Clause<E::Column>>,
    _req: PhantomData<fn(&R)>,
}

impl<E: EntityTrait, R> fmt::Debug for SearchPlan<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.clauses.iter().map(|c| (c.field, c.op.as_str())))
            .finish()
    }
}

impl<E, R> SearchPlan<E, R>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
    R: SearchRequest,
{
    /// Resolve every declared operator tag and column name.
    ///
    /// # Errors
    /// [`SearchConfigError`] for an unknown tag, an unknown column or a repeated field.
    pub fn compile() -> Result<Self, SearchConfigError> {
        let mut seen = HashSet::new();
        let mut clauses = Vec::with_capacity(R::FIELDS.len());
        for decl in R::FIELDS {
            if !seen.insert(decl.field) {
                return Err(SearchConfigError::DuplicateField(decl.field));
            }
            let op = decl.op.parse::<SearchOp>()?;
            let column = E::Column::from_str(decl.column).map_err(|_| {
                SearchConfigError::UnknownColumn {
                    entity: E::default().table_name().to_owned(),
                    field: decl.field,
                    column: decl.column,
                }
            })?;
            clauses.push(Clause {
                field: decl.field,
                op,
                column,
            });
        }
        Ok(Self {
            clauses,
            _req: PhantomData,
        })
    }

    /// AND of one clause per non-zero field, in declaration order.
    #[must_use]
    pub fn condition(&self, req: &R) -> Condition {
        let values = req.search_values();
        self.clauses
            .iter()
            .zip(values.iter())
            .filter(|(_, value)| !value.is_zero())
            .filter_map(|(clause, value)| predicate(clause.op, clause.column, value))
            .fold(Condition::all(), |cond, expr| cond.add(expr))
    }

    /// `ORDER BY` terms from non-zero `order` fields. `"desc"` (any case) sorts descending.
    #[must_use]
    pub fn ordering(&self, req: &R) -> Vec<(E::Column, Order)> {
        let values = req.search_values();
        self.clauses
            .iter()
            .zip(values.iter())
            .filter(|(clause, value)| clause.op == SearchOp::Order && !value.is_zero())
            .map(|(clause, value)| {
                let order = match value {
                    SearchValue::Text(dir) if dir.eq_ignore_ascii_case("desc") => Order::Desc,
                    _ => Order::Asc,
                };
                (clause.column, order)
            })
            .collect()
    }
}

fn text_of(value: &SearchValue) -> String {
    match value {
        SearchValue::Text(s) => s.clone(),
        other => other.to_string(),
    }
}

fn lower<C: ColumnTrait>(column: C) -> Expr {
    Expr::expr(Func::lower(Expr::col(column)))
}

fn predicate<C>(op: SearchOp, column: C, value: &SearchValue) -> Option<SimpleExpr>
where
    C: ColumnTrait + Copy,
{
    match op {
        SearchOp::Exact => value.to_value().map(|v| column.eq(v)),
        SearchOp::IExact => Some(lower(column).eq(text_of(value).to_lowercase())),
        SearchOp::Contains => Some(column.contains(text_of(value))),
        SearchOp::IContains => {
            Some(lower(column).like(format!("%{}%", text_of(value).to_lowercase())))
        }
        SearchOp::StartsWith => Some(column.starts_with(text_of(value))),
        SearchOp::EndsWith => Some(column.ends_with(text_of(value))),
        SearchOp::Gt => value.to_value().map(|v| column.gt(v)),
        SearchOp::Gte => value.to_value().map(|v| column.gte(v)),
        SearchOp::Lt => value.to_value().map(|v| column.lt(v)),
        SearchOp::Lte => value.to_value().map(|v| column.lte(v)),
        SearchOp::Range => match value {
            SearchValue::Range { from, to } => match (from.to_value(), to.to_value()) {
                (Some(lo), Some(hi)) => Some(column.between(lo, hi)),
                (Some(lo), None) => Some(column.gte(lo)),
                (None, Some(hi)) => Some(column.lte(hi)),
                (None, None) => None,
            },
            _ => None,
        },
        SearchOp::In => {
            let items: Vec<sea_orm::Value> = match value {
                SearchValue::List(items) => items.iter().filter_map(SearchValue::to_value).collect(),
                scalar => scalar.to_value().into_iter().collect(),
            };
            (!items.is_empty()).then(|| column.is_in(items))
        }
        SearchOp::Order => None,
    }
}
