//! Translation of filters and sort orders into SQL over the `body` column.
//!
//! Every caller-supplied value, field path included, is bound as a
//! parameter. Field paths become `text[]` for the `#>` operator.

use serde_json::Value;
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};

use docrepo_core::types::path;
use docrepo_core::types::{Filter, FilterField, FilterOp, Sort};

fn field_path(field: &str) -> Vec<String> {
    path::segments(field).into_iter().map(str::to_string).collect()
}

/// Push `WHERE collection = $n [AND <condition>]...`.
pub fn push_where(qb: &mut QueryBuilder<'_, Postgres>, collection: &str, filter: &Filter) {
    qb.push(" WHERE collection = ");
    qb.push_bind(collection.to_string());
    for condition in filter.conditions() {
        qb.push(" AND ");
        push_condition(qb, condition);
    }
}

fn push_field(qb: &mut QueryBuilder<'_, Postgres>, field: &str) {
    qb.push("(body #> ");
    qb.push_bind(field_path(field));
    qb.push(")");
}

fn push_condition(qb: &mut QueryBuilder<'_, Postgres>, condition: &FilterField) {
    let value = condition.value.to_json();
    let field = condition.field.as_str();

    match condition.effective_op() {
        FilterOp::Eq => {
            push_field(qb, field);
            qb.push(" = ");
            qb.push_bind(Json(value));
        }
        FilterOp::Ne => {
            push_field(qb, field);
            qb.push(" IS DISTINCT FROM ");
            qb.push_bind(Json(value));
        }
        op @ (FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte) => {
            if value.is_null() {
                qb.push("FALSE");
                return;
            }
            let operator = match op {
                FilterOp::Gt => " > ",
                FilterOp::Gte => " >= ",
                FilterOp::Lt => " < ",
                _ => " <= ",
            };
            qb.push("(jsonb_typeof");
            push_field(qb, field);
            qb.push(" = jsonb_typeof(");
            qb.push_bind(Json(value.clone()));
            qb.push(") AND ");
            push_field(qb, field);
            qb.push(operator);
            qb.push_bind(Json(value));
            qb.push(")");
        }
        op @ (FilterOp::Like | FilterOp::ILike) => {
            let Value::String(pattern) = value else {
                qb.push("FALSE");
                return;
            };
            qb.push("(jsonb_typeof");
            push_field(qb, field);
            qb.push(" = 'string' AND (body #>> ");
            qb.push_bind(field_path(field));
            qb.push(if op == FilterOp::Like {
                ") LIKE "
            } else {
                ") ILIKE "
            });
            qb.push_bind(pattern);
            qb.push(")");
        }
        FilterOp::In => match condition.value.as_list() {
            Some(candidates) => {
                push_field(qb, field);
                qb.push(" IN (SELECT jsonb_array_elements(");
                qb.push_bind(Json(Value::Array(candidates)));
                qb.push("))");
            }
            None => {
                qb.push("FALSE");
            }
        },
        FilterOp::IsNull => {
            qb.push("COALESCE(");
            push_field(qb, field);
            qb.push(", 'null'::jsonb) = 'null'::jsonb");
        }
        FilterOp::IsNotNull => {
            qb.push("COALESCE(");
            push_field(qb, field);
            qb.push(", 'null'::jsonb) <> 'null'::jsonb");
        }
    }
}

/// Push `ORDER BY ...`. Missing fields order as JSON `null`; insertion
/// order breaks ties.
pub fn push_order_by(qb: &mut QueryBuilder<'_, Postgres>, sort: &Sort) {
    qb.push(" ORDER BY ");
    for key in sort.fields() {
        qb.push("COALESCE(");
        push_field(qb, &key.field);
        qb.push(", 'null'::jsonb) ");
        qb.push(key.direction.as_sql());
        qb.push(", ");
    }
    qb.push("seq ASC");
}

/// Push `LIMIT` / `OFFSET` when set.
pub fn push_window(qb: &mut QueryBuilder<'_, Postgres>, skip: Option<u64>, limit: Option<u64>) {
    if let Some(limit) = limit {
        qb.push(" LIMIT ");
        qb.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }
    if let Some(skip) = skip {
        qb.push(" OFFSET ");
        qb.push_bind(i64::try_from(skip).unwrap_or(i64::MAX));
    }
}
