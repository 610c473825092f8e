use serde_json::Value;
use std::cmp::Ordering;

/// Comparison operator for a field filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// A single field condition. A missing field compares as null.
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A filtered range query over one collection.
///
/// Filters are conjunctive. Results come back in id order unless an
/// explicit `order_by` is set, so queries are deterministic either way.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<Filter>,
    order_by: Option<(String, SortOrder)>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field condition.
    pub fn filter(mut self, field: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    /// Order results by a field.
    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.order_by = Some((field.to_string(), order));
        self
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn matches(&self, body: &Value) -> bool {
        self.filters.iter().all(|filter| {
            let field_value = body.get(&filter.field).unwrap_or(&Value::Null);
            let ordering = compare_values(field_value, &filter.value);
            match filter.op {
                FilterOp::Eq => ordering == Ordering::Equal,
                FilterOp::Lt => ordering == Ordering::Less,
                FilterOp::Lte => ordering != Ordering::Greater,
                FilterOp::Gt => ordering == Ordering::Greater,
                FilterOp::Gte => ordering != Ordering::Less,
            }
        })
    }

    pub(crate) fn ordering(&self) -> Option<&(String, SortOrder)> {
        self.order_by.as_ref()
    }

    pub(crate) fn result_limit(&self) -> Option<usize> {
        self.limit
    }
}

/// Total order over JSON values.
///
/// Null sorts last; numbers compare as f64 with
/// NaN greatest; mixed scalar types order by type rank; arrays and objects
/// fall back to their serialized text.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,

        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            match (x.is_nan(), y.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            }
        }

        (Value::String(x), Value::String(y)) => x.cmp(y),

        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),

        _ => {
            let rank_a = type_rank(a);
            let rank_b = type_rank(b);
            if rank_a != rank_b {
                rank_a.cmp(&rank_b)
            } else {
                a.to_string().cmp(&b.to_string())
            }
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 5,
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_range() {
        let query = Query::new()
            .filter("qty", FilterOp::Gte, 10)
            .filter("qty", FilterOp::Lt, 20);

        assert!(query.matches(&json!({"qty": 10})));
        assert!(query.matches(&json!({"qty": 19})));
        assert!(!query.matches(&json!({"qty": 9})));
        assert!(!query.matches(&json!({"qty": 20})));
    }

    #[test]
    fn test_missing_field_is_null_last() {
        // A document without the field never satisfies a < filter.
        let query = Query::new().filter("created_at", FilterOp::Lt, 1_000_000);
        assert!(!query.matches(&json!({"other": 1})));
    }

    #[test]
    fn test_eq_on_strings_and_bools() {
        let by_category = Query::new().filter("category", FilterOp::Eq, "general");
        assert!(by_category.matches(&json!({"category": "general"})));
        assert!(!by_category.matches(&json!({"category": "outlet"})));

        let active_only = Query::new().filter("active", FilterOp::Eq, true);
        assert!(active_only.matches(&json!({"active": true})));
        assert!(!active_only.matches(&json!({"active": false})));
    }

    #[test]
    fn test_compare_int_and_float() {
        assert_eq!(
            compare_values(&json!(2), &json!(2.0)),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(&json!(1), &json!(1.5)),
            Ordering::Less
        );
    }
}
