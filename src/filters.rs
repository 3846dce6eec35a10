//! Post-retrieval filters and sort (§4.13), evaluated over a result's
//! attached record fields.

use std::cmp::Ordering;

use crate::result::SearchResult;

/// One field-level predicate. Predicates short-circuit in declared order:
/// the first predicate a result fails excludes it.
#[derive(Debug, Clone)]
pub enum FieldFilter {
    /// Numeric range `[min, max]`, inclusive. The field is parsed as `f64`;
    /// results whose field is absent or non-numeric fail the filter.
    Range { field: String, min: f64, max: f64 },
    /// Field value must be one of `allowed`.
    TermSet { field: String, allowed: Vec<String> },
    /// Field must (or must not) equal `value`, depending on `equals`.
    Boolean { field: String, value: String, equals: bool },
}

impl FieldFilter {
    fn matches(&self, result: &SearchResult) -> bool {
        match self {
            FieldFilter::Range { field, min, max } => result
                .fields
                .get(field)
                .and_then(|v| v.parse::<f64>().ok())
                .map(|v| v >= *min && v <= *max)
                .unwrap_or(false),
            FieldFilter::TermSet { field, allowed } => {
                result.fields.get(field).map(|v| allowed.iter().any(|a| a == v)).unwrap_or(false)
            }
            FieldFilter::Boolean { field, value, equals } => {
                let actual = result.fields.get(field).map(|v| v == value).unwrap_or(false);
                actual == *equals
            }
        }
    }
}

/// Applies every filter in declared order, short-circuiting a result on
/// its first failure.
pub fn apply_filters(results: Vec<SearchResult>, filters: &[FieldFilter]) -> Vec<SearchResult> {
    if filters.is_empty() {
        return results;
    }
    results.into_iter().filter(|result| filters.iter().all(|f| f.matches(result))).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Sorts by the given keys if any are provided, else falls back to score
/// descending (§4.10 step 10 default).
pub fn sort_results(mut results: Vec<SearchResult>, keys: &[SortKey]) -> Vec<SearchResult> {
    if keys.is_empty() {
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    } else {
        results.sort_by(|a, b| compare_by_keys(a, b, keys));
    }
    results
}

fn compare_by_keys(a: &SearchResult, b: &SearchResult, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let av = a.fields.get(&key.field);
        let bv = b.fields.get(&key.field);
        let ord = match (av, bv) {
            (Some(av), Some(bv)) => compare_values(av, bv),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ord = if key.direction == SortDirection::Descending { ord.reverse() } else { ord };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(av), Ok(bv)) => av.partial_cmp(&bv).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}
