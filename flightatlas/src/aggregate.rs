//! Route aggregation per operator.
//!
//! Pure functions over an origin's loaded route set: dedup on the
//! composite `(operator, origin, destination)` key, count surviving
//! routes per operator, join display names, sort. Stateless; callers
//! recompute whenever the route set or the operator directory changes.

use std::collections::{HashMap, HashSet};

use crate::model::Route;

/// Per-operator route count for a selection control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorRoutes {
    /// Operator code
    pub code: String,
    /// Display name, or the raw code when the directory has no entry
    pub name: String,
    /// Number of distinct routes this operator flies in the current set
    pub count: usize,
}

/// Counts distinct routes per operator.
///
/// Raw route sets may legitimately repeat the same `(operator, origin,
/// destination)` triple; duplicates collapse to one before counting, so
/// the counts sum to the number of distinct triples. The result is sorted
/// descending by count, with the operator code as tiebreak for
/// deterministic output.
pub fn aggregate_by_operator(
    routes: &[Route],
    directory: &HashMap<String, String>,
) -> Vec<OperatorRoutes> {
    let mut seen = HashSet::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for route in routes {
        if seen.insert((
            route.airline.as_str(),
            route.src.as_str(),
            route.dst.as_str(),
        )) {
            *counts.entry(route.airline.as_str()).or_insert(0) += 1;
        }
    }

    let mut operators: Vec<OperatorRoutes> = counts
        .into_iter()
        .map(|(code, count)| OperatorRoutes {
            code: code.to_string(),
            name: directory
                .get(code)
                .cloned()
                .unwrap_or_else(|| code.to_string()),
            count,
        })
        .collect();

    operators.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.code.cmp(&b.code)));
    operators
}

/// Pure operator filter over an already-loaded route set.
///
/// Never issues a network request.
pub fn filter_by_operator(routes: &[Route], operator: &str) -> Vec<Route> {
    routes
        .iter()
        .filter(|r| r.airline == operator)
        .cloned()
        .collect()
}
