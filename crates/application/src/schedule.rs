//! Deterministic run ordering

use volley_domain::TestSpec;

/// Sorts descriptors by priority descending, then path ascending. The sort
/// is stable, so descriptors with equal priority and path keep their
/// declaration order.
pub fn schedule(specs: &mut [TestSpec]) {
    specs.sort_by(|a, b| {
        b.priority
            .total_cmp(&a.priority)
            .then_with(|| a.path.cmp(&b.path))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec(path: &str, priority: f64, note: &str) -> TestSpec {
        TestSpec {
            path: path.to_string(),
            priority,
            note: Some(note.to_string()),
            ..TestSpec::default()
        }
    }

    fn order(specs: &[TestSpec]) -> Vec<&str> {
        specs
            .iter()
            .map(|spec| spec.note.as_deref().unwrap_or(""))
            .collect()
    }

    #[test]
    fn test_higher_priority_runs_first() {
        let mut specs = vec![
            spec("/b", 1.0, "default"),
            spec("/a", 5.0, "high"),
            spec("/c", 0.5, "low"),
        ];
        schedule(&mut specs);
        assert_eq!(order(&specs), ["high", "default", "low"]);
    }

    #[test]
    fn test_equal_priority_orders_by_path() {
        let mut specs = vec![
            spec("/z", 1.0, "z"),
            spec("/a", 1.0, "a"),
            spec("/m", 1.0, "m"),
        ];
        schedule(&mut specs);
        assert_eq!(order(&specs), ["a", "m", "z"]);
    }

    #[test]
    fn test_ties_keep_declaration_order() {
        let mut specs = vec![
            spec("/same", 1.0, "first"),
            spec("/same", 1.0, "second"),
            spec("/same", 1.0, "third"),
        ];
        schedule(&mut specs);
        assert_eq!(order(&specs), ["first", "second", "third"]);
    }

    #[test]
    fn test_query_string_participates_in_path_order() {
        let mut specs = vec![
            spec("/users?id=2", 1.0, "two"),
            spec("/users?id=1", 1.0, "one"),
        ];
        schedule(&mut specs);
        assert_eq!(order(&specs), ["one", "two"]);
    }
}
