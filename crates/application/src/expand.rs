//! Derive expansion: one declared item into several variants

use volley_domain::TestItem;

/// Expands every `derive` list. Each fragment is default-filled from its
/// parent once, and the fragments replace the parent at its position, so
/// file order is preserved around them.
///
/// A fragment carrying its own `derive` list keeps it; normalization flags
/// that as a validation issue on the fragment.
#[must_use]
pub fn expand(items: Vec<TestItem>) -> Vec<TestItem> {
    let mut expanded = Vec::with_capacity(items.len());
    for mut item in items {
        let Some(fragments) = item.derive.take() else {
            expanded.push(item);
            continue;
        };
        let parent = item;
        for fragment in fragments {
            expanded.push(fragment.defaulted_from(&parent));
        }
    }
    expanded
}
