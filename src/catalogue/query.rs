//! Query engine
//!
//! Combines the visibility policy, the active category and a free-text
//! search into the list shown to a viewer. Pure and allocation-light so it
//! can run on every keystroke.

use crate::catalogue::policy;
use crate::catalogue::types::{ActiveCategory, Resource, Role};

/// Evaluate a query over `catalogue`, keeping catalogue order.
///
/// Predicates run cheapest first: visibility, category, then search.
pub fn query<'a>(
    catalogue: &'a [Resource],
    role: Role,
    category: ActiveCategory,
    search_term: &str,
) -> Vec<&'a Resource> {
    let needle = search_term.to_lowercase();

    catalogue
        .iter()
        .filter(|r| policy::is_visible(r, role))
        .filter(|r| category.admits(r.category_id))
        .filter(|r| needle.is_empty() || matches_search(r, &needle))
        .collect()
}

/// Case-insensitive substring match against title, description or any tag.
///
/// `needle` must already be lowercased.
pub fn matches_search(resource: &Resource, needle: &str) -> bool {
    resource.title.to_lowercase().contains(needle)
        || resource.description.to_lowercase().contains(needle)
        || resource
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}
