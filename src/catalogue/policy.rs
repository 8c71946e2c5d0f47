//! Visibility policy and per-role allow-lists
//!
//! The single place that answers "may this viewer see it" and "may this
//! viewer publish there". Handlers, the query engine and the creation
//! workflow all consult these functions instead of branching on roles.

use crate::catalogue::types::{Category, CategoryId, Resource, Role};

/// Role used for filtering when nobody is logged in
pub const ANONYMOUS_BROWSING_ROLE: Role = Role::Parent;

/// Categories AMPA members may publish into
const AMPA_CATEGORIES: [CategoryId; 3] = [
    CategoryId::Extraescolar,
    CategoryId::Cultural,
    CategoryId::Social,
];

/// A resource is hidden only when it carries the teacher floor and the
/// viewer is not a teacher.
pub fn is_visible(resource: &Resource, role: Role) -> bool {
    !(resource.min_role == Role::Teacher && role != Role::Teacher)
}

/// The teachers' lounge is listed for teachers only.
pub fn is_category_listed(category: CategoryId, role: Role) -> bool {
    category != CategoryId::Profesores || role == Role::Teacher
}

/// Filter a category list down to what `role` may browse.
pub fn listed_categories(categories: &[Category], role: Role) -> Vec<Category> {
    categories
        .iter()
        .filter(|c| is_category_listed(c.id, role))
        .cloned()
        .collect()
}

/// Categories the creator may publish into. `None` is the anonymous viewer.
pub fn allowed_categories(role: Option<Role>) -> &'static [CategoryId] {
    match role {
        Some(Role::Teacher) => &CategoryId::ALL,
        Some(Role::Ampa) => &AMPA_CATEGORIES,
        Some(Role::Student) | Some(Role::Parent) | None => &[],
    }
}

pub fn can_create(role: Option<Role>) -> bool {
    !allowed_categories(role).is_empty()
}

/// Visibility floor stamped on content published by `creator`.
///
/// Teacher content is school-wide, AMPA content targets guardians.
pub fn default_min_role(creator: Role) -> Role {
    match creator {
        Role::Teacher => Role::Student,
        Role::Ampa | Role::Parent | Role::Student => Role::Parent,
    }
}
