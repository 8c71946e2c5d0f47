//! Resource creation workflow
//!
//! Validates a creation form against the creator's role and turns it into a
//! [`Resource`]. Nothing here touches the store; a rejected form leaves the
//! catalogue exactly as it was.

use crate::catalogue::policy;
use crate::catalogue::types::{CategoryId, CreateResourceRequest, Resource, Role};
use chrono::NaiveDate;
use thiserror::Error;

/// Why a creation form was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("this role cannot publish resources")]
    NotPermitted,

    #[error("title is required")]
    MissingTitle,

    #[error("description is required")]
    MissingDescription,

    #[error("category is required")]
    MissingCategory,

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("category '{category}' is not available to {role}")]
    CategoryNotAllowed { category: CategoryId, role: Role },
}

impl ValidationError {
    /// Role-level refusals, as opposed to form mistakes
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::NotPermitted | Self::CategoryNotAllowed { .. })
    }
}

/// Identity and clock values stamped onto a new resource
#[derive(Debug, Clone)]
pub struct Authorship {
    pub id: String,
    pub author: String,
    pub created: NaiveDate,
}

/// Validate `req` for `role` (`None` = anonymous) and build the resource.
pub fn build_resource(
    req: CreateResourceRequest,
    role: Option<Role>,
    authorship: Authorship,
) -> Result<Resource, ValidationError> {
    let creator = match role {
        Some(role) if policy::can_create(Some(role)) => role,
        _ => return Err(ValidationError::NotPermitted),
    };

    if req.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if req.description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }

    let raw_category = req.category_id.trim();
    if raw_category.is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    let category: CategoryId = raw_category
        .parse()
        .map_err(|_| ValidationError::UnknownCategory(raw_category.to_string()))?;
    if !policy::allowed_categories(Some(creator)).contains(&category) {
        return Err(ValidationError::CategoryNotAllowed {
            category,
            role: creator,
        });
    }

    let url = req.url.filter(|u| !u.trim().is_empty());

    Ok(Resource {
        id: authorship.id,
        title: req.title,
        description: req.description,
        category_id: category,
        kind: req.kind,
        url,
        tags: split_tags(&req.tags),
        date_added: authorship.created,
        min_role: policy::default_min_role(creator),
        is_featured: false,
        author: Some(authorship.author),
    })
}

/// Split a comma-separated tag field, trimming and dropping blanks.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
