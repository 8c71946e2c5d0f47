//! Session wire types

use crate::catalogue::policy;
use crate::catalogue::types::{ActiveCategory, CategoryId, Role};
use serde::{Deserialize, Serialize};

/// Who is behind a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Identity {
    Anonymous,
    #[serde(rename_all = "camelCase")]
    Authenticated { role: Role, display_name: String },
}

impl Identity {
    /// The authenticated role, if any
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { role, .. } => Some(*role),
        }
    }

    /// Role used for browsing; anonymous viewers browse as parents
    pub fn effective_role(&self) -> Role {
        self.role().unwrap_or(policy::ANONYMOUS_BROWSING_ROLE)
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { display_name, .. } => Some(display_name),
        }
    }
}

/// Active category plus search term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub active_category: ActiveCategory,
    pub search_term: String,
}

impl ViewState {
    /// Reset both filters
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Snapshot of a session returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub identity: Identity,
    pub effective_role: Role,
    pub can_create: bool,
    pub allowed_categories: Vec<CategoryId>,
    pub view: ViewState,
    pub reply_pending: bool,
    pub created_at: i64,
    pub last_activity: i64,
}

/// Request body for login
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for updating the view
///
/// Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateViewRequest {
    #[serde(default)]
    pub category: Option<ActiveCategory>,
    #[serde(default)]
    pub search_term: Option<String>,
}

impl UpdateViewRequest {
    pub fn apply(self, view: &mut ViewState) {
        if let Some(category) = self.category {
            view.active_category = category;
        }
        if let Some(term) = self.search_term {
            view.search_term = term;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_browses_as_parent() {
        let identity = Identity::Anonymous;
        assert_eq!(identity.role(), None);
        assert_eq!(identity.effective_role(), Role::Parent);
        assert!(identity.display_name().is_none());
    }

    #[test]
    fn test_authenticated_identity() {
        let identity = Identity::Authenticated {
            role: Role::Student,
            display_name: "Estudiante Demo".to_string(),
        };
        assert_eq!(identity.role(), Some(Role::Student));
        assert_eq!(identity.effective_role(), Role::Student);
        assert_eq!(identity.display_name(), Some("Estudiante Demo"));
    }

    #[test]
    fn test_identity_serialization() {
        let json = serde_json::to_string(&Identity::Anonymous).unwrap();
        assert_eq!(json, "{\"state\":\"anonymous\"}");

        let json = serde_json::to_string(&Identity::Authenticated {
            role: Role::Ampa,
            display_name: "Admin AMPA".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"state\":\"authenticated\""));
        assert!(json.contains("\"role\":\"AMPA\""));
        assert!(json.contains("\"displayName\":\"Admin AMPA\""));
    }

    #[test]
    fn test_update_view_partial() {
        let mut view = ViewState {
            active_category: ActiveCategory::Only(CategoryId::Ingles),
            search_term: "present".to_string(),
        };

        let req: UpdateViewRequest = serde_json::from_str(r#"{"searchTerm":"verbs"}"#).unwrap();
        req.apply(&mut view);
        assert_eq!(view.active_category, ActiveCategory::Only(CategoryId::Ingles));
        assert_eq!(view.search_term, "verbs");

        let req: UpdateViewRequest = serde_json::from_str(r#"{"category":"all"}"#).unwrap();
        req.apply(&mut view);
        assert_eq!(view.active_category, ActiveCategory::All);
        assert_eq!(view.search_term, "verbs");
    }

    #[test]
    fn test_update_view_rejects_unknown_category() {
        let result: Result<UpdateViewRequest, _> = serde_json::from_str(r#"{"category":"general"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_clear_view() {
        let mut view = ViewState {
            active_category: ActiveCategory::Only(CategoryId::Social),
            search_term: "mapa".to_string(),
        };
        view.clear();
        assert_eq!(view, ViewState::default());
        assert_eq!(view.active_category, ActiveCategory::All);
        assert!(view.search_term.is_empty());
    }
}
