//! Catalogue wire types
//!
//! Roles, categories and resources as exchanged with clients. All types use
//! camelCase JSON; enum values keep the portal's historical spellings
//! (`TEACHER`, `PDF`, `castellano`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Viewer role
///
/// Ordered by privilege for display purposes only; visibility is gated by
/// the single teacher tier in [`crate::catalogue::policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Student,
    Parent,
    Ampa,
    Teacher,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::Parent, Role::Ampa, Role::Teacher];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "STUDENT"),
            Self::Parent => write!(f, "PARENT"),
            Self::Ampa => write!(f, "AMPA"),
            Self::Teacher => write!(f, "TEACHER"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STUDENT" => Ok(Self::Student),
            "PARENT" => Ok(Self::Parent),
            "AMPA" => Ok(Self::Ampa),
            "TEACHER" => Ok(Self::Teacher),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Category identifier (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    Castellano,
    Catalan,
    Ingles,
    Social,
    Cultural,
    Extraescolar,
    /// Teachers' lounge, internal only
    Profesores,
}

impl CategoryId {
    pub const ALL: [CategoryId; 7] = [
        CategoryId::Castellano,
        CategoryId::Catalan,
        CategoryId::Ingles,
        CategoryId::Social,
        CategoryId::Cultural,
        CategoryId::Extraescolar,
        CategoryId::Profesores,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Castellano => "castellano",
            Self::Catalan => "catalan",
            Self::Ingles => "ingles",
            Self::Social => "social",
            Self::Cultural => "cultural",
            Self::Extraescolar => "extraescolar",
            Self::Profesores => "profesores",
        }
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// Active category filter: either every category or exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActiveCategory {
    #[default]
    All,
    Only(CategoryId),
}

impl ActiveCategory {
    pub fn admits(&self, category: CategoryId) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => *id == category,
        }
    }
}

impl std::fmt::Display for ActiveCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(id) => write!(f, "{}", id),
        }
    }
}

impl std::str::FromStr for ActiveCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl TryFrom<String> for ActiveCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActiveCategory> for String {
    fn from(value: ActiveCategory) -> Self {
        value.to_string()
    }
}

/// Resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceKind {
    #[default]
    Document,
    Pdf,
    Link,
    Video,
    Event,
}

/// Topical grouping of resources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub label: String,
    pub description: String,
    pub icon_name: String,
    pub color: String,
}

/// A catalogued item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub url: Option<String>,
    pub tags: Vec<String>,
    pub date_added: NaiveDate,
    /// Visibility floor
    pub min_role: Role,
    #[serde(default)]
    pub is_featured: bool,
    pub author: Option<String>,
}

/// Request body for creating a resource
///
/// Fields are permissive on the wire; the creation workflow decides what is
/// missing or disallowed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default, rename = "type")]
    pub kind: ResourceKind,
    #[serde(default)]
    pub url: Option<String>,
    /// Comma-separated tag list as typed in the form
    #[serde(default)]
    pub tags: String,
}

/// Heading shown above a listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingHeading {
    pub label: String,
    pub description: String,
}

/// Query Engine result envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListing {
    pub heading: ListingHeading,
    pub active_category: ActiveCategory,
    pub search_term: String,
    pub total: usize,
    pub data: Vec<Resource>,
}
