//! In-memory catalogue store
//!
//! Holds the fixed category set and the resource list for the lifetime of
//! the process. Resources are only ever prepended; nothing is persisted.

use crate::catalogue::create::{self, Authorship, ValidationError};
use crate::catalogue::query;
use crate::catalogue::seed;
use crate::catalogue::types::*;
use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Authoritative catalogue with controlled write access
pub struct CatalogueStore {
    categories: Vec<Category>,
    resources: Arc<RwLock<Vec<Resource>>>,
}

impl CatalogueStore {
    /// Create a store, checking that every resource points at a known category
    pub fn new(categories: Vec<Category>, resources: Vec<Resource>) -> Result<Self> {
        if let Some(orphan) = resources
            .iter()
            .find(|r| !categories.iter().any(|c| c.id == r.category_id))
        {
            return Err(Error::Config(format!(
                "Resource '{}' references missing category '{}'",
                orphan.id, orphan.category_id
            )));
        }

        Ok(Self {
            categories,
            resources: Arc::new(RwLock::new(resources)),
        })
    }

    /// Store preloaded with the builtin categories and resources
    pub fn with_seed() -> Result<Self> {
        Self::new(seed::builtin_categories(), seed::builtin_resources())
    }

    /// All categories, including internal ones
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Copy of the full resource list, unfiltered
    pub async fn snapshot(&self) -> Vec<Resource> {
        self.resources.read().await.clone()
    }

    /// Number of resources, restricted ones included
    pub async fn resource_count(&self) -> usize {
        self.resources.read().await.len()
    }

    /// Get a resource by ID if `role` may see it
    pub async fn get_visible(&self, id: &str, role: Role) -> Option<Resource> {
        self.resources
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .filter(|r| crate::catalogue::policy::is_visible(r, role))
            .cloned()
    }

    /// Run the query engine against the current catalogue
    pub async fn query(
        &self,
        role: Role,
        category: ActiveCategory,
        search_term: &str,
    ) -> Vec<Resource> {
        let resources = self.resources.read().await;
        let results: Vec<Resource> = query::query(&resources, role, category, search_term)
            .into_iter()
            .cloned()
            .collect();

        tracing::debug!(
            role = %role,
            category = %category,
            term = search_term,
            matched = results.len(),
            "Catalogue query evaluated"
        );

        results
    }

    /// Heading for a listing under `category`
    pub fn heading(&self, category: ActiveCategory) -> ListingHeading {
        match category {
            ActiveCategory::Only(id) => match self.category(id) {
                Some(c) => ListingHeading {
                    label: c.label.clone(),
                    description: c.description.clone(),
                },
                None => ListingHeading {
                    label: id.to_string(),
                    description: String::new(),
                },
            },
            ActiveCategory::All => ListingHeading {
                label: "Vista General".to_string(),
                description: "Explora todos los recursos y actividades del colegio.".to_string(),
            },
        }
    }

    /// Validate and prepend a new resource (id and date are server-generated)
    pub async fn create(
        &self,
        req: CreateResourceRequest,
        role: Option<Role>,
        author: &str,
    ) -> std::result::Result<Resource, ValidationError> {
        let authorship = Authorship {
            id: format!("res-{}", uuid::Uuid::new_v4()),
            author: author.to_string(),
            created: chrono::Local::now().date_naive(),
        };

        let resource = create::build_resource(req, role, authorship)?;
        if self.category(resource.category_id).is_none() {
            return Err(ValidationError::UnknownCategory(
                resource.category_id.to_string(),
            ));
        }

        self.resources.write().await.insert(0, resource.clone());

        tracing::info!(
            id = %resource.id,
            category = %resource.category_id,
            author = author,
            "Resource created"
        );

        Ok(resource)
    }
}
