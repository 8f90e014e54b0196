use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::features::categories::models::Category;
use crate::modules::store::WorksStore;
use crate::shared::constants::DEFAULT_CATEGORY_ICON;

/// Where a category listing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CategorySource {
    /// Read from the store on this call
    Live,
    /// Store unreachable; served from the last good snapshot
    Degraded,
}

#[derive(Debug, Clone)]
pub struct CategoryListing {
    pub categories: Vec<Category>,
    pub source: CategorySource,
}

/// Id -> (name, icon) lookup used to decorate work listings
#[derive(Debug, Clone, Default)]
pub struct CategoryLookup {
    by_id: HashMap<String, (String, String)>,
}

impl CategoryLookup {
    fn from_categories(categories: &[Category]) -> Self {
        let by_id = categories
            .iter()
            .map(|c| {
                let icon = if c.category_icon.trim().is_empty() {
                    DEFAULT_CATEGORY_ICON.to_string()
                } else {
                    c.category_icon.clone()
                };
                (c.category_id.clone(), (c.category_name.clone(), icon))
            })
            .collect();
        Self { by_id }
    }

    pub fn contains(&self, category_id: &str) -> bool {
        self.by_id.contains_key(category_id)
    }

    /// Display name and icon for a category id.
    /// Unknown ids display as themselves with the default icon.
    pub fn display<'a>(&'a self, category_id: &'a str) -> (&'a str, &'a str) {
        match self.by_id.get(category_id) {
            Some((name, icon)) => (name.as_str(), icon.as_str()),
            None => (category_id, DEFAULT_CATEGORY_ICON),
        }
    }
}

/// Category catalogue backed by the store, with an in-memory snapshot.
///
/// The snapshot starts as the built-in catalogue and is replaced on every
/// successful read. When the store fails, callers get the snapshot and a
/// `Degraded` marker instead of an error.
pub struct CategoryService {
    store: Arc<dyn WorksStore>,
    snapshot: RwLock<Vec<Category>>,
}

impl std::fmt::Debug for CategoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryService")
            .field("store", &self.store.backend_name())
            .finish()
    }
}

impl CategoryService {
    pub fn new(store: Arc<dyn WorksStore>) -> Self {
        Self {
            store,
            snapshot: RwLock::new(Category::builtin()),
        }
    }

    /// Active categories in display order
    pub async fn list(&self) -> CategoryListing {
        match self.store.list_active_categories().await {
            Ok(categories) => {
                *self.snapshot.write().await = categories.clone();
                CategoryListing {
                    categories,
                    source: CategorySource::Live,
                }
            }
            Err(e) => {
                tracing::warn!("Serving cached categories, store unavailable: {}", e);
                CategoryListing {
                    categories: self.snapshot.read().await.clone(),
                    source: CategorySource::Degraded,
                }
            }
        }
    }

    /// Reload the snapshot; returns whether the store answered
    pub async fn refresh(&self) -> bool {
        let listing = self.list().await;
        if listing.source == CategorySource::Live {
            tracing::info!("Loaded {} categories", listing.categories.len());
            true
        } else {
            false
        }
    }

    /// Display names of the active categories
    pub async fn names(&self) -> (Vec<String>, CategorySource) {
        let listing = self.list().await;
        let names = listing
            .categories
            .into_iter()
            .map(|c| c.category_name)
            .collect();
        (names, listing.source)
    }

    /// Lookup built from the current snapshot, without touching the store
    pub async fn lookup(&self) -> CategoryLookup {
        CategoryLookup::from_categories(&self.snapshot.read().await)
    }
}
