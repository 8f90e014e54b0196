use std::sync::Arc;

use crate::modules::store::WorksStore;

/// Maps a category display name to its id through the categories lookup table
pub struct CategoryResolver {
    store: Arc<dyn WorksStore>,
}

impl CategoryResolver {
    pub fn new(store: Arc<dyn WorksStore>) -> Self {
        Self { store }
    }

    /// Exact, case-sensitive match restricted to active categories.
    ///
    /// `None` means "no such category". Store failures are logged and also
    /// come back as `None`. When several rows share the name the store's
    /// first row wins; there is no defined tie-break.
    pub async fn resolve(&self, category_name: &str) -> Option<String> {
        match self.store.find_active_category_id(category_name).await {
            Ok(Some(category_id)) => {
                tracing::debug!("Resolved category '{}' -> {}", category_name, category_id);
                Some(category_id)
            }
            Ok(None) => {
                tracing::debug!("No active category named '{}'", category_name);
                None
            }
            Err(e) => {
                tracing::error!("Error resolving category '{}': {}", category_name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::Category;
    use crate::modules::store::MemoryWorksStore;
    use crate::shared::test_helpers::FailingWorksStore;

    #[tokio::test]
    async fn test_resolve_exact_name() {
        let resolver = CategoryResolver::new(Arc::new(MemoryWorksStore::seeded()));

        assert_eq!(
            resolver.resolve("Análisis Climáticos").await.as_deref(),
            Some("climate_analysis")
        );
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive() {
        let resolver = CategoryResolver::new(Arc::new(MemoryWorksStore::seeded()));

        assert!(resolver.resolve("análisis climáticos").await.is_none());
        assert!(resolver.resolve("climate_analysis").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_skips_inactive() {
        let mut retired = Category::new("legacy_analysis", "Legacy", "🗄️", 9);
        retired.is_active = false;
        let store = MemoryWorksStore::with_categories(vec![retired]);
        let resolver = CategoryResolver::new(Arc::new(store));

        assert!(resolver.resolve("Legacy").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_store_failure_is_none() {
        let resolver = CategoryResolver::new(Arc::new(FailingWorksStore));

        assert!(resolver.resolve("Análisis de Llamadas").await.is_none());
    }
}
