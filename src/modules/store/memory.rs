use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::WorksStore;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::{sort_for_display, Category};
use crate::features::works::models::{Work, WorkFilter, WorkStatus, WorkUpdate};

struct Tables {
    categories: Vec<Category>,
    works: HashMap<String, Work>,
}

/// In-process works tables.
///
/// Clones share the same underlying rows.
#[derive(Clone)]
pub struct MemoryWorksStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryWorksStore {
    /// Store preloaded with the built-in category catalogue
    pub fn seeded() -> Self {
        Self::with_categories(Category::builtin())
    }

    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables {
                categories,
                works: HashMap::new(),
            })),
        }
    }

    /// Replace a category's active flag; returns false if the id is unknown
    #[cfg(test)]
    pub async fn set_category_active(&self, category_id: &str, is_active: bool) -> bool {
        let mut tables = self.tables.write().await;
        match tables
            .categories
            .iter_mut()
            .find(|c| c.category_id == category_id)
        {
            Some(category) => {
                category.is_active = is_active;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl WorksStore for MemoryWorksStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_active_category_id(&self, category_name: &str) -> Result<Option<String>> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .iter()
            .find(|c| c.is_active && c.category_name == category_name)
            .map(|c| c.category_id.clone()))
    }

    async fn list_active_categories(&self) -> Result<Vec<Category>> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        sort_for_display(&mut categories);
        Ok(categories)
    }

    async fn list_works(&self, filter: &WorkFilter) -> Result<Vec<Work>> {
        let tables = self.tables.read().await;
        let mut works: Vec<Work> = tables
            .works
            .values()
            .filter(|w| filter.matches(w))
            .cloned()
            .collect();
        works.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| b.created_date.cmp(&a.created_date))
        });
        Ok(works)
    }

    async fn find_work(&self, work_id: &str) -> Result<Option<Work>> {
        let tables = self.tables.read().await;
        Ok(tables.works.get(work_id).cloned())
    }

    async fn find_active_work_by_slug(&self, work_slug: &str) -> Result<Option<Work>> {
        let tables = self.tables.read().await;
        Ok(tables
            .works
            .values()
            .find(|w| w.work_slug == work_slug && w.status == WorkStatus::Active)
            .cloned())
    }

    async fn insert_work(&self, work: &Work) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.works.contains_key(&work.work_id) {
            return Err(AppError::Conflict(
                "A work with this id already exists".to_string(),
            ));
        }
        tables.works.insert(work.work_id.clone(), work.clone());
        Ok(())
    }

    async fn update_work(
        &self,
        work_id: &str,
        update: &WorkUpdate,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let Some(work) = tables.works.get_mut(work_id) else {
            return Ok(0);
        };

        for field in update.fields() {
            work.apply(field.clone());
        }
        work.updated_date = now;
        Ok(1)
    }

    async fn archive_work(&self, work_id: &str, now: DateTime<Utc>) -> Result<u64> {
        let mut tables = self.tables.write().await;
        match tables.works.get_mut(work_id) {
            Some(work) => {
                work.archive(now);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::works::models::{NewWork, WorkField};
    use chrono::Duration;

    fn work(id: &str, category: &str, status: WorkStatus, created: DateTime<Utc>) -> Work {
        let mut new_work = NewWork::new(id, id, category, status, "1.0", "page");
        new_work.created_date = Some(created);
        new_work.into_work(created)
    }

    #[tokio::test]
    async fn test_list_orders_by_category_then_newest_first() {
        let store = MemoryWorksStore::seeded();
        let t0 = Utc::now();
        for w in [
            work("c-old", "climate_analysis", WorkStatus::Active, t0),
            work("a-old", "calls_analysis", WorkStatus::Active, t0),
            work("a-new", "calls_analysis", WorkStatus::Active, t0 + Duration::hours(1)),
        ] {
            store.insert_work(&w).await.unwrap();
        }

        let ids: Vec<String> = store
            .list_works(&WorkFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.work_id)
            .collect();

        assert_eq!(ids, vec!["a-new", "a-old", "c-old"]);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_conflict() {
        let store = MemoryWorksStore::seeded();
        let w = work("dup", "calls_analysis", WorkStatus::Active, Utc::now());

        store.insert_work(&w).await.unwrap();
        let err = store.insert_work(&w).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_id_affects_nothing() {
        let store = MemoryWorksStore::seeded();
        let update = WorkUpdate::new().set(WorkField::Notes("x".into()));

        let affected = store
            .update_work("missing", &update, Utc::now())
            .await
            .unwrap();

        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_inactive_category_is_not_resolved() {
        let store = MemoryWorksStore::seeded();
        assert_eq!(
            store
                .find_active_category_id("Análisis de Llamadas")
                .await
                .unwrap()
                .as_deref(),
            Some("calls_analysis")
        );

        assert!(store.set_category_active("calls_analysis", false).await);

        assert!(store
            .find_active_category_id("Análisis de Llamadas")
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.list_active_categories().await.unwrap().len(), 4);
    }
}
