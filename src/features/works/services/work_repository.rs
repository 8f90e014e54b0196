use std::sync::Arc;

use chrono::Utc;

use crate::features::categories::CategoryResolver;
use crate::features::works::models::{NewWork, Work, WorkFilter, WorkStatus, WorkUpdate};
use crate::modules::store::WorksStore;

/// Data access for the works index.
///
/// Store errors stop here: reads come back empty or `None`, mutations come
/// back `false`, and the failure is logged. Callers only ever see values.
pub struct WorkRepository {
    store: Arc<dyn WorksStore>,
    resolver: Arc<CategoryResolver>,
}

impl std::fmt::Debug for WorkRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkRepository")
            .field("store", &self.store.backend_name())
            .finish()
    }
}

impl WorkRepository {
    pub fn new(store: Arc<dyn WorksStore>, resolver: Arc<CategoryResolver>) -> Self {
        Self { store, resolver }
    }

    async fn list(&self, filter: WorkFilter) -> Vec<Work> {
        match self.store.list_works(&filter).await {
            Ok(works) => works,
            Err(e) => {
                tracing::error!("Error listing works ({:?}): {}", filter, e);
                Vec::new()
            }
        }
    }

    /// Active works ordered by category, newest first within a category
    pub async fn list_active(&self) -> Vec<Work> {
        self.list(WorkFilter::active()).await
    }

    /// Active works in the category with this display name.
    /// Unknown or inactive names give an empty list.
    pub async fn list_by_category(&self, category_name: &str) -> Vec<Work> {
        let Some(category_id) = self.resolver.resolve(category_name).await else {
            return Vec::new();
        };

        self.list(WorkFilter::active().in_category(category_id)).await
    }

    /// Every work regardless of status, optionally narrowed to one status
    pub async fn list_all(&self, status: Option<WorkStatus>) -> Vec<Work> {
        self.list(WorkFilter {
            status,
            category: None,
        })
        .await
    }

    pub async fn get_by_id(&self, work_id: &str) -> Option<Work> {
        match self.store.find_work(work_id).await {
            Ok(work) => work,
            Err(e) => {
                tracing::error!("Error getting work '{}': {}", work_id, e);
                None
            }
        }
    }

    /// Only active works are reachable by slug
    pub async fn get_by_slug(&self, work_slug: &str) -> Option<Work> {
        match self.store.find_active_work_by_slug(work_slug).await {
            Ok(work) => work,
            Err(e) => {
                tracing::error!("Error getting work by slug '{}': {}", work_slug, e);
                None
            }
        }
    }

    pub async fn create(&self, new_work: NewWork) -> bool {
        let work = new_work.into_work(Utc::now());
        match self.store.insert_work(&work).await {
            Ok(()) => {
                tracing::info!("Created work '{}' in {}", work.work_id, work.category);
                true
            }
            Err(e) => {
                tracing::error!("Error creating work '{}': {}", work.work_id, e);
                false
            }
        }
    }

    /// Write the supplied fields and stamp `updated_date`.
    ///
    /// An unknown id still reports `true`: success means the statement ran,
    /// not that a row changed.
    pub async fn update(&self, work_id: &str, update: WorkUpdate) -> bool {
        if update.is_empty() {
            tracing::debug!("Empty update for '{}', only updated_date is stamped", work_id);
        }

        match self.store.update_work(work_id, &update, Utc::now()).await {
            Ok(affected) => {
                if affected == 0 {
                    tracing::warn!("Update matched no work with id '{}'", work_id);
                }
                true
            }
            Err(e) => {
                tracing::error!("Error updating work '{}': {}", work_id, e);
                false
            }
        }
    }

    /// Soft delete: archive and stamp dates. Repeating it re-stamps them.
    pub async fn delete(&self, work_id: &str) -> bool {
        match self.store.archive_work(work_id, Utc::now()).await {
            Ok(affected) => {
                if affected == 0 {
                    tracing::warn!("Delete matched no work with id '{}'", work_id);
                }
                true
            }
            Err(e) => {
                tracing::error!("Error deleting work '{}': {}", work_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::works::models::WorkField;
    use crate::modules::store::MemoryWorksStore;
    use crate::shared::test_helpers::{sample_work, FailingWorksStore};
    use chrono::Duration;

    fn repository_with(store: Arc<dyn WorksStore>) -> WorkRepository {
        let resolver = Arc::new(CategoryResolver::new(store.clone()));
        WorkRepository::new(store, resolver)
    }

    fn repository() -> (WorkRepository, MemoryWorksStore) {
        let store = MemoryWorksStore::seeded();
        (repository_with(Arc::new(store.clone())), store)
    }

    async fn seed(repo: &WorkRepository, works: Vec<NewWork>) {
        for work in works {
            assert!(repo.create(work).await);
        }
    }

    #[tokio::test]
    async fn test_list_active_excludes_other_statuses() {
        let (repo, _) = repository();
        seed(
            &repo,
            WorkStatus::ALL
                .iter()
                .map(|s| sample_work(s.as_str(), "calls_analysis", *s))
                .collect(),
        )
        .await;

        let works = repo.list_active().await;

        assert_eq!(works.len(), 1);
        assert!(works.iter().all(|w| w.status == WorkStatus::Active));
    }

    #[tokio::test]
    async fn test_list_active_orders_by_category_then_newest() {
        let (repo, _) = repository();
        let t0 = Utc::now() - Duration::days(1);
        let mut older = sample_work("older", "calls_analysis", WorkStatus::Active);
        older.created_date = Some(t0);
        let mut newer = sample_work("newer", "calls_analysis", WorkStatus::Active);
        newer.created_date = Some(t0 + Duration::hours(2));
        let climate = sample_work("climate", "climate_analysis", WorkStatus::Active);
        seed(&repo, vec![climate, older, newer]).await;

        let ids: Vec<_> = repo
            .list_active()
            .await
            .into_iter()
            .map(|w| w.work_id)
            .collect();

        assert_eq!(ids, vec!["newer", "older", "climate"]);
    }

    #[tokio::test]
    async fn test_list_by_category_resolves_display_name() {
        let (repo, _) = repository();
        seed(
            &repo,
            vec![
                sample_work("calls-1", "calls_analysis", WorkStatus::Active),
                sample_work("calls-2", "calls_analysis", WorkStatus::Paused),
                sample_work("climate-1", "climate_analysis", WorkStatus::Active),
            ],
        )
        .await;

        let works = repo.list_by_category("Análisis de Llamadas").await;

        assert_eq!(works.len(), 1);
        assert_eq!(works[0].work_id, "calls-1");
    }

    #[tokio::test]
    async fn test_list_by_category_unknown_or_inactive_is_empty() {
        let (repo, store) = repository();
        seed(
            &repo,
            vec![sample_work("calls-1", "calls_analysis", WorkStatus::Active)],
        )
        .await;

        assert!(repo.list_by_category("No Such Category").await.is_empty());
        // the id is not a display name
        assert!(repo.list_by_category("calls_analysis").await.is_empty());

        store.set_category_active("calls_analysis", false).await;
        assert!(repo.list_by_category("Análisis de Llamadas").await.is_empty());
    }

    #[tokio::test]
    async fn test_list_all_with_and_without_status() {
        let (repo, _) = repository();
        seed(
            &repo,
            vec![
                sample_work("a", "calls_analysis", WorkStatus::Active),
                sample_work("b", "calls_analysis", WorkStatus::Maintenance),
                sample_work("c", "marketing_analysis", WorkStatus::Archived),
            ],
        )
        .await;

        assert_eq!(repo.list_all(None).await.len(), 3);
        let maintenance = repo.list_all(Some(WorkStatus::Maintenance)).await;
        assert_eq!(maintenance.len(), 1);
        assert_eq!(maintenance[0].work_id, "b");
    }

    #[tokio::test]
    async fn test_get_by_id_any_status() {
        let (repo, _) = repository();
        seed(
            &repo,
            vec![sample_work("paused", "calls_analysis", WorkStatus::Paused)],
        )
        .await;

        let work = repo.get_by_id("paused").await.unwrap();
        assert_eq!(work.status, WorkStatus::Paused);
        assert!(repo.get_by_id("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_get_by_slug_only_active() {
        let (repo, _) = repository();
        let mut hidden = sample_work("hidden", "calls_analysis", WorkStatus::Maintenance);
        hidden.work_slug = Some("hidden-slug".to_string());
        let mut shown = sample_work("shown", "calls_analysis", WorkStatus::Active);
        shown.work_slug = Some("shown-slug".to_string());
        seed(&repo, vec![hidden, shown]).await;

        assert!(repo.get_by_slug("hidden-slug").await.is_none());
        assert_eq!(
            repo.get_by_slug("shown-slug").await.map(|w| w.work_id),
            Some("shown".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let (repo, _) = repository();
        let before = Utc::now();
        assert!(
            repo.create(NewWork::new(
                "w1",
                "Work One",
                "calls_analysis",
                WorkStatus::Active,
                "1.0",
                "page.py"
            ))
            .await
        );

        let work = repo.get_by_id("w1").await.unwrap();
        assert_eq!(work.work_slug, "w1");
        assert!(work.is_latest);
        assert_eq!(work.subcategory, "");
        assert_eq!(work.description, "");
        assert_eq!(work.notes, "");
        assert_eq!(work.config_json, serde_json::json!({}));
        assert!(work.tags.is_empty());
        assert!(work.work_url.is_none());
        assert!(work.created_date >= before);
    }

    #[tokio::test]
    async fn test_create_duplicate_id_is_false() {
        let (repo, _) = repository();
        let work = sample_work("dup", "calls_analysis", WorkStatus::Active);

        assert!(repo.create(work.clone()).await);
        assert!(!repo.create(work).await);
    }

    #[tokio::test]
    async fn test_update_writes_only_supplied_fields() {
        let (repo, _) = repository();
        seed(
            &repo,
            vec![sample_work("w1", "calls_analysis", WorkStatus::Active)],
        )
        .await;
        let before = repo.get_by_id("w1").await.unwrap();

        let update = WorkUpdate::new()
            .set(WorkField::Version("2.0".to_string()))
            .set(WorkField::Status(WorkStatus::Maintenance));
        assert!(repo.update("w1", update).await);

        let after = repo.get_by_id("w1").await.unwrap();
        assert_eq!(after.version, "2.0");
        assert_eq!(after.status, WorkStatus::Maintenance);
        assert_eq!(after.work_name, before.work_name);
        assert_eq!(after.short_description, before.short_description);
        assert_eq!(after.created_date, before.created_date);
        assert!(after.updated_date >= before.updated_date);
    }

    #[tokio::test]
    async fn test_empty_update_only_touches_updated_date() {
        let (repo, _) = repository();
        seed(
            &repo,
            vec![sample_work("w1", "calls_analysis", WorkStatus::Active)],
        )
        .await;
        let before = repo.get_by_id("w1").await.unwrap();

        assert!(repo.update("w1", WorkUpdate::new()).await);

        let after = repo.get_by_id("w1").await.unwrap();
        assert!(after.updated_date >= before.updated_date);
        let restamped = Work {
            updated_date: before.updated_date,
            ..after
        };
        assert_eq!(restamped, before);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id_report_success() {
        let (repo, _) = repository();

        assert!(
            repo.update("missing", WorkUpdate::new().set(WorkField::Notes("x".into())))
                .await
        );
        assert!(repo.delete("missing").await);
        assert!(repo.get_by_id("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_twice_restamps_archived_date() {
        let (repo, _) = repository();
        seed(
            &repo,
            vec![sample_work("w1", "calls_analysis", WorkStatus::Active)],
        )
        .await;

        assert!(repo.delete("w1").await);
        let first = repo.get_by_id("w1").await.unwrap();
        assert!(repo.delete("w1").await);
        let second = repo.get_by_id("w1").await.unwrap();

        assert_eq!(second.status, WorkStatus::Archived);
        assert!(second.archived_date.unwrap() >= first.archived_date.unwrap());
        assert_eq!(second.updated_date, second.archived_date.unwrap());
    }

    #[tokio::test]
    async fn test_create_get_delete_scenario() {
        let (repo, _) = repository();
        let mut w1 = NewWork::new(
            "w1",
            "Work One",
            "calls_analysis",
            WorkStatus::Active,
            "1.0",
            "categories/calls_analysis/total_analysis.py",
        );
        w1.short_description = Some("Calls overview".to_string());
        assert!(repo.create(w1).await);

        assert_eq!(
            repo.get_by_id("w1").await.map(|w| w.status),
            Some(WorkStatus::Active)
        );

        assert!(repo.delete("w1").await);

        let archived = repo.get_by_id("w1").await.unwrap();
        assert_eq!(archived.status, WorkStatus::Archived);
        assert!(archived.archived_date.is_some());
        assert!(repo.list_active().await.iter().all(|w| w.work_id != "w1"));
    }

    #[tokio::test]
    async fn test_store_failures_become_empty_results() {
        let repo = repository_with(Arc::new(FailingWorksStore));

        assert!(repo.list_active().await.is_empty());
        assert!(repo.list_by_category("Análisis de Llamadas").await.is_empty());
        assert!(repo.list_all(None).await.is_empty());
        assert!(repo.get_by_id("w1").await.is_none());
        assert!(repo.get_by_slug("w1").await.is_none());
        assert!(
            !repo
                .create(sample_work("w1", "calls_analysis", WorkStatus::Active))
                .await
        );
        assert!(!repo.update("w1", WorkUpdate::new()).await);
        assert!(!repo.delete("w1").await);
    }
}
