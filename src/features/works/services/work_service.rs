use std::sync::Arc;

use chrono::Utc;

use crate::core::error::{AppError, Result};
use crate::features::categories::CategoryService;
use crate::features::works::dtos::{
    CreateWorkDto, UpdateWorkDto, WorkResponseDto, WorkSummaryDto, WorkViewDto,
};
use crate::features::works::models::{generate_work_id, NewWork, Work, WorkStatus};
use crate::features::works::registry;
use crate::features::works::services::WorkRepository;

/// HTTP-facing operations over the works repository.
///
/// Turns repository values into DTOs decorated with category display data,
/// and into `AppError` where the facade needs a status code.
pub struct WorkService {
    repository: Arc<WorkRepository>,
    categories: Arc<CategoryService>,
}

impl std::fmt::Debug for WorkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkService")
            .field("repository", &self.repository)
            .finish()
    }
}

impl WorkService {
    pub fn new(repository: Arc<WorkRepository>, categories: Arc<CategoryService>) -> Self {
        Self {
            repository,
            categories,
        }
    }

    async fn summaries(&self, works: Vec<Work>) -> Vec<WorkSummaryDto> {
        let lookup = self.categories.lookup().await;
        works
            .into_iter()
            .map(|w| WorkSummaryDto::from_work(w, &lookup))
            .collect()
    }

    async fn response(&self, work: Work) -> WorkResponseDto {
        let lookup = self.categories.lookup().await;
        WorkResponseDto::from_work(work, &lookup)
    }

    async fn find(&self, work_id: &str) -> Result<Work> {
        self.repository
            .get_by_id(work_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Work '{}' not found", work_id)))
    }

    pub async fn list_active(&self) -> Vec<WorkSummaryDto> {
        let works = self.repository.list_active().await;
        self.summaries(works).await
    }

    /// Active works in the category with this exact display name
    pub async fn list_by_category(&self, category_name: &str) -> Vec<WorkSummaryDto> {
        let works = self.repository.list_by_category(category_name).await;
        self.summaries(works).await
    }

    pub async fn list_all(&self, status: Option<WorkStatus>) -> Vec<WorkSummaryDto> {
        let works = self.repository.list_all(status).await;
        self.summaries(works).await
    }

    pub async fn get_by_id(&self, work_id: &str) -> Result<WorkResponseDto> {
        let work = self.find(work_id).await?;
        Ok(self.response(work).await)
    }

    pub async fn get_by_slug(&self, work_slug: &str) -> Result<WorkResponseDto> {
        let work = self
            .repository
            .get_by_slug(work_slug)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Work '{}' not found", work_slug)))?;
        Ok(self.response(work).await)
    }

    pub async fn view(&self, work_id: &str) -> Result<WorkViewDto> {
        let work = self.find(work_id).await?;
        Ok(WorkViewDto {
            target: registry::resolve(&work),
            work_id: work.work_id,
            work_name: work.work_name,
        })
    }

    async fn ensure_known_category(&self, category_id: &str) -> Result<()> {
        if self.categories.lookup().await.contains(category_id) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Unknown category '{}'",
                category_id
            )))
        }
    }

    pub async fn create(&self, dto: CreateWorkDto) -> Result<WorkResponseDto> {
        self.ensure_known_category(&dto.category).await?;

        let now = Utc::now();
        let work_id = generate_work_id(&dto.work_name, now);
        self.insert(dto.into_new_work(work_id, now)).await
    }

    async fn insert(&self, work: NewWork) -> Result<WorkResponseDto> {
        let work_id = work.work_id.clone();
        if !self.repository.create(work).await {
            // a concurrent create of the same name may have won the id
            if self.repository.get_by_id(&work_id).await.is_some() {
                return Err(AppError::Conflict(format!(
                    "Work '{}' already exists",
                    work_id
                )));
            }
            return Err(AppError::Internal("Failed to create work".to_string()));
        }

        self.get_by_id(&work_id).await
    }

    pub async fn update(&self, work_id: &str, dto: UpdateWorkDto) -> Result<WorkResponseDto> {
        self.find(work_id).await?;
        if let Some(category_id) = dto.category.as_deref() {
            self.ensure_known_category(category_id).await?;
        }

        if !self.repository.update(work_id, dto.into_update()).await {
            return Err(AppError::Internal("Failed to update work".to_string()));
        }

        self.get_by_id(work_id).await
    }

    /// Soft delete; returns the archived record
    pub async fn delete(&self, work_id: &str) -> Result<WorkResponseDto> {
        self.find(work_id).await?;

        if !self.repository.delete(work_id).await {
            return Err(AppError::Internal("Failed to delete work".to_string()));
        }

        self.get_by_id(work_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::CategoryResolver;
    use crate::features::works::registry::ViewTarget;
    use crate::modules::store::{MemoryWorksStore, WorksStore};
    use crate::shared::test_helpers::sample_work;

    async fn service() -> (WorkService, Arc<WorkRepository>) {
        let store: Arc<dyn WorksStore> = Arc::new(MemoryWorksStore::seeded());
        let resolver = Arc::new(CategoryResolver::new(store.clone()));
        let repository = Arc::new(WorkRepository::new(store.clone(), resolver));
        let categories = Arc::new(CategoryService::new(store));
        categories.refresh().await;
        (
            WorkService::new(repository.clone(), categories),
            repository,
        )
    }

    fn create_dto(name: &str) -> CreateWorkDto {
        serde_json::from_value(serde_json::json!({
            "work_name": name,
            "category": "calls_analysis",
            "version": "1.0",
            "streamlit_page": "categories/calls_analysis/total_analysis.py"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_generates_id_and_decorates() {
        let (service, _) = service().await;

        let work = service.create(create_dto("Calls Analysis!")).await.unwrap();

        assert!(work.work_id.starts_with("calls-analysis-"));
        assert_eq!(work.work_slug, work.work_id);
        assert_eq!(work.category_name, "Análisis de Llamadas");
        assert_eq!(work.category_icon, "📞");
        assert_eq!(work.status_badge, "🟢");
        assert!(work.activated_date.is_some());
    }

    #[tokio::test]
    async fn test_list_active_by_category_name() {
        let (service, repository) = service().await;
        repository
            .create(sample_work("w1", "calls_analysis", WorkStatus::Active))
            .await;
        repository
            .create(sample_work("w2", "climate_analysis", WorkStatus::Active))
            .await;

        assert_eq!(service.list_active().await.len(), 2);
        assert!(service.list_by_category("  ").await.is_empty());
        assert!(service.list_by_category(" Análisis Climáticos").await.is_empty());

        let climate = service.list_by_category("Análisis Climáticos").await;
        assert_eq!(climate.len(), 1);
        assert_eq!(climate[0].category_icon, "🌡️");
    }

    #[tokio::test]
    async fn test_insert_of_taken_id_is_conflict() {
        let (service, repository) = service().await;
        repository
            .create(sample_work("w1", "calls_analysis", WorkStatus::Active))
            .await;

        let err = service
            .insert(sample_work("w1", "calls_analysis", WorkStatus::Active))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_category() {
        let (service, _) = service().await;
        let mut dto = create_dto("Calls Analysis");
        dto.category = "nope_analysis".to_string();

        let err = service.create(dto).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(service.list_active().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_category() {
        let (service, repository) = service().await;
        repository
            .create(sample_work("w1", "calls_analysis", WorkStatus::Active))
            .await;
        let dto = UpdateWorkDto {
            category: Some("nope_analysis".to_string()),
            ..Default::default()
        };

        let err = service.update("w1", dto).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        let work = service.get_by_id("w1").await.unwrap();
        assert_eq!(work.category, "calls_analysis");
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let (service, _) = service().await;

        let err = service
            .update("missing", UpdateWorkDto::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_returns_archived_record() {
        let (service, repository) = service().await;
        repository
            .create(sample_work("w1", "calls_analysis", WorkStatus::Active))
            .await;

        let archived = service.delete("w1").await.unwrap();

        assert_eq!(archived.status, WorkStatus::Archived);
        assert_eq!(archived.status_badge, "📁");
        assert!(service.get_by_slug("w1").await.is_err());
        assert!(service.get_by_id("w1").await.is_ok());
    }

    #[tokio::test]
    async fn test_view_registered() {
        let (service, repository) = service().await;
        repository
            .create(sample_work("w1", "calls_analysis", WorkStatus::Paused))
            .await;

        let view = service.view("w1").await.unwrap();

        assert!(matches!(
            view.target,
            ViewTarget::Registered { view } if view.key == "calls_analysis/total_analysis"
        ));
    }
}
