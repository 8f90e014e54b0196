use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::works::dtos::{
    ListWorksQuery, WorkResponseDto, WorkSummaryDto, WorkViewDto,
};
use crate::features::works::registry::{self, ViewDefinition};
use crate::features::works::services::WorkService;
use crate::shared::types::{ApiResponse, Meta};

fn listing(works: Vec<WorkSummaryDto>) -> Json<ApiResponse<Vec<WorkSummaryDto>>> {
    let total = works.len();
    Json(ApiResponse::success(Some(works), None, Some(Meta::total(total))))
}

/// List active works
///
/// Ordered by category, newest first. `category` takes a display name,
/// matched exactly; an unknown name yields an empty list and an empty
/// value means no filter.
#[utoipa::path(
    get,
    path = "/api/works",
    params(ListWorksQuery),
    responses(
        (status = 200, description = "Active works", body = ApiResponse<Vec<WorkSummaryDto>>),
    ),
    tag = "works"
)]
pub async fn list_works(
    State(service): State<Arc<WorkService>>,
    Query(query): Query<ListWorksQuery>,
) -> Result<Json<ApiResponse<Vec<WorkSummaryDto>>>> {
    let works = match query.category.as_deref().filter(|name| !name.is_empty()) {
        Some(name) => service.list_by_category(name).await,
        None => service.list_active().await,
    };
    Ok(listing(works))
}

/// List active works in a category, by display name
#[utoipa::path(
    get,
    path = "/api/works/category/{category_name}",
    params(
        ("category_name" = String, Path, description = "Category display name")
    ),
    responses(
        (status = 200, description = "Active works in the category", body = ApiResponse<Vec<WorkSummaryDto>>),
    ),
    tag = "works"
)]
pub async fn list_works_by_category(
    State(service): State<Arc<WorkService>>,
    Path(category_name): Path<String>,
) -> Result<Json<ApiResponse<Vec<WorkSummaryDto>>>> {
    let works = service.list_by_category(&category_name).await;
    Ok(listing(works))
}

/// Get an active work by slug
#[utoipa::path(
    get,
    path = "/api/works/slug/{work_slug}",
    params(
        ("work_slug" = String, Path, description = "Work slug")
    ),
    responses(
        (status = 200, description = "Work found", body = ApiResponse<WorkResponseDto>),
        (status = 404, description = "No active work with this slug")
    ),
    tag = "works"
)]
pub async fn get_work_by_slug(
    State(service): State<Arc<WorkService>>,
    Path(work_slug): Path<String>,
) -> Result<Json<ApiResponse<WorkResponseDto>>> {
    let work = service.get_by_slug(&work_slug).await?;
    Ok(Json(ApiResponse::success(Some(work), None, None)))
}

/// Get a work by id, whatever its status
#[utoipa::path(
    get,
    path = "/api/works/{work_id}",
    params(
        ("work_id" = String, Path, description = "Work ID")
    ),
    responses(
        (status = 200, description = "Work found", body = ApiResponse<WorkResponseDto>),
        (status = 404, description = "Work not found")
    ),
    tag = "works"
)]
pub async fn get_work(
    State(service): State<Arc<WorkService>>,
    Path(work_id): Path<String>,
) -> Result<Json<ApiResponse<WorkResponseDto>>> {
    let work = service.get_by_id(&work_id).await?;
    Ok(Json(ApiResponse::success(Some(work), None, None)))
}

/// Resolve how a work is rendered
#[utoipa::path(
    get,
    path = "/api/works/{work_id}/view",
    params(
        ("work_id" = String, Path, description = "Work ID")
    ),
    responses(
        (status = 200, description = "Render target", body = ApiResponse<WorkViewDto>),
        (status = 404, description = "Work not found")
    ),
    tag = "works"
)]
pub async fn get_work_view(
    State(service): State<Arc<WorkService>>,
    Path(work_id): Path<String>,
) -> Result<Json<ApiResponse<WorkViewDto>>> {
    let view = service.view(&work_id).await?;
    Ok(Json(ApiResponse::success(Some(view), None, None)))
}

/// List registered views
#[utoipa::path(
    get,
    path = "/api/views",
    responses(
        (status = 200, description = "Registered views", body = ApiResponse<Vec<ViewDefinition>>),
    ),
    tag = "works"
)]
pub async fn list_views() -> Json<ApiResponse<Vec<ViewDefinition>>> {
    let views = registry::get_all_views();
    let total = views.len();
    Json(ApiResponse::success(Some(views), None, Some(Meta::total(total))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::{CategoryResolver, CategoryService};
    use crate::features::works::models::WorkStatus;
    use crate::features::works::routes;
    use crate::features::works::services::WorkRepository;
    use crate::modules::store::{MemoryWorksStore, WorksStore};
    use crate::shared::test_helpers::sample_work;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use fake::{faker::company::en::CompanyName, Fake};
    use serde_json::Value;

    async fn server_with(works: Vec<crate::features::works::models::NewWork>) -> TestServer {
        let store: Arc<dyn WorksStore> = Arc::new(MemoryWorksStore::seeded());
        let resolver = Arc::new(CategoryResolver::new(store.clone()));
        let repository = Arc::new(WorkRepository::new(store.clone(), resolver));
        for work in works {
            assert!(repository.create(work).await);
        }
        let categories = Arc::new(CategoryService::new(store));
        let service = Arc::new(WorkService::new(repository, categories));
        TestServer::new(routes::routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_list_works_only_active() {
        let mut named = sample_work("named", "calls_analysis", WorkStatus::Active);
        named.work_name = CompanyName().fake();
        let server = server_with(vec![
            named.clone(),
            sample_work("paused", "calls_analysis", WorkStatus::Paused),
        ])
        .await;

        let response = server.get("/api/works").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["work_id"], "named");
        assert_eq!(body["data"][0]["work_name"], named.work_name.as_str());
        assert_eq!(body["data"][0]["status_badge"], "🟢");
        assert_eq!(body["data"][0]["category_name"], "Análisis de Llamadas");
    }

    #[tokio::test]
    async fn test_list_works_by_category_query_and_path() {
        let server = server_with(vec![
            sample_work("calls", "calls_analysis", WorkStatus::Active),
            sample_work("climate", "climate_analysis", WorkStatus::Active),
        ])
        .await;

        let by_query = server
            .get("/api/works")
            .add_query_param("category", "Análisis Climáticos")
            .await;
        let body: Value = by_query.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["work_id"], "climate");

        let unknown = server.get("/api/works/category/Nothing").await;
        unknown.assert_status_ok();
        let body: Value = unknown.json();
        assert_eq!(body["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_category_path_matches_exactly() {
        let server = server_with(vec![
            sample_work("calls-1", "calls_analysis", WorkStatus::Active),
            sample_work("calls-2", "calls_analysis", WorkStatus::Active),
        ])
        .await;

        for path in [
            "/api/works/category/%20",
            "/api/works/category/%20An%C3%A1lisis%20de%20Llamadas%20",
            "/api/works/category/an%C3%A1lisis%20de%20llamadas",
        ] {
            let response = server.get(path).await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["meta"]["total"], 0, "{}", path);
        }

        let exact: Value = server
            .get("/api/works/category/An%C3%A1lisis%20de%20Llamadas")
            .await
            .json();
        assert_eq!(exact["meta"]["total"], 2);
    }

    #[tokio::test]
    async fn test_list_works_blank_query_is_unfiltered() {
        let server = server_with(vec![
            sample_work("calls", "calls_analysis", WorkStatus::Active),
            sample_work("climate", "climate_analysis", WorkStatus::Active),
        ])
        .await;

        let blank: Value = server
            .get("/api/works")
            .add_query_param("category", "")
            .await
            .json();
        assert_eq!(blank["meta"]["total"], 2);

        let padded: Value = server
            .get("/api/works")
            .add_query_param("category", " ")
            .await
            .json();
        assert_eq!(padded["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_get_work_by_id_and_slug() {
        let server = server_with(vec![sample_work(
            "paused",
            "calls_analysis",
            WorkStatus::Paused,
        )])
        .await;

        server.get("/api/works/paused").await.assert_status_ok();
        server
            .get("/api/works/slug/paused")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/api/works/missing")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_work_view() {
        let server = server_with(vec![sample_work(
            "w1",
            "calls_analysis",
            WorkStatus::Active,
        )])
        .await;

        let response = server.get("/api/works/w1/view").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["target"]["kind"], "registered");
        assert_eq!(
            body["data"]["target"]["view"]["key"],
            "calls_analysis/total_analysis"
        );
    }

    #[tokio::test]
    async fn test_list_views() {
        let server = server_with(Vec::new()).await;

        let response = server.get("/api/views").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 2);
    }
}
