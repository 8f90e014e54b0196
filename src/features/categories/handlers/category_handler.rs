use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::categories::dtos::{CategoryListDto, CategoryNamesDto};
use crate::features::categories::services::CategoryService;
use crate::shared::types::{ApiResponse, Meta};

/// List all active categories
///
/// `source` is `degraded` when the store could not be reached and the last
/// known catalogue was served instead.
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<CategoryListDto>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<CategoryListDto>>> {
    let listing = CategoryListDto::from(service.list().await);
    let total = listing.categories.len();
    Ok(Json(ApiResponse::success(
        Some(listing),
        None,
        Some(Meta::total(total)),
    )))
}

/// Category display names, for filter dropdowns
#[utoipa::path(
    get,
    path = "/api/categories/names",
    responses(
        (status = 200, description = "Category names", body = ApiResponse<CategoryNamesDto>),
    ),
    tag = "categories"
)]
pub async fn list_category_names(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<CategoryNamesDto>>> {
    let (names, source) = service.names().await;
    let total = names.len();
    Ok(Json(ApiResponse::success(
        Some(CategoryNamesDto { names, source }),
        None,
        Some(Meta::total(total)),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::routes;
    use crate::modules::store::MemoryWorksStore;
    use crate::shared::test_helpers::FailingWorksStore;
    use axum_test::TestServer;
    use serde_json::Value;

    #[tokio::test]
    async fn test_list_categories_live() {
        let service = Arc::new(CategoryService::new(Arc::new(MemoryWorksStore::seeded())));
        let server = TestServer::new(routes::routes(service)).unwrap();

        let response = server.get("/api/categories").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["source"], "live");
        assert_eq!(body["data"]["categories"][0]["id"], "calls_analysis");
        assert_eq!(body["data"]["categories"][0]["icon"], "📞");
        assert_eq!(body["meta"]["total"], 5);
    }

    #[tokio::test]
    async fn test_list_categories_degraded_still_ok() {
        let service = Arc::new(CategoryService::new(Arc::new(FailingWorksStore)));
        let server = TestServer::new(routes::routes(service)).unwrap();

        let response = server.get("/api/categories").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["source"], "degraded");
        assert_eq!(body["meta"]["total"], 5);
    }

    #[tokio::test]
    async fn test_list_category_names() {
        let service = Arc::new(CategoryService::new(Arc::new(MemoryWorksStore::seeded())));
        let server = TestServer::new(routes::routes(service)).unwrap();

        let response = server.get("/api/categories/names").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["names"][2], "Análisis Climáticos");
    }
}
