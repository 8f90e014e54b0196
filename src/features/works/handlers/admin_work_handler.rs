use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedAdmin;
use crate::features::works::dtos::{
    AdminListQuery, CreateWorkDto, UpdateWorkDto, WorkResponseDto, WorkSummaryDto,
};
use crate::features::works::services::WorkService;
use crate::shared::types::{ApiResponse, Meta};

/// List every work, optionally filtered by status (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/works",
    params(AdminListQuery),
    responses(
        (status = 200, description = "Works retrieved successfully", body = ApiResponse<Vec<WorkSummaryDto>>),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "admin-works",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_list_works(
    _admin: AuthenticatedAdmin,
    State(service): State<Arc<WorkService>>,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<ApiResponse<Vec<WorkSummaryDto>>>> {
    let works = service.list_all(query.status).await;
    let total = works.len();
    Ok(Json(ApiResponse::success(
        Some(works),
        None,
        Some(Meta::total(total)),
    )))
}

/// Create a work; the id is generated from its name (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/works",
    request_body = CreateWorkDto,
    responses(
        (status = 201, description = "Work created successfully", body = ApiResponse<WorkResponseDto>),
        (status = 400, description = "Validation error or unknown category"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Generated id already taken")
    ),
    tag = "admin-works",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_work(
    admin: AuthenticatedAdmin,
    State(service): State<Arc<WorkService>>,
    AppJson(dto): AppJson<CreateWorkDto>,
) -> Result<(StatusCode, Json<ApiResponse<WorkResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let work = service.create(dto).await?;
    tracing::info!("Work '{}' created by {}", work.work_id, admin.subject);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(work),
            Some("Work created successfully".to_string()),
            None,
        )),
    ))
}

/// Update the supplied fields of a work (admin only)
#[utoipa::path(
    put,
    path = "/api/admin/works/{work_id}",
    params(
        ("work_id" = String, Path, description = "Work ID")
    ),
    request_body = UpdateWorkDto,
    responses(
        (status = 200, description = "Work updated successfully", body = ApiResponse<WorkResponseDto>),
        (status = 400, description = "Validation error or unknown category"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Work not found")
    ),
    tag = "admin-works",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_work(
    admin: AuthenticatedAdmin,
    State(service): State<Arc<WorkService>>,
    Path(work_id): Path<String>,
    AppJson(dto): AppJson<UpdateWorkDto>,
) -> Result<Json<ApiResponse<WorkResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let work = service.update(&work_id, dto).await?;
    tracing::info!("Work '{}' updated by {}", work_id, admin.subject);
    Ok(Json(ApiResponse::success(
        Some(work),
        Some("Work updated successfully".to_string()),
        None,
    )))
}

/// Archive a work; the row is kept (admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/works/{work_id}",
    params(
        ("work_id" = String, Path, description = "Work ID")
    ),
    responses(
        (status = 200, description = "Work archived successfully", body = ApiResponse<WorkResponseDto>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Work not found")
    ),
    tag = "admin-works",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_work(
    admin: AuthenticatedAdmin,
    State(service): State<Arc<WorkService>>,
    Path(work_id): Path<String>,
) -> Result<Json<ApiResponse<WorkResponseDto>>> {
    let work = service.delete(&work_id).await?;
    tracing::info!("Work '{}' archived by {}", work_id, admin.subject);
    Ok(Json(ApiResponse::success(
        Some(work),
        Some("Work archived successfully".to_string()),
        None,
    )))
}
