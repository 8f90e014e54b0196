use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::features::works::{handlers, services::WorkService};

/// Public read-only routes for the works catalog
pub fn routes(service: Arc<WorkService>) -> Router {
    Router::new()
        .route("/api/works", get(handlers::list_works))
        .route(
            "/api/works/category/{category_name}",
            get(handlers::list_works_by_category),
        )
        .route("/api/works/slug/{work_slug}", get(handlers::get_work_by_slug))
        .route("/api/works/{work_id}", get(handlers::get_work))
        .route("/api/works/{work_id}/view", get(handlers::get_work_view))
        .route("/api/views", get(handlers::list_views))
        .with_state(service)
}

/// Admin routes for managing works (bearer token required)
pub fn admin_routes(service: Arc<WorkService>) -> Router {
    Router::new()
        .route(
            "/api/admin/works",
            get(handlers::admin_list_works).post(handlers::create_work),
        )
        .route(
            "/api/admin/works/{work_id}",
            put(handlers::update_work).delete(handlers::delete_work),
        )
        .with_state(service)
}
