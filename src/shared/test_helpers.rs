#![cfg(test)]

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::{DateTime, Utc};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedAdmin;
use crate::features::categories::models::Category;
use crate::features::works::models::{NewWork, Work, WorkFilter, WorkStatus, WorkUpdate};
use crate::modules::store::WorksStore;

pub fn create_admin() -> AuthenticatedAdmin {
    AuthenticatedAdmin {
        subject: "admin".to_string(),
        token_id: "test-token-id".to_string(),
        expires_at: Utc::now() + chrono::Duration::hours(1),
    }
}

async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin());
    next.run(request).await
}

pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

pub fn sample_work(work_id: &str, category: &str, status: WorkStatus) -> NewWork {
    let mut work = NewWork::new(
        work_id,
        format!("Work {}", work_id),
        category,
        status,
        "1.0",
        "categories/calls_analysis/total_analysis.py",
    );
    work.short_description = Some(format!("Short description of {}", work_id));
    work
}

/// Store whose every call fails, standing in for an unreachable database
pub struct FailingWorksStore;

fn unreachable_store() -> AppError {
    AppError::Internal("store unreachable".to_string())
}

#[async_trait]
impl WorksStore for FailingWorksStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn find_active_category_id(&self, _category_name: &str) -> Result<Option<String>> {
        Err(unreachable_store())
    }

    async fn list_active_categories(&self) -> Result<Vec<Category>> {
        Err(unreachable_store())
    }

    async fn list_works(&self, _filter: &WorkFilter) -> Result<Vec<Work>> {
        Err(unreachable_store())
    }

    async fn find_work(&self, _work_id: &str) -> Result<Option<Work>> {
        Err(unreachable_store())
    }

    async fn find_active_work_by_slug(&self, _work_slug: &str) -> Result<Option<Work>> {
        Err(unreachable_store())
    }

    async fn insert_work(&self, _work: &Work) -> Result<()> {
        Err(unreachable_store())
    }

    async fn update_work(
        &self,
        _work_id: &str,
        _update: &WorkUpdate,
        _now: DateTime<Utc>,
    ) -> Result<u64> {
        Err(unreachable_store())
    }

    async fn archive_work(&self, _work_id: &str, _now: DateTime<Utc>) -> Result<u64> {
        Err(unreachable_store())
    }
}
