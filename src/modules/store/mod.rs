//! Storage for the works catalog
//!
//! Two tables live behind this seam: the works index and the categories lookup.
//! `PgWorksStore` talks to PostgreSQL through sqlx; `MemoryWorksStore` keeps
//! rows in process for local development and tests.
//!
//! Stores report transport problems as `AppError`; turning those into empty
//! results is the job of the repository layer above.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::error::Result;
use crate::features::categories::models::Category;
use crate::features::works::models::{Work, WorkFilter, WorkUpdate};

pub use memory::MemoryWorksStore;
pub use postgres::PgWorksStore;

#[async_trait]
pub trait WorksStore: Send + Sync {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Id of the first active category whose name matches exactly (case-sensitive)
    async fn find_active_category_id(&self, category_name: &str) -> Result<Option<String>>;

    /// Active categories ordered by `(display_order, category_name)`
    async fn list_active_categories(&self) -> Result<Vec<Category>>;

    /// Works matching the filter ordered by `(category, created_date DESC)`
    async fn list_works(&self, filter: &WorkFilter) -> Result<Vec<Work>>;

    /// Work by id, any status
    async fn find_work(&self, work_id: &str) -> Result<Option<Work>>;

    /// Active work by slug
    async fn find_active_work_by_slug(&self, work_slug: &str) -> Result<Option<Work>>;

    /// Insert a fully materialized row; a duplicate id is a `Conflict`
    async fn insert_work(&self, work: &Work) -> Result<()>;

    /// Write only the supplied fields plus `updated_date`; returns rows affected
    async fn update_work(
        &self,
        work_id: &str,
        update: &WorkUpdate,
        now: DateTime<Utc>,
    ) -> Result<u64>;

    /// Soft delete; returns rows affected
    async fn archive_work(&self, work_id: &str, now: DateTime<Utc>) -> Result<u64>;
}
