use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::WorksStore;
use crate::core::config::StoreConfig;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::works::models::{Work, WorkField, WorkFilter, WorkStatus, WorkUpdate};

const WORK_COLUMNS: &str = "work_id, work_name, work_slug, category, subcategory, status, \
    version, is_latest, description, short_description, image_preview_url, streamlit_page, \
    work_url, config_json, notes, tags, created_date, updated_date, activated_date, archived_date";

const CATEGORY_COLUMNS: &str =
    "category_id, category_name, category_icon, description, display_order, is_active";

/// Convert database error to a more specific AppError
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // PostgreSQL unique_violation
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Conflict("A work with this id already exists".to_string());
        }
    }

    AppError::Database(e)
}

/// Works tables in PostgreSQL, addressed by schema-qualified names
pub struct PgWorksStore {
    pool: PgPool,
    works_table: String,
    categories_table: String,
}

impl PgWorksStore {
    pub fn new(pool: PgPool, config: &StoreConfig) -> Self {
        Self {
            pool,
            works_table: config.works_table_ref(),
            categories_table: config.categories_table_ref(),
        }
    }
}

#[async_trait]
impl WorksStore for PgWorksStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn find_active_category_id(&self, category_name: &str) -> Result<Option<String>> {
        let query = format!(
            "SELECT category_id FROM {} WHERE category_name = $1 AND is_active = TRUE LIMIT 1",
            self.categories_table
        );

        sqlx::query_scalar::<_, String>(&query)
            .bind(category_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to resolve category '{}': {:?}", category_name, e);
                AppError::Database(e)
            })
    }

    async fn list_active_categories(&self) -> Result<Vec<Category>> {
        let query = format!(
            "SELECT {} FROM {} WHERE is_active = TRUE ORDER BY display_order, category_name",
            CATEGORY_COLUMNS, self.categories_table
        );

        sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list_works(&self, filter: &WorkFilter) -> Result<Vec<Work>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM {} WHERE TRUE",
            WORK_COLUMNS, self.works_table
        ));

        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        qb.push(" ORDER BY category, created_date DESC");

        qb.build_query_as::<Work>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list works ({:?}): {:?}", filter, e);
                AppError::Database(e)
            })
    }

    async fn find_work(&self, work_id: &str) -> Result<Option<Work>> {
        let query = format!(
            "SELECT {} FROM {} WHERE work_id = $1 LIMIT 1",
            WORK_COLUMNS, self.works_table
        );

        sqlx::query_as::<_, Work>(&query)
            .bind(work_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get work '{}': {:?}", work_id, e);
                AppError::Database(e)
            })
    }

    async fn find_active_work_by_slug(&self, work_slug: &str) -> Result<Option<Work>> {
        let query = format!(
            "SELECT {} FROM {} WHERE work_slug = $1 AND status = $2 LIMIT 1",
            WORK_COLUMNS, self.works_table
        );

        sqlx::query_as::<_, Work>(&query)
            .bind(work_slug)
            .bind(WorkStatus::Active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get work by slug '{}': {:?}", work_slug, e);
                AppError::Database(e)
            })
    }

    async fn insert_work(&self, work: &Work) -> Result<()> {
        let query = format!(
            r#"
            INSERT INTO {} ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
            self.works_table, WORK_COLUMNS
        );

        sqlx::query(&query)
            .bind(&work.work_id)
            .bind(&work.work_name)
            .bind(&work.work_slug)
            .bind(&work.category)
            .bind(&work.subcategory)
            .bind(work.status)
            .bind(&work.version)
            .bind(work.is_latest)
            .bind(&work.description)
            .bind(&work.short_description)
            .bind(&work.image_preview_url)
            .bind(&work.streamlit_page)
            .bind(&work.work_url)
            .bind(&work.config_json)
            .bind(&work.notes)
            .bind(&work.tags)
            .bind(work.created_date)
            .bind(work.updated_date)
            .bind(work.activated_date)
            .bind(work.archived_date)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert work '{}': {:?}", work.work_id, e);
                handle_db_error(e)
            })?;

        Ok(())
    }

    async fn update_work(
        &self,
        work_id: &str,
        update: &WorkUpdate,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "UPDATE {} SET updated_date = ",
            self.works_table
        ));
        qb.push_bind(now);

        for field in update.fields() {
            qb.push(", ").push(field.column()).push(" = ");
            match field.clone() {
                WorkField::WorkName(v)
                | WorkField::WorkSlug(v)
                | WorkField::Category(v)
                | WorkField::Subcategory(v)
                | WorkField::Version(v)
                | WorkField::Description(v)
                | WorkField::ShortDescription(v)
                | WorkField::ImagePreviewUrl(v)
                | WorkField::StreamlitPage(v)
                | WorkField::Notes(v) => {
                    qb.push_bind(v);
                }
                WorkField::Status(v) => {
                    qb.push_bind(v);
                }
                WorkField::IsLatest(v) => {
                    qb.push_bind(v);
                }
                WorkField::WorkUrl(v) => {
                    qb.push_bind(v);
                }
                WorkField::ConfigJson(v) => {
                    qb.push_bind(v);
                }
                WorkField::Tags(v) => {
                    qb.push_bind(v);
                }
                WorkField::ActivatedDate(v) => {
                    qb.push_bind(v);
                }
            }
        }

        qb.push(" WHERE work_id = ").push_bind(work_id.to_string());

        let result = qb.build().execute(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to update work '{}': {:?}", work_id, e);
            handle_db_error(e)
        })?;

        Ok(result.rows_affected())
    }

    async fn archive_work(&self, work_id: &str, now: DateTime<Utc>) -> Result<u64> {
        let query = format!(
            r#"
            UPDATE {}
            SET status = $1, archived_date = $2, updated_date = $2
            WHERE work_id = $3
            "#,
            self.works_table
        );

        let result = sqlx::query(&query)
            .bind(WorkStatus::Archived)
            .bind(now)
            .bind(work_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to archive work '{}': {:?}", work_id, e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected())
    }
}
