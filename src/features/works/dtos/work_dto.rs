use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::categories::services::CategoryLookup;
use crate::features::works::models::{NewWork, Work, WorkField, WorkStatus, WorkUpdate};
use crate::features::works::registry::ViewTarget;
use crate::shared::constants::DISPLAY_DATE_FORMAT;
use crate::shared::validation::SLUG_REGEX;

// Query params for public listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListWorksQuery {
    /// Category display name (e.g. "Análisis de Llamadas")
    pub category: Option<String>,
}

// Query params for the admin listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct AdminListQuery {
    /// Only works in this status; all statuses when omitted
    pub status: Option<WorkStatus>,
}

/// Work as shown in listings, with display fields resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkSummaryDto {
    pub work_id: String,
    pub work_name: String,
    pub work_slug: String,
    pub category: String,
    pub category_name: String,
    pub category_icon: String,
    pub status: WorkStatus,
    pub status_badge: String,
    pub version: String,
    pub short_description: String,
    pub image_preview_url: String,
    pub tags: Vec<String>,
    pub created_date: DateTime<Utc>,
    /// `created_date` as `dd/mm/yyyy HH:MM`
    pub created_display: String,
}

impl WorkSummaryDto {
    pub fn from_work(work: Work, lookup: &CategoryLookup) -> Self {
        let (category_name, category_icon) = lookup.display(&work.category);
        Self {
            category_name: category_name.to_string(),
            category_icon: category_icon.to_string(),
            status_badge: work.status.badge().to_string(),
            created_display: work.created_date.format(DISPLAY_DATE_FORMAT).to_string(),
            work_id: work.work_id,
            work_name: work.work_name,
            work_slug: work.work_slug,
            category: work.category,
            status: work.status,
            version: work.version,
            short_description: work.short_description,
            image_preview_url: work.image_preview_url,
            tags: work.tags,
            created_date: work.created_date,
        }
    }
}

/// Full work record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkResponseDto {
    pub work_id: String,
    pub work_name: String,
    pub work_slug: String,
    pub category: String,
    pub category_name: String,
    pub category_icon: String,
    pub subcategory: String,
    pub status: WorkStatus,
    pub status_badge: String,
    pub version: String,
    pub is_latest: bool,
    pub description: String,
    pub short_description: String,
    pub image_preview_url: String,
    pub streamlit_page: String,
    pub work_url: Option<String>,
    #[schema(value_type = Object)]
    pub config_json: serde_json::Value,
    pub notes: String,
    pub tags: Vec<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    pub activated_date: Option<DateTime<Utc>>,
    pub archived_date: Option<DateTime<Utc>>,
}

impl WorkResponseDto {
    pub fn from_work(work: Work, lookup: &CategoryLookup) -> Self {
        let (category_name, category_icon) = lookup.display(&work.category);
        Self {
            category_name: category_name.to_string(),
            category_icon: category_icon.to_string(),
            status_badge: work.status.badge().to_string(),
            work_id: work.work_id,
            work_name: work.work_name,
            work_slug: work.work_slug,
            category: work.category,
            subcategory: work.subcategory,
            status: work.status,
            version: work.version,
            is_latest: work.is_latest,
            description: work.description,
            short_description: work.short_description,
            image_preview_url: work.image_preview_url,
            streamlit_page: work.streamlit_page,
            work_url: work.work_url,
            config_json: work.config_json,
            notes: work.notes,
            tags: work.tags,
            created_date: work.created_date,
            updated_date: work.updated_date,
            activated_date: work.activated_date,
            archived_date: work.archived_date,
        }
    }
}

/// Render target for a single work
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkViewDto {
    pub work_id: String,
    pub work_name: String,
    pub target: ViewTarget,
}

// Create request; the id is generated from `work_name`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWorkDto {
    #[validate(length(min = 1, max = 200))]
    pub work_name: String,

    /// Category id (e.g. "calls_analysis"); must be in the catalogue
    #[validate(length(min = 1, max = 100))]
    pub category: String,

    /// Defaults to `active`
    pub status: Option<WorkStatus>,

    #[validate(length(min = 1, max = 50))]
    pub version: String,

    /// Render target, e.g. `categories/calls_analysis/total_analysis.py`
    #[validate(length(min = 1))]
    pub streamlit_page: String,

    /// Defaults to the generated id
    #[validate(regex(path = *SLUG_REGEX, message = "work_slug must be lowercase alphanumeric words separated by single hyphens"))]
    pub work_slug: Option<String>,

    pub subcategory: Option<String>,
    pub is_latest: Option<bool>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub image_preview_url: Option<String>,
    pub work_url: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub config_json: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CreateWorkDto {
    pub fn into_new_work(self, work_id: String, now: DateTime<Utc>) -> NewWork {
        let status = self.status.unwrap_or(WorkStatus::Active);
        let mut work = NewWork::new(
            work_id,
            self.work_name,
            self.category,
            status,
            self.version,
            self.streamlit_page,
        );
        work.work_slug = self.work_slug;
        work.subcategory = self.subcategory;
        work.is_latest = self.is_latest;
        work.description = self.description;
        work.short_description = self.short_description;
        work.image_preview_url = self.image_preview_url;
        work.work_url = self.work_url;
        work.config_json = self.config_json;
        work.notes = self.notes;
        work.tags = self.tags;
        if status == WorkStatus::Active {
            work.activated_date = Some(now);
        }
        work
    }
}

// Update request; omitted fields are left untouched
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateWorkDto {
    #[validate(length(min = 1, max = 200))]
    pub work_name: Option<String>,

    #[validate(regex(path = *SLUG_REGEX, message = "work_slug must be lowercase alphanumeric words separated by single hyphens"))]
    pub work_slug: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,

    pub subcategory: Option<String>,
    pub status: Option<WorkStatus>,

    #[validate(length(min = 1, max = 50))]
    pub version: Option<String>,

    pub is_latest: Option<bool>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub image_preview_url: Option<String>,

    #[validate(length(min = 1))]
    pub streamlit_page: Option<String>,

    /// An empty string clears the external URL
    pub work_url: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub config_json: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub activated_date: Option<DateTime<Utc>>,
}

impl UpdateWorkDto {
    pub fn into_update(self) -> WorkUpdate {
        let work_url = self
            .work_url
            .map(|url| Some(url).filter(|u| !u.trim().is_empty()));

        [
            self.work_name.map(WorkField::WorkName),
            self.work_slug.map(WorkField::WorkSlug),
            self.category.map(WorkField::Category),
            self.subcategory.map(WorkField::Subcategory),
            self.status.map(WorkField::Status),
            self.version.map(WorkField::Version),
            self.is_latest.map(WorkField::IsLatest),
            self.description.map(WorkField::Description),
            self.short_description.map(WorkField::ShortDescription),
            self.image_preview_url.map(WorkField::ImagePreviewUrl),
            self.streamlit_page.map(WorkField::StreamlitPage),
            work_url.map(WorkField::WorkUrl),
            self.config_json.map(WorkField::ConfigJson),
            self.notes.map(WorkField::Notes),
            self.tags.map(WorkField::Tags),
            self.activated_date.map(|d| WorkField::ActivatedDate(Some(d))),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
