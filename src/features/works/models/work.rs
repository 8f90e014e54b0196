use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::shared::constants::{FALLBACK_WORK_SLUG, WORK_ID_TIMESTAMP_FORMAT};

/// Work lifecycle status matching the `work_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "work_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    Active,
    Paused,
    Archived,
    Maintenance,
}

impl WorkStatus {
    pub const ALL: [WorkStatus; 4] = [
        WorkStatus::Active,
        WorkStatus::Paused,
        WorkStatus::Archived,
        WorkStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Active => "active",
            WorkStatus::Paused => "paused",
            WorkStatus::Archived => "archived",
            WorkStatus::Maintenance => "maintenance",
        }
    }

    /// Emoji badge shown next to a work in listings
    pub fn badge(&self) -> &'static str {
        match self {
            WorkStatus::Active => "🟢",
            WorkStatus::Paused => "⏸️",
            WorkStatus::Archived => "📁",
            WorkStatus::Maintenance => "🔧",
        }
    }
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown work status: {}", s))
    }
}

/// Database model for a row of the works index
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Work {
    pub work_id: String,
    pub work_name: String,
    pub work_slug: String,
    pub category: String,
    pub subcategory: String,
    pub status: WorkStatus,
    pub version: String,
    pub is_latest: bool,
    pub description: String,
    pub short_description: String,
    pub image_preview_url: String,
    pub streamlit_page: String,
    pub work_url: Option<String>,
    pub config_json: serde_json::Value,
    pub notes: String,
    pub tags: Vec<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    pub activated_date: Option<DateTime<Utc>>,
    pub archived_date: Option<DateTime<Utc>>,
}

impl Work {
    /// Overwrite a single column with a supplied value
    pub fn apply(&mut self, field: WorkField) {
        match field {
            WorkField::WorkName(v) => self.work_name = v,
            WorkField::WorkSlug(v) => self.work_slug = v,
            WorkField::Category(v) => self.category = v,
            WorkField::Subcategory(v) => self.subcategory = v,
            WorkField::Status(v) => self.status = v,
            WorkField::Version(v) => self.version = v,
            WorkField::IsLatest(v) => self.is_latest = v,
            WorkField::Description(v) => self.description = v,
            WorkField::ShortDescription(v) => self.short_description = v,
            WorkField::ImagePreviewUrl(v) => self.image_preview_url = v,
            WorkField::StreamlitPage(v) => self.streamlit_page = v,
            WorkField::WorkUrl(v) => self.work_url = v,
            WorkField::ConfigJson(v) => self.config_json = v,
            WorkField::Notes(v) => self.notes = v,
            WorkField::Tags(v) => self.tags = v,
            WorkField::ActivatedDate(v) => self.activated_date = v,
        }
    }

    /// Soft delete: the row stays, only status and dates move
    pub fn archive(&mut self, now: DateTime<Utc>) {
        self.status = WorkStatus::Archived;
        self.archived_date = Some(now);
        self.updated_date = now;
    }
}

/// Insert payload. Required columns are plain values, everything else falls back to a default.
#[derive(Debug, Clone)]
pub struct NewWork {
    pub work_id: String,
    pub work_name: String,
    pub category: String,
    pub status: WorkStatus,
    pub version: String,
    pub streamlit_page: String,
    pub work_slug: Option<String>,
    pub subcategory: Option<String>,
    pub is_latest: Option<bool>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub image_preview_url: Option<String>,
    pub work_url: Option<String>,
    pub config_json: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_date: Option<DateTime<Utc>>,
    pub activated_date: Option<DateTime<Utc>>,
    pub archived_date: Option<DateTime<Utc>>,
}

impl NewWork {
    pub fn new(
        work_id: impl Into<String>,
        work_name: impl Into<String>,
        category: impl Into<String>,
        status: WorkStatus,
        version: impl Into<String>,
        streamlit_page: impl Into<String>,
    ) -> Self {
        Self {
            work_id: work_id.into(),
            work_name: work_name.into(),
            category: category.into(),
            status,
            version: version.into(),
            streamlit_page: streamlit_page.into(),
            work_slug: None,
            subcategory: None,
            is_latest: None,
            description: None,
            short_description: None,
            image_preview_url: None,
            work_url: None,
            config_json: None,
            notes: None,
            tags: None,
            created_date: None,
            activated_date: None,
            archived_date: None,
        }
    }

    /// Materialize the row that will be stored, applying defaults
    pub fn into_work(self, now: DateTime<Utc>) -> Work {
        let work_slug = self.work_slug.unwrap_or_else(|| self.work_id.clone());
        Work {
            work_id: self.work_id,
            work_name: self.work_name,
            work_slug,
            category: self.category,
            subcategory: self.subcategory.unwrap_or_default(),
            status: self.status,
            version: self.version,
            is_latest: self.is_latest.unwrap_or(true),
            description: self.description.unwrap_or_default(),
            short_description: self.short_description.unwrap_or_default(),
            image_preview_url: self.image_preview_url.unwrap_or_default(),
            streamlit_page: self.streamlit_page,
            work_url: self.work_url.filter(|url| !url.is_empty()),
            config_json: self
                .config_json
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            notes: self.notes.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            created_date: self.created_date.unwrap_or(now),
            updated_date: now,
            activated_date: self.activated_date,
            archived_date: self.archived_date,
        }
    }
}

/// One updatable column and its new value. `work_id` is deliberately absent.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkField {
    WorkName(String),
    WorkSlug(String),
    Category(String),
    Subcategory(String),
    Status(WorkStatus),
    Version(String),
    IsLatest(bool),
    Description(String),
    ShortDescription(String),
    ImagePreviewUrl(String),
    StreamlitPage(String),
    WorkUrl(Option<String>),
    ConfigJson(serde_json::Value),
    Notes(String),
    Tags(Vec<String>),
    ActivatedDate(Option<DateTime<Utc>>),
}

impl WorkField {
    pub fn column(&self) -> &'static str {
        match self {
            WorkField::WorkName(_) => "work_name",
            WorkField::WorkSlug(_) => "work_slug",
            WorkField::Category(_) => "category",
            WorkField::Subcategory(_) => "subcategory",
            WorkField::Status(_) => "status",
            WorkField::Version(_) => "version",
            WorkField::IsLatest(_) => "is_latest",
            WorkField::Description(_) => "description",
            WorkField::ShortDescription(_) => "short_description",
            WorkField::ImagePreviewUrl(_) => "image_preview_url",
            WorkField::StreamlitPage(_) => "streamlit_page",
            WorkField::WorkUrl(_) => "work_url",
            WorkField::ConfigJson(_) => "config_json",
            WorkField::Notes(_) => "notes",
            WorkField::Tags(_) => "tags",
            WorkField::ActivatedDate(_) => "activated_date",
        }
    }
}

/// Partial update: only the supplied fields are written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkUpdate {
    fields: Vec<WorkField>,
}

impl WorkUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field; a later value for the same column replaces the earlier one
    pub fn set(mut self, field: WorkField) -> Self {
        self.fields.retain(|f| f.column() != field.column());
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[WorkField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<WorkField> for WorkUpdate {
    fn from_iter<I: IntoIterator<Item = WorkField>>(iter: I) -> Self {
        iter.into_iter().fold(WorkUpdate::new(), WorkUpdate::set)
    }
}

/// Row filter for listing works
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkFilter {
    pub status: Option<WorkStatus>,
    pub category: Option<String>,
}

impl WorkFilter {
    pub fn active() -> Self {
        Self {
            status: Some(WorkStatus::Active),
            category: None,
        }
    }

    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category = Some(category_id.into());
        self
    }

    pub fn matches(&self, work: &Work) -> bool {
        self.status.map_or(true, |s| work.status == s)
            && self.category.as_ref().map_or(true, |c| &work.category == c)
    }
}

/// Build a work id from its name: a lowercase hyphenated slug plus a UTC timestamp suffix
pub fn generate_work_id(name: &str, now: DateTime<Utc>) -> String {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    let slug = cleaned.split_whitespace().collect::<Vec<_>>().join("-");
    let slug = match slug.trim_matches('-') {
        "" => FALLBACK_WORK_SLUG,
        trimmed => trimmed,
    };

    format!("{}-{}", slug, now.format(WORK_ID_TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::SLUG_REGEX;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_status_round_trip_through_str() {
        for status in WorkStatus::ALL {
            assert_eq!(status.as_str().parse::<WorkStatus>().unwrap(), status);
        }
        assert!("deleted".parse::<WorkStatus>().is_err());
        assert!("Active".parse::<WorkStatus>().is_err());
    }

    #[test]
    fn test_status_badges() {
        assert_eq!(WorkStatus::Active.badge(), "🟢");
        assert_eq!(WorkStatus::Paused.badge(), "⏸️");
        assert_eq!(WorkStatus::Archived.badge(), "📁");
        assert_eq!(WorkStatus::Maintenance.badge(), "🔧");
    }

    #[test]
    fn test_generate_work_id() {
        assert_eq!(
            generate_work_id("Calls Analysis!", fixed_now()),
            "calls-analysis-20250101120000"
        );
        assert_eq!(
            generate_work_id("  Total   calls  2024 ", fixed_now()),
            "total-calls-2024-20250101120000"
        );
    }

    #[test]
    fn test_generate_work_id_without_usable_characters() {
        assert_eq!(generate_work_id("日本", fixed_now()), "work-20250101120000");
        assert_eq!(generate_work_id("!!!", fixed_now()), "work-20250101120000");
        assert_eq!(
            generate_work_id("- Calls -", fixed_now()),
            "calls-20250101120000"
        );
        assert!(SLUG_REGEX.is_match(&generate_work_id("--", fixed_now())));
    }

    #[test]
    fn test_generate_work_id_drops_non_ascii() {
        assert_eq!(
            generate_work_id("Análisis de Llamadas", fixed_now()),
            "anlisis-de-llamadas-20250101120000"
        );
    }

    #[test]
    fn test_new_work_defaults() {
        let work = NewWork::new(
            "w1",
            "Work one",
            "calls_analysis",
            WorkStatus::Active,
            "1.0",
            "calls_analysis/total_analysis",
        )
        .into_work(fixed_now());

        assert_eq!(work.work_slug, "w1");
        assert_eq!(work.subcategory, "");
        assert!(work.is_latest);
        assert_eq!(work.config_json, serde_json::json!({}));
        assert!(work.tags.is_empty());
        assert_eq!(work.created_date, fixed_now());
        assert_eq!(work.updated_date, fixed_now());
        assert!(work.work_url.is_none());
        assert!(work.archived_date.is_none());
    }

    #[test]
    fn test_update_last_value_wins_per_column() {
        let update = WorkUpdate::new()
            .set(WorkField::Version("1.1".into()))
            .set(WorkField::Notes("n".into()))
            .set(WorkField::Version("1.2".into()));

        assert_eq!(update.fields().len(), 2);
        assert!(update
            .fields()
            .contains(&WorkField::Version("1.2".into())));
    }

    #[test]
    fn test_apply_and_archive() {
        let mut work = NewWork::new("w1", "Work", "calls_analysis", WorkStatus::Active, "1.0", "p")
            .into_work(fixed_now());

        work.apply(WorkField::Tags(vec!["calls".into()]));
        assert_eq!(work.tags, vec!["calls".to_string()]);

        let later = fixed_now() + chrono::Duration::minutes(5);
        work.archive(later);
        assert_eq!(work.status, WorkStatus::Archived);
        assert_eq!(work.archived_date, Some(later));
        assert_eq!(work.updated_date, later);
    }

    #[test]
    fn test_filter_matches() {
        let work = NewWork::new("w1", "Work", "calls_analysis", WorkStatus::Paused, "1.0", "p")
            .into_work(fixed_now());

        assert!(WorkFilter::default().matches(&work));
        assert!(!WorkFilter::active().matches(&work));
        assert!(WorkFilter::default()
            .in_category("calls_analysis")
            .matches(&work));
        assert!(!WorkFilter::default()
            .in_category("climate_analysis")
            .matches(&work));
    }
}
