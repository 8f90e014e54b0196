/// Icon shown for works whose category has no icon of its own
pub const DEFAULT_CATEGORY_ICON: &str = "📊";

/// Display format for timestamps in listings (day/month/year hour:minute)
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Suffix format appended to generated work ids
pub const WORK_ID_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Slug used for generated ids when the name has no ASCII letters or digits
pub const FALLBACK_WORK_SLUG: &str = "work";

pub const SERVICE_NAME: &str = "works-index-api";
