use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for SQL identifiers that get interpolated into statements (schema and table names)
    /// - Valid: "settings", "works_index", "_staging2"
    /// - Invalid: "works-index", "1table", "settings.works", "works; DROP"
    pub static ref IDENTIFIER_REGEX: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").unwrap();

    /// Regex for work slugs used in public URLs
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "calls-analysis-20250101120000", "w1"
    /// - Invalid: "-calls", "calls-", "calls--analysis", "Calls", "calls_analysis"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}
