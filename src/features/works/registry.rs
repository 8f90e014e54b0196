use serde::Serialize;
use utoipa::ToSchema;

use crate::features::works::models::Work;

/// A render target known to the deployment.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ViewDefinition {
    /// Normalized key (e.g. "calls_analysis/total_analysis")
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// All registered views. Works whose `streamlit_page` normalizes to one of
/// these keys can be rendered in-process.
const VIEW_REGISTRY: &[ViewDefinition] = &[
    ViewDefinition {
        key: "calls_analysis/individual_companies",
        title: "Análisis de Llamadas - Compañías Individuales",
        description: "Call metrics broken down per company",
    },
    ViewDefinition {
        key: "calls_analysis/total_analysis",
        title: "Análisis Total de Llamadas",
        description: "Aggregate call metrics across every company",
    },
];

/// How a work should be rendered
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ViewTarget {
    External { url: String },
    Registered { view: ViewDefinition },
    Unregistered { target: String },
}

/// Strip a leading `categories/` and a trailing `.py` from a render target.
pub fn normalize_view_key(target: &str) -> &str {
    let target = target.trim().trim_start_matches('/');
    let target = target.strip_prefix("categories/").unwrap_or(target);
    target.strip_suffix(".py").unwrap_or(target)
}

pub fn find_view(key: &str) -> Option<&'static ViewDefinition> {
    let key = normalize_view_key(key);
    VIEW_REGISTRY.iter().find(|def| def.key == key)
}

/// Return all registered views.
pub fn get_all_views() -> Vec<ViewDefinition> {
    VIEW_REGISTRY.to_vec()
}

/// Pick the render target for a work; an http(s) `work_url` wins over the page.
pub fn resolve(work: &Work) -> ViewTarget {
    if let Some(url) = work
        .work_url
        .as_deref()
        .map(str::trim)
        .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
    {
        return ViewTarget::External {
            url: url.to_string(),
        };
    }

    match find_view(&work.streamlit_page) {
        Some(view) => ViewTarget::Registered { view: view.clone() },
        None => ViewTarget::Unregistered {
            target: work.streamlit_page.clone(),
        },
    }
}
