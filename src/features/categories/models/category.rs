use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for a row of the categories lookup table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub category_id: String,
    pub category_name: String,
    pub category_icon: String,
    pub description: String,
    pub display_order: i32,
    pub is_active: bool,
}

impl Category {
    pub fn new(
        category_id: impl Into<String>,
        category_name: impl Into<String>,
        category_icon: impl Into<String>,
        display_order: i32,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            category_name: category_name.into(),
            category_icon: category_icon.into(),
            description: String::new(),
            display_order,
            is_active: true,
        }
    }

    /// Built-in catalogue, used to seed the degraded-mode cache and the memory store
    pub fn builtin() -> Vec<Category> {
        vec![
            Category::new("calls_analysis", "Análisis de Llamadas", "📞", 1),
            Category::new("marketing_analysis", "Análisis de Marketing", "📈", 2),
            Category::new("climate_analysis", "Análisis Climáticos", "🌡️", 3),
            Category::new("accounting_analysis", "Análisis de Contabilidad", "💰", 4),
            Category::new("workforce_analysis", "Análisis de Fuerza Laboral", "👥", 5),
        ]
    }
}

/// Active categories in display order: `(display_order, category_name)`
pub fn sort_for_display(categories: &mut [Category]) {
    categories.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });
}
