mod category;

pub use category::{sort_for_display, Category};
