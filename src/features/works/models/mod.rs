mod work;

pub use work::{generate_work_id, NewWork, Work, WorkField, WorkFilter, WorkStatus, WorkUpdate};
