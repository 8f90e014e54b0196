pub mod admin_work_handler;
pub mod work_handler;

pub use admin_work_handler::{
    __path_admin_list_works, __path_create_work, __path_delete_work, __path_update_work,
    admin_list_works, create_work, delete_work, update_work,
};
pub use work_handler::{
    __path_get_work, __path_get_work_by_slug, __path_get_work_view, __path_list_views,
    __path_list_works, __path_list_works_by_category, get_work, get_work_by_slug, get_work_view,
    list_views, list_works, list_works_by_category,
};
