mod work_repository;
mod work_service;

pub use work_repository::WorkRepository;
pub use work_service::WorkService;
