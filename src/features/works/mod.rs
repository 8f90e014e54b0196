pub mod dtos;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod routes;
pub mod services;

pub use services::{WorkRepository, WorkService};
