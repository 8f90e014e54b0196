//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the storage seam for the works tables.

pub mod store;
