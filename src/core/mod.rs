//! Configuration, request-scoped data model and fallback helpers

pub mod config;
pub mod fallback;
pub mod models;
