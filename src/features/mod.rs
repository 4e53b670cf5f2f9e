//! Orchestration stages shared by the endpoint handlers

pub mod identity;
pub mod payload;
pub mod preferences;
pub mod reply;
