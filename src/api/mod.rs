//! API Lambda handler and request processing

pub mod analyze;
pub mod chat;
pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod speech_token;
pub mod talk;

// Re-export the main handler for convenience
pub use handler::{handler, route};
pub use helpers::ApiResponse;
pub use parsing::ApiRequest;
