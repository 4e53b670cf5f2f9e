//! Client modules for external API interactions

pub mod dify_client;
pub mod http;
pub mod line_client;
pub mod prefs_client;
pub mod speech_client;

pub use dify_client::{WorkflowClient, WorkflowOutputs};
pub use line_client::LineClient;
pub use prefs_client::PrefsClient;
