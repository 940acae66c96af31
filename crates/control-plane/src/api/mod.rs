// HTTP API routes
//
// This module contains all HTTP route handlers for the public API.
// Each submodule handles a specific resource type with its own AppState.

pub mod agents;
pub mod chat;
pub mod common;
pub mod error;
pub mod llm_models;
pub mod system;
pub mod validation;

// Re-export common types
pub use common::{ApiResponse, ErrorResponse};
pub use error::ApiError;
