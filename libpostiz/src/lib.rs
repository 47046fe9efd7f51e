//! Postiz tools - Unix tools for the Postiz scheduling API
//!
//! This library provides the API client, configuration and the tool upload
//! workflow shared by the `pz-*` binaries.

pub mod api;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod logging;
pub mod settings;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use api::PostizClient;
pub use config::Config;
pub use error::{PostizError, Result};
pub use settings::Settings;
pub use types::{CreatePostRequest, PostBatch, PostType, PostsQuery};
