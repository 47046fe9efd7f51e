//! Tool upload workflow
//!
//! Uploads the tool source files to the external agent platform and
//! optionally attaches each uploaded tool to an agent.
//!
//! The platform is reached through two seams:
//!
//! - [`uploader::Uploader`] turns a source file plus a
//!   [`ToolRegistration`] into a tool id, either through an HTTP backend
//!   ([`uploader::InProcessUploader`]) or the platform's upload script
//!   ([`uploader::ProcessUploader`]), optionally chained with
//!   [`uploader::FallbackUploader`].
//! - [`attacher::Attacher`] links a tool id to an agent id.
//!
//! Child processes receive the env-file variables through their own
//! environment; the current process environment is never modified.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub mod attacher;
pub mod env_file;
pub mod orchestrator;
pub mod prompt;
pub mod uploader;

// Mock uploader/attacher are available for all builds to support integration tests
pub mod mock;

pub use attacher::{Attacher, ProcessAttacher};
pub use env_file::{load_env_file, parse_env, EnvMap};
pub use orchestrator::{UploadOrchestrator, UploadReport};
pub use uploader::{FallbackUploader, InProcessUploader, ProcessUploader, UploadRequest, Uploader};

/// Every registered tool name carries this suffix
pub const TOOL_NAME_SUFFIX: &str = "_1A";

/// Category under which the tools are registered
pub const TOOL_CATEGORY: &str = "postiz";

/// A tool source file and how it should be presented
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// File name relative to the tools source directory
    pub file: String,
    pub name: String,
    pub description: String,
}

impl ToolSpec {
    pub fn new(file: &str, name: &str, description: &str) -> Self {
        Self {
            file: file.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// The tools uploaded when the configuration does not list its own
pub fn default_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new("create_post.py", "create_post", "Create a new post in Postiz"),
        ToolSpec::new(
            "get_integrations.py",
            "get_integrations",
            "Get list of available integrations from Postiz",
        ),
        ToolSpec::new("get_posts.py", "get_posts", "Get list of posts from Postiz"),
        ToolSpec::new("get_self.py", "get_self", "Get user information from Postiz"),
        ToolSpec::new("login.py", "login", "Login to Postiz API"),
    ]
}

/// Metadata describing a tool to the agent platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRegistration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub category: String,
}

impl ToolRegistration {
    /// Registration for a tool; the name gains [`TOOL_NAME_SUFFIX`] if missing
    pub fn for_tool(spec: &ToolSpec) -> Self {
        let name = if spec.name.ends_with(TOOL_NAME_SUFFIX) {
            spec.name.clone()
        } else {
            format!("{}{}", spec.name, TOOL_NAME_SUFFIX)
        };

        Self {
            name,
            description: spec.description.clone(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "params_json": {
                        "type": "string",
                        "description": "JSON string containing parameters for the tool"
                    }
                },
                "required": ["params_json"]
            }),
            category: TOOL_CATEGORY.to_string(),
        }
    }

    pub fn to_json_string(&self) -> String {
        // Serializing a struct of strings and a Value cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tools() {
        let tools = default_tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            ["create_post", "get_integrations", "get_posts", "get_self", "login"]
        );
        assert!(tools.iter().all(|t| t.file == format!("{}.py", t.name)));
    }

    #[test]
    fn test_registration_appends_suffix() {
        let registration =
            ToolRegistration::for_tool(&ToolSpec::new("a.py", "create_post", "Create"));
        assert_eq!(registration.name, "create_post_1A");
        assert_eq!(registration.category, "postiz");
        assert_eq!(registration.description, "Create");
    }

    #[test]
    fn test_registration_keeps_existing_suffix() {
        let registration = ToolRegistration::for_tool(&ToolSpec::new("a.py", "login_1A", "Login"));
        assert_eq!(registration.name, "login_1A");
    }

    #[test]
    fn test_registration_schema() {
        let registration = ToolRegistration::for_tool(&ToolSpec::new("a.py", "x", "y"));
        let parsed: Value = serde_json::from_str(&registration.to_json_string()).unwrap();

        assert_eq!(parsed["parameters"]["required"], json!(["params_json"]));
        assert_eq!(
            parsed["parameters"]["properties"]["params_json"]["type"],
            "string"
        );
        assert_eq!(parsed["category"], "postiz");
    }
}
