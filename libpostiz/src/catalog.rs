//! Descriptions of the API operations as callable tools
//!
//! Each definition carries a JSON schema of its arguments, suitable for
//! listing to an agent platform or a human.

use serde::Serialize;
use serde_json::{json, Value};

use crate::tools::TOOL_NAME_SUFFIX;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    /// Whether the call needs the API key
    #[serde(skip)]
    pub authenticated: bool,
}

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "create_post",
            description: "Create a new social media post on Postiz platform with optional media attachments and scheduling",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "content": {
                        "type": "string",
                        "description": "Text content of the post (minimum 6 characters)"
                    },
                    "integration_id": {
                        "type": "string",
                        "description": "Integration ID to post to"
                    },
                    "post_type": {
                        "type": "string",
                        "description": "Type of post (\"draft\", \"schedule\", or \"now\")",
                        "default": "now"
                    },
                    "publish_date": {
                        "type": "string",
                        "description": "Optional ISO format date (e.g. \"2025-01-04T19:46:00.000Z\")"
                    },
                    "media_urls": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Optional list of media URLs to attach"
                    },
                    "short_link": {
                        "type": "boolean",
                        "description": "Whether to create a short link",
                        "default": false
                    }
                },
                "required": ["content", "integration_id"]
            }),
            authenticated: true,
        },
        ToolDefinition {
            name: "get_integrations",
            description: "Get list of available integrations from Postiz",
            input_schema: json!({"type": "object", "properties": {}}),
            authenticated: true,
        },
        ToolDefinition {
            name: "get_posts",
            description: "Retrieve scheduled and published posts from Postiz with flexible date filtering (daily, weekly, or monthly view)",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "display": {
                        "type": "string",
                        "description": "Display mode (\"month\", \"week\", \"day\")",
                        "default": "month"
                    },
                    "year": {"type": "integer", "description": "Year to filter by"},
                    "month": {"type": "integer", "description": "Month number (1-12)"},
                    "week": {"type": "integer", "description": "Week number (1-52)"},
                    "day": {"type": "integer", "description": "Day to filter by"},
                    "newest_first": {
                        "type": "boolean",
                        "description": "Sort newest first (true) or oldest first (false)",
                        "default": true
                    }
                },
                "required": ["year"]
            }),
            authenticated: true,
        },
        ToolDefinition {
            name: "get_self",
            description: "Get user information from Postiz",
            input_schema: json!({"type": "object", "properties": {}}),
            authenticated: true,
        },
        ToolDefinition {
            name: "login",
            description: "Login to Postiz API",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "email": {"type": "string", "description": "User email"},
                    "password": {"type": "string", "description": "User password"}
                },
                "required": ["email", "password"]
            }),
            authenticated: false,
        },
    ]
}

/// Look up a definition by name, with or without the registration suffix
pub fn find(name: &str) -> Option<ToolDefinition> {
    let name = name.strip_suffix(TOOL_NAME_SUFFIX).unwrap_or(name);
    definitions().into_iter().find(|d| d.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::default_tools;

    #[test]
    fn test_catalog_matches_upload_list() {
        let catalog: Vec<&str> = definitions().iter().map(|d| d.name).collect();
        let uploads: Vec<String> = default_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(catalog, uploads);
    }

    #[test]
    fn test_find() {
        let create = find("create_post").unwrap();
        assert_eq!(
            create.input_schema["required"],
            json!(["content", "integration_id"])
        );
        assert!(find("delete_post").is_none());
    }

    #[test]
    fn test_find_accepts_registered_name() {
        assert_eq!(find("get_posts_1A").unwrap().name, "get_posts");
        assert!(!find("login_1A").unwrap().authenticated);
        assert!(find("get_self").unwrap().authenticated);
    }

    #[test]
    fn test_serializes_input_schema_key() {
        let value = serde_json::to_value(find("login").unwrap()).unwrap();
        assert!(value.get("inputSchema").is_some());
        assert!(value.get("input_schema").is_none());
    }
}
