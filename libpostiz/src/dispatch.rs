//! Running catalog tools by name
//!
//! An agent platform calls a registered tool with a single `params_json`
//! string. [`call_tool`] looks the tool up in the [`catalog`], decodes the
//! arguments into the matching request type and runs it against a
//! [`PostizClient`]. Failures render as `{success: false, error, details}`
//! through [`error_response`].
//!
//! # Examples
//!
//! ```no_run
//! use libpostiz::{dispatch, Config, PostizClient};
//!
//! # async fn example() -> libpostiz::Result<()> {
//! let client = PostizClient::from_config(&Config::load()?)?;
//! let arguments = dispatch::parse_params_json(r#"{"display": "week", "year": 2025}"#)?;
//! let posts = dispatch::call_tool(&client, "get_posts_1A", arguments).await?;
//! println!("{}", posts);
//! # Ok(())
//! # }
//! ```

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::api::PostizClient;
use crate::catalog::{self, ToolDefinition};
use crate::error::{ApiError, PostizError, Result};
use crate::http::Transport;
use crate::types::{CreatePostRequest, Credentials, PostsQuery};

#[derive(Deserialize)]
struct LoginArgs {
    email: String,
    password: String,
}

/// The catalog entry for `name`, which may carry the registration suffix
pub fn resolve(name: &str) -> Result<ToolDefinition> {
    catalog::find(name).ok_or_else(|| PostizError::UnknownTool(name.to_string()))
}

/// Decode a `params_json` string; blank means no arguments
pub fn parse_params_json(params_json: &str) -> Result<Value> {
    if params_json.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let value: Value = serde_json::from_str(params_json)
        .map_err(|e| PostizError::InvalidInput(format!("params_json is not valid JSON: {}", e)))?;

    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Map::new())),
        _ => Err(PostizError::InvalidInput(
            "params_json must be a JSON object".to_string(),
        )),
    }
}

/// Run the named tool with JSON arguments
///
/// # Errors
///
/// `PostizError::UnknownTool` for names outside the catalog,
/// `PostizError::InvalidInput` when the arguments do not fit the tool, and
/// whatever the API call itself returns.
pub async fn call_tool<T: Transport>(
    client: &PostizClient<T>,
    name: &str,
    arguments: Value,
) -> Result<Value> {
    let tool = resolve(name)?;
    debug!("Calling tool {} with {} argument(s)", tool.name, argument_count(&arguments));

    match tool.name {
        "create_post" => {
            let request: CreatePostRequest = decode(tool.name, arguments)?;
            client.create_post(&request).await
        }
        "get_integrations" => client.get_integrations().await,
        "get_posts" => {
            let query: PostsQuery = decode(tool.name, arguments)?;
            client.get_posts(&query).await
        }
        "get_self" => client.get_self().await,
        "login" => {
            let args: LoginArgs = decode(tool.name, arguments)?;
            client
                .login(&Credentials::new(args.email, args.password))
                .await
        }
        other => Err(PostizError::UnknownTool(other.to_string())),
    }
}

/// `{success: false, error, details}` for a failed call
///
/// `details` is the response body of a rejected request (parsed when it is
/// JSON) and `null` otherwise.
pub fn error_response(error: &PostizError) -> Value {
    let details = match error {
        PostizError::Api(ApiError::Status { status, body, .. }) => json!({
            "status": status,
            "body": serde_json::from_str::<Value>(body)
                .unwrap_or_else(|_| Value::String(body.clone())),
        }),
        _ => Value::Null,
    };

    json!({
        "success": false,
        "error": error.to_string(),
        "details": details,
    })
}

fn decode<A: DeserializeOwned>(tool: &str, arguments: Value) -> Result<A> {
    serde_json::from_value(arguments)
        .map_err(|e| PostizError::InvalidInput(format!("Invalid arguments for {}: {}", tool, e)))
}

fn argument_count(arguments: &Value) -> usize {
    arguments.as_object().map(Map::len).unwrap_or(0)
}
