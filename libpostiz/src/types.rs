//! Core request types for the Postiz API

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{PostizError, Result};

/// Minimum number of characters the service accepts for post content
pub const MIN_CONTENT_CHARS: usize = 6;

/// How a post batch is published
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Draft,
    Schedule,
    Now,
}

impl FromStr for PostType {
    type Err = PostizError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(PostType::Draft),
            "schedule" => Ok(PostType::Schedule),
            "now" => Ok(PostType::Now),
            _ => Err(PostizError::InvalidInput(
                r#"post_type must be one of: "draft", "schedule", "now""#.to_string(),
            )),
        }
    }
}

impl std::fmt::Display for PostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostType::Draft => write!(f, "draft"),
            PostType::Schedule => write!(f, "schedule"),
            PostType::Now => write!(f, "now"),
        }
    }
}

/// One entry of a post's `value` sequence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PostValue {
    Content { content: String },
    Media { media: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntegrationRef {
    pub id: String,
}

/// A post addressed to a single integration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub integration: IntegrationRef,
    pub value: Vec<PostValue>,
}

/// Body of `POST /public/v1/posts`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostBatch {
    #[serde(rename = "type")]
    pub post_type: PostType,
    #[serde(rename = "shortLink")]
    pub short_link: bool,
    pub date: String,
    pub posts: Vec<Post>,
}

/// Caller-facing parameters for creating a post
///
/// Deserializes from the `create_post` tool arguments; only `content` and
/// `integration_id` are required.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub integration_id: String,
    /// One of "draft", "schedule", "now"; checked when the batch is built
    #[serde(default = "default_post_type")]
    pub post_type: String,
    /// ISO-8601 timestamp; the current instant when `None`
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub short_link: bool,
}

fn default_post_type() -> String {
    PostType::Now.to_string()
}

impl CreatePostRequest {
    pub fn new(content: impl Into<String>, integration_id: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            integration_id: integration_id.into(),
            post_type: default_post_type(),
            publish_date: None,
            media_urls: Vec::new(),
            short_link: false,
        }
    }
}

impl PostBatch {
    /// Validate a request and build the batch sent to the service
    ///
    /// # Errors
    ///
    /// Returns `PostizError::InvalidInput` if the content is shorter than
    /// [`MIN_CONTENT_CHARS`] characters or the post type is unknown.
    pub fn from_request(request: &CreatePostRequest) -> Result<Self> {
        if request.content.chars().count() < MIN_CONTENT_CHARS {
            return Err(PostizError::InvalidInput(format!(
                "Content must be at least {} characters long",
                MIN_CONTENT_CHARS
            )));
        }

        let post_type: PostType = request.post_type.parse()?;

        let mut value = vec![PostValue::Content {
            content: request.content.clone(),
        }];
        value.extend(
            request
                .media_urls
                .iter()
                .map(|url| PostValue::Media { media: url.clone() }),
        );

        let date = request.publish_date.clone().unwrap_or_else(current_timestamp);

        Ok(Self {
            post_type,
            short_link: request.short_link,
            date,
            posts: vec![Post {
                integration: IntegrationRef {
                    id: request.integration_id.clone(),
                },
                value,
            }],
        })
    }
}

/// Current UTC instant as `YYYY-MM-DDTHH:MM:SS.sssZ`
pub fn current_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Calendar granularity of a posts listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    Day,
    Week,
    #[default]
    Month,
}

impl Display {
    pub fn as_str(&self) -> &'static str {
        match self {
            Display::Day => "day",
            Display::Week => "week",
            Display::Month => "month",
        }
    }
}

impl FromStr for Display {
    type Err = PostizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "day" => Ok(Display::Day),
            "week" => Ok(Display::Week),
            "month" => Ok(Display::Month),
            _ => Err(PostizError::InvalidInput(format!(
                r#"display must be one of: "day", "week", "month" (got '{}')"#,
                s
            ))),
        }
    }
}

impl std::fmt::Display for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filter for `GET /public/v1/posts`
///
/// The numeric fields are not range-checked; the service decides what an
/// out-of-range week or day means.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PostsQuery {
    pub display: Display,
    pub year: i64,
    pub month: i64,
    pub week: i64,
    pub day: i64,
    pub newest_first: bool,
}

impl Default for PostsQuery {
    fn default() -> Self {
        use chrono::Datelike;

        Self {
            display: Display::Month,
            year: i64::from(chrono::Utc::now().year()),
            month: 1,
            week: 1,
            day: 1,
            newest_first: true,
        }
    }
}

impl PostsQuery {
    pub fn sort(&self) -> &'static str {
        if self.newest_first {
            "desc"
        } else {
            "asc"
        }
    }

    /// Query parameters in the order the service documents them
    pub fn to_params(&self) -> Vec<(String, String)> {
        vec![
            ("display".to_string(), self.display.to_string()),
            ("year".to_string(), self.year.to_string()),
            ("month".to_string(), self.month.to_string()),
            ("week".to_string(), self.week.to_string()),
            ("day".to_string(), self.day.to_string()),
            ("sort".to_string(), self.sort().to_string()),
        ]
    }
}

/// Email and password for `POST /auth/login`; never persisted
pub struct Credentials {
    pub email: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub(crate) fn to_body(&self) -> serde_json::Value {
        serde_json::json!({
            "email": self.email,
            "password": self.password.expose_secret(),
        })
    }

    /// The login body with the password masked, for logging
    pub fn masked_body(&self) -> serde_json::Value {
        serde_json::json!({
            "email": self.email,
            "password": "*****",
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"*****")
            .finish()
    }
}
