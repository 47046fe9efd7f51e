//! Postiz API client
//!
//! One method per remote operation. Each builds a single request, sends it
//! through the configured [`Transport`] and returns the parsed JSON body
//! unchanged on a 2xx response. There is no retry, pagination or caching.
//!
//! # Examples
//!
//! ```no_run
//! use libpostiz::{Config, CreatePostRequest, PostizClient};
//!
//! # async fn example() -> libpostiz::Result<()> {
//! let config = Config::load()?;
//! let client = PostizClient::from_config(&config)?;
//!
//! let integrations = client.get_integrations().await?;
//! println!("{}", integrations);
//!
//! let created = client
//!     .create_post(&CreatePostRequest::new("Hello from the terminal", "integration-id"))
//!     .await?;
//! println!("{}", created);
//! # Ok(())
//! # }
//! ```

use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, ReqwestTransport, Transport};
use crate::settings::{AuthScheme, Settings};
use crate::types::{CreatePostRequest, Credentials, PostBatch, PostsQuery};

pub struct PostizClient<T: Transport = ReqwestTransport> {
    transport: T,
    settings: Settings,
    auth_scheme: AuthScheme,
}

impl PostizClient<ReqwestTransport> {
    /// Create a client for authenticated operations from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            ReqwestTransport::new(),
            config.settings()?,
            config.api.auth_scheme,
        ))
    }

    /// Create a client that only needs the base URL (login)
    pub fn anonymous(config: &Config) -> Self {
        Self::new(
            ReqwestTransport::new(),
            config.anonymous_settings(),
            config.api.auth_scheme,
        )
    }
}

impl<T: Transport> PostizClient<T> {
    pub fn new(transport: T, settings: Settings, auth_scheme: AuthScheme) -> Self {
        Self {
            transport,
            settings,
            auth_scheme,
        }
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &Credentials) -> Result<Value> {
        let url = self.settings.login_url();
        debug!(
            "Making login request to {} with {}",
            url,
            credentials.masked_body()
        );

        let request = HttpRequest::post(url, credentials.to_body());
        let data = self.send("Login failed", request).await?;
        info!("Login successful");
        Ok(data)
    }

    /// `GET /user/self`
    pub async fn get_self(&self) -> Result<Value> {
        let request = self.authorized(HttpRequest::get(self.settings.user_self_url()));
        self.send("Failed to get user info", request).await
    }

    /// `GET /public/v1/integrations`
    pub async fn get_integrations(&self) -> Result<Value> {
        let request =
            self.authorized(HttpRequest::get(self.settings.public_url("integrations")));
        self.send("Failed to get integrations", request).await
    }

    /// `GET /public/v1/posts`
    pub async fn get_posts(&self, query: &PostsQuery) -> Result<Value> {
        let request = self
            .authorized(HttpRequest::get(self.settings.public_url("posts")))
            .query(query.to_params());
        debug!("Params: {:?}", request.query);
        self.send("Failed to get posts", request).await
    }

    /// `POST /public/v1/posts`
    ///
    /// # Errors
    ///
    /// Returns `PostizError::InvalidInput` before any request is made if the
    /// content is too short or the post type is unknown.
    pub async fn create_post(&self, request: &CreatePostRequest) -> Result<Value> {
        let batch = PostBatch::from_request(request)?;
        let body = serde_json::to_value(&batch).map_err(|e| ApiError::Decode {
            operation: "Failed to create post".to_string(),
            message: e.to_string(),
        })?;
        debug!("Post data: {}", body);

        let http = self.authorized(HttpRequest::post(self.settings.public_url("posts"), body));
        self.send("Failed to create post", http).await
    }

    fn authorized(&self, request: HttpRequest) -> HttpRequest {
        request.header("Authorization", self.settings.authorization(self.auth_scheme))
    }

    async fn send(&self, operation: &str, request: HttpRequest) -> Result<Value> {
        debug!("Making request: {} {}", request.method, request.url);

        let response = self.transport.execute(request).await.map_err(|e| {
            ApiError::Network {
                operation: operation.to_string(),
                message: e.to_string(),
            }
        })?;

        info!("Response Status Code: {}", response.status);

        if !response.is_success() {
            return Err(ApiError::Status {
                operation: operation.to_string(),
                status: response.status,
                body: response.body,
            }
            .into());
        }

        let data: Value = serde_json::from_str(&response.body).map_err(|e| ApiError::Decode {
            operation: operation.to_string(),
            message: e.to_string(),
        })?;
        debug!("Response Data: {}", data);
        Ok(data)
    }
}
