//! Upload strategies for tool source files

use async_trait::async_trait;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{EnvMap, ToolRegistration, ToolSpec};
use crate::error::{Result, ToolError};
use crate::http::{HttpRequest, Transport};

/// Everything an uploader needs to register one tool
///
/// Only the path is carried; an uploader that needs the source text reads
/// it itself, so a read failure is that uploader's error.
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    pub tool: &'a ToolSpec,
    pub path: &'a Path,
    pub registration: &'a ToolRegistration,
}

/// Registers a tool with the agent platform
///
/// `Ok(None)` means the platform accepted the call but no tool id could be
/// recovered from its answer.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Short label used in log lines
    fn name(&self) -> &str;

    async fn upload(&self, request: &UploadRequest<'_>) -> Result<Option<String>>;
}

/// Result object of the platform's upload function
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub success: Value,
    /// JSON text (or object) that carries `tool_id`
    #[serde(default)]
    pub metadata: Value,
}

impl UploadResult {
    /// `success` may arrive as a boolean or as the string "true"
    pub fn is_success(&self) -> bool {
        match &self.success {
            Value::Bool(b) => *b,
            Value::String(s) => s == "true",
            _ => false,
        }
    }

    pub fn tool_id(&self) -> Option<String> {
        if !self.is_success() {
            return None;
        }

        let metadata = match &self.metadata {
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(parsed) => parsed,
                Err(_) => {
                    warn!("Failed to parse metadata as JSON");
                    return None;
                }
            },
            Value::Object(_) => self.metadata.clone(),
            _ => return None,
        };

        match metadata.get("tool_id")? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// The upload function of the agent platform, called in-process
#[async_trait]
pub trait UploadBackend: Send + Sync {
    async fn upload_tool(
        &self,
        tool_code: &str,
        registration_json: &str,
        debug_level: &str,
    ) -> Result<UploadResult>;
}

/// Uploader that calls an [`UploadBackend`] directly
pub struct InProcessUploader<B: UploadBackend> {
    backend: B,
    debug_level: String,
}

impl<B: UploadBackend> InProcessUploader<B> {
    pub fn new(backend: B, debug_level: &str) -> Self {
        Self {
            backend,
            debug_level: debug_level.to_string(),
        }
    }
}

#[async_trait]
impl<B: UploadBackend> Uploader for InProcessUploader<B> {
    fn name(&self) -> &str {
        "in-process"
    }

    async fn upload(&self, request: &UploadRequest<'_>) -> Result<Option<String>> {
        let source = tokio::fs::read_to_string(request.path)
            .await
            .map_err(|e| ToolError::Read {
                path: request.path.display().to_string(),
                message: e.to_string(),
            })?;

        let result = self
            .backend
            .upload_tool(
                &source,
                &request.registration.to_json_string(),
                &self.debug_level,
            )
            .await?;

        info!(
            "Uploaded {}: success={} metadata={}",
            request.registration.name, result.success, result.metadata
        );

        let tool_id = result.tool_id();
        if let Some(id) = &tool_id {
            info!("Extracted tool ID from metadata: {}", id);
        }
        Ok(tool_id)
    }
}

/// [`UploadBackend`] reached over HTTP
///
/// Posts `{tool_code, tool_registration_info, debug_level}` and expects an
/// [`UploadResult`] JSON object back.
pub struct HttpUploadBackend<T: Transport> {
    transport: T,
    endpoint: String,
    token: Option<SecretString>,
}

impl<T: Transport> HttpUploadBackend<T> {
    pub fn new(transport: T, endpoint: &str, token: Option<&str>) -> Self {
        Self {
            transport,
            endpoint: endpoint.to_string(),
            token: token.map(|t| SecretString::from(t.to_string())),
        }
    }
}

#[async_trait]
impl<T: Transport> UploadBackend for HttpUploadBackend<T> {
    async fn upload_tool(
        &self,
        tool_code: &str,
        registration_json: &str,
        debug_level: &str,
    ) -> Result<UploadResult> {
        let body = json!({
            "tool_code": tool_code,
            "tool_registration_info": registration_json,
            "debug_level": debug_level,
        });

        let mut request = HttpRequest::post(&self.endpoint, body);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token.expose_secret()));
        }

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| ToolError::Upload(e.to_string()))?;

        if !response.is_success() {
            return Err(ToolError::Upload(format!(
                "HTTP status {}: {}",
                response.status, response.body
            ))
            .into());
        }

        let result = serde_json::from_str(&response.body)
            .map_err(|e| ToolError::Upload(format!("invalid upload result: {}", e)))?;
        Ok(result)
    }
}

/// Uploader that runs the platform's upload script
///
/// `interpreter <script> --file <path> --name <name> --description <text>`,
/// with the env-file variables layered over the inherited environment of
/// the child only.
pub struct ProcessUploader {
    interpreter: String,
    script: PathBuf,
    env: EnvMap,
}

impl ProcessUploader {
    pub fn new(interpreter: &str, script: PathBuf, env: EnvMap) -> Self {
        Self {
            interpreter: interpreter.to_string(),
            script,
            env,
        }
    }
}

#[async_trait]
impl Uploader for ProcessUploader {
    fn name(&self) -> &str {
        "process"
    }

    async fn upload(&self, request: &UploadRequest<'_>) -> Result<Option<String>> {
        if !self.script.exists() {
            return Err(ToolError::ScriptNotFound(self.script.display().to_string()).into());
        }

        debug!(
            "Running {} {} for {}",
            self.interpreter,
            self.script.display(),
            request.tool.name
        );

        let output = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg("--file")
            .arg(request.path)
            .arg("--name")
            .arg(&request.tool.name)
            .arg("--description")
            .arg(&request.tool.description)
            .envs(&self.env)
            .output()
            .await
            .map_err(|e| ToolError::Spawn {
                program: self.interpreter.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ToolError::ProcessFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        info!("Uploaded {}: {}", request.tool.name, stdout.trim());
        Ok(parse_tool_id(&stdout))
    }
}

/// First `Tool ID: <id>` found in the script output
pub fn parse_tool_id(output: &str) -> Option<String> {
    static TOOL_ID: OnceLock<Regex> = OnceLock::new();
    let pattern =
        TOOL_ID.get_or_init(|| Regex::new(r"Tool ID:\s*(\S+)").expect("tool id pattern is valid"));

    output
        .lines()
        .filter(|line| line.contains("Tool ID:"))
        .find_map(|line| pattern.captures(line))
        .map(|captures| captures[1].to_string())
}

/// Tries `primary`, and on error makes exactly one attempt with `fallback`
pub struct FallbackUploader {
    primary: Box<dyn Uploader>,
    fallback: Box<dyn Uploader>,
}

impl FallbackUploader {
    pub fn new(primary: Box<dyn Uploader>, fallback: Box<dyn Uploader>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl Uploader for FallbackUploader {
    fn name(&self) -> &str {
        self.primary.name()
    }

    async fn upload(&self, request: &UploadRequest<'_>) -> Result<Option<String>> {
        match self.primary.upload(request).await {
            Ok(tool_id) => Ok(tool_id),
            Err(e) => {
                warn!("Error uploading {}: {}", request.tool.name, e);
                info!("Falling back to {} upload", self.fallback.name());
                self.fallback.upload(request).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockTransport;

    #[test]
    fn test_parse_tool_id() {
        let output = "Uploading...\nDone. Tool ID: tool-abc123 (created)\nTool ID: other";
        assert_eq!(parse_tool_id(output), Some("tool-abc123".to_string()));
    }

    #[test]
    fn test_parse_tool_id_absent() {
        assert_eq!(parse_tool_id("Uploaded successfully"), None);
        assert_eq!(parse_tool_id("Tool ID:   "), None);
    }

    #[test]
    fn test_upload_result_string_success() {
        let result: UploadResult = serde_json::from_str(
            r#"{"success":"true","metadata":"{\"tool_id\":\"t-1\"}"}"#,
        )
        .unwrap();
        assert_eq!(result.tool_id(), Some("t-1".to_string()));
    }

    #[test]
    fn test_upload_result_bool_success_object_metadata() {
        let result: UploadResult =
            serde_json::from_str(r#"{"success":true,"metadata":{"tool_id":42}}"#).unwrap();
        assert_eq!(result.tool_id(), Some("42".to_string()));
    }

    #[test]
    fn test_upload_result_failure_or_bad_metadata() {
        let failed: UploadResult = serde_json::from_str(
            r#"{"success":"false","metadata":"{\"tool_id\":\"t-1\"}"}"#,
        )
        .unwrap();
        assert_eq!(failed.tool_id(), None);

        let garbled: UploadResult =
            serde_json::from_str(r#"{"success":"true","metadata":"not json"}"#).unwrap();
        assert_eq!(garbled.tool_id(), None);

        let empty: UploadResult = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.tool_id(), None);
    }

    #[tokio::test]
    async fn test_http_backend_posts_payload() {
        let transport = MockTransport::ok(r#"{"success":"true","metadata":"{\"tool_id\":\"t-9\"}"}"#);
        let backend =
            HttpUploadBackend::new(transport.clone(), "https://agents.local/upload", Some("pw"));

        let result = backend
            .upload_tool("print('hi')", r#"{"name":"x_1A"}"#, "INFO")
            .await
            .unwrap();
        assert_eq!(result.tool_id(), Some("t-9".to_string()));

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://agents.local/upload");
        assert_eq!(request.header_value("Authorization"), Some("Bearer pw"));
        let body = request.body.unwrap();
        assert_eq!(body["tool_code"], "print('hi')");
        assert_eq!(body["debug_level"], "INFO");
    }

    #[tokio::test]
    async fn test_http_backend_status_error() {
        let backend = HttpUploadBackend::new(
            MockTransport::status(502, "bad gateway"),
            "https://agents.local/upload",
            None,
        );
        let err = backend.upload_tool("", "{}", "INFO").await.unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_process_uploader_missing_script() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let uploader = ProcessUploader::new(
            "python3",
            temp_dir.path().join("upload_tool_1A.py"),
            EnvMap::new(),
        );

        let spec = ToolSpec::new("a.py", "a", "A");
        let registration = ToolRegistration::for_tool(&spec);
        let path = temp_dir.path().join("a.py");
        let request = UploadRequest {
            tool: &spec,
            path: &path,
            registration: &registration,
        };

        let err = uploader.upload(&request).await.unwrap_err();
        assert!(matches!(
            err,
            crate::PostizError::Tool(ToolError::ScriptNotFound(_))
        ));
    }
}
