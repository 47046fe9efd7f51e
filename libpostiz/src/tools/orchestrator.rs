//! Sequential upload-then-attach over a list of tools
//!
//! Failures are per tool: a missing source file, a failed upload or a
//! failed attachment is recorded in the [`UploadReport`] and the next tool
//! is processed.

use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{error, info, warn};

use super::attacher::{Attacher, ProcessAttacher};
use super::uploader::{
    FallbackUploader, HttpUploadBackend, InProcessUploader, ProcessUploader, UploadRequest,
    Uploader,
};
use super::{EnvMap, ToolRegistration, ToolSpec};
use crate::config::ToolsConfig;
use crate::error::ToolError;
use crate::http::ReqwestTransport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedTool {
    pub name: String,
    pub id: String,
    /// `None` when no agent was given
    pub attached: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTool {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadReport {
    pub agent_id: Option<String>,
    pub uploaded: Vec<UploadedTool>,
    pub skipped: Vec<SkippedTool>,
}

impl UploadReport {
    pub fn attached_count(&self) -> usize {
        self.uploaded
            .iter()
            .filter(|t| t.attached == Some(true))
            .count()
    }

    /// Human-readable summary; without an agent it lists the attach
    /// commands the user can run later.
    pub fn summary(&self, attacher: &dyn Attacher) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Upload Summary ===");
        let _ = writeln!(out, "Total tools uploaded: {}", self.uploaded.len());

        if !self.uploaded.is_empty() {
            let _ = writeln!(out, "\nUploaded tools:");
            for tool in &self.uploaded {
                let _ = writeln!(out, "- {} (ID: {})", tool.name, tool.id);
            }
        }

        if !self.skipped.is_empty() {
            let _ = writeln!(out, "\nFailed tools:");
            for tool in &self.skipped {
                let _ = writeln!(out, "- {}: {}", tool.name, tool.reason);
            }
        }

        match &self.agent_id {
            Some(agent_id) if self.uploaded.is_empty() => {
                let _ = writeln!(out, "\nNo tools were attached to agent: {}", agent_id);
            }
            Some(agent_id) if self.attached_count() == self.uploaded.len() => {
                let _ = writeln!(out, "\nAll tools have been attached to agent: {}", agent_id);
            }
            Some(agent_id) => {
                let _ = writeln!(
                    out,
                    "\nAttached {} of {} uploaded tools to agent: {}",
                    self.attached_count(),
                    self.uploaded.len(),
                    agent_id
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "\nTo attach these tools to an agent, run the attach script:"
                );
                for tool in &self.uploaded {
                    let _ = writeln!(out, "{}", attacher.command_line("YOUR_AGENT_ID", &tool.id));
                }
            }
        }

        out
    }
}

pub struct UploadOrchestrator {
    source_dir: PathBuf,
    uploader: Box<dyn Uploader>,
    attacher: Box<dyn Attacher>,
}

impl UploadOrchestrator {
    pub fn new(
        source_dir: PathBuf,
        uploader: Box<dyn Uploader>,
        attacher: Box<dyn Attacher>,
    ) -> Self {
        Self {
            source_dir,
            uploader,
            attacher,
        }
    }

    /// Wire the uploaders selected by configuration
    ///
    /// With `upload_endpoint` set, the HTTP backend is tried first and the
    /// upload script is the fallback; otherwise only the script is used.
    pub fn from_config(config: &ToolsConfig, env: EnvMap) -> Self {
        let process = ProcessUploader::new(&config.interpreter, config.upload_script(), env.clone());

        let uploader: Box<dyn Uploader> = match &config.upload_endpoint {
            Some(endpoint) => {
                let token = env.get(&config.upload_token_var).map(String::as_str);
                let backend = HttpUploadBackend::new(ReqwestTransport::new(), endpoint, token);
                Box::new(FallbackUploader::new(
                    Box::new(InProcessUploader::new(backend, &config.debug_level)),
                    Box::new(process),
                ))
            }
            None => Box::new(process),
        };

        let attacher = ProcessAttacher::new(&config.interpreter, config.attach_script(), env);

        Self::new(config.source_dir(), uploader, Box::new(attacher))
    }

    pub fn attacher(&self) -> &dyn Attacher {
        self.attacher.as_ref()
    }

    pub async fn run(&self, tools: &[ToolSpec], agent_id: Option<&str>) -> UploadReport {
        let mut report = UploadReport {
            agent_id: agent_id.map(str::to_string),
            ..Default::default()
        };

        for tool in tools {
            let path = self.source_dir.join(&tool.file);

            if !path.exists() {
                let err = ToolError::SourceNotFound(path.display().to_string());
                error!("{}", err);
                report.skip(tool, err.to_string());
                continue;
            }

            info!("Uploading {}...", tool.name);
            let registration = ToolRegistration::for_tool(tool);
            let request = UploadRequest {
                tool,
                path: &path,
                registration: &registration,
            };

            let tool_id = match self.uploader.upload(&request).await {
                Ok(Some(id)) => id,
                Ok(None) => {
                    warn!("Upload of {} returned no tool ID", tool.name);
                    report.skip(tool, "no tool ID returned".to_string());
                    continue;
                }
                Err(e) => {
                    error!("Error uploading {}: {}", tool.name, e);
                    report.skip(tool, e.to_string());
                    continue;
                }
            };

            let attached = match agent_id {
                Some(agent_id) => {
                    info!("Attaching {} to agent {}...", tool.name, agent_id);
                    match self.attacher.attach(agent_id, &tool_id).await {
                        Ok(()) => {
                            info!("Attached tool {} to agent {}", tool_id, agent_id);
                            Some(true)
                        }
                        Err(e) => {
                            error!(
                                "Error attaching tool {} to agent {}: {}",
                                tool_id, agent_id, e
                            );
                            Some(false)
                        }
                    }
                }
                None => None,
            };

            report.uploaded.push(UploadedTool {
                name: tool.name.clone(),
                id: tool_id,
                attached,
            });
        }

        report
    }
}

impl UploadReport {
    fn skip(&mut self, tool: &ToolSpec, reason: String) {
        self.skipped.push(SkippedTool {
            name: tool.name.clone(),
            reason,
        });
    }
}
