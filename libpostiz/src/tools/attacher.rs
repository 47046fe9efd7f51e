//! Attaching uploaded tools to an agent

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

use super::EnvMap;
use crate::error::{Result, ToolError};

#[async_trait]
pub trait Attacher: Send + Sync {
    async fn attach(&self, agent_id: &str, tool_id: &str) -> Result<()>;

    /// Shell command a user can run to perform the same attachment later
    fn command_line(&self, agent_id: &str, tool_id: &str) -> String;
}

/// Runs `interpreter <script> --agent_id <agent> --tool_id <tool>`
pub struct ProcessAttacher {
    interpreter: String,
    script: PathBuf,
    env: EnvMap,
}

impl ProcessAttacher {
    pub fn new(interpreter: &str, script: PathBuf, env: EnvMap) -> Self {
        Self {
            interpreter: interpreter.to_string(),
            script,
            env,
        }
    }
}

#[async_trait]
impl Attacher for ProcessAttacher {
    async fn attach(&self, agent_id: &str, tool_id: &str) -> Result<()> {
        if !self.script.exists() {
            return Err(ToolError::ScriptNotFound(self.script.display().to_string()).into());
        }

        debug!("Attaching {} to {} via {}", tool_id, agent_id, self.script.display());

        let output = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg("--agent_id")
            .arg(agent_id)
            .arg("--tool_id")
            .arg(tool_id)
            .envs(&self.env)
            .output()
            .await
            .map_err(|e| ToolError::Spawn {
                program: self.interpreter.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ToolError::Attach(format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))
            .into());
        }

        debug!("{}", String::from_utf8_lossy(&output.stdout).trim());
        Ok(())
    }

    fn command_line(&self, agent_id: &str, tool_id: &str) -> String {
        format!(
            "{} {} --agent_id {} --tool_id {}",
            self.interpreter,
            shell_escape(&self.script.display().to_string()),
            agent_id,
            tool_id
        )
    }
}

/// Backslash-escape spaces so the hint can be pasted into a shell
fn shell_escape(text: &str) -> String {
    text.replace(' ', "\\ ")
}
