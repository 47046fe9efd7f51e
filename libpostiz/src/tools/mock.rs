//! Mock uploader, attacher and prompter for testing
//!
//! Each mock counts its calls behind an `Arc<Mutex<_>>` so a clone kept by
//! the test observes what the orchestrator did with the boxed original.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use super::attacher::Attacher;
use super::prompt::Prompter;
use super::uploader::{UploadRequest, Uploader};
use crate::error::{Result, ToolError};

#[derive(Debug, Clone)]
enum UploadBehavior {
    /// Return `<prefix>-<tool name>`
    Succeed(String),
    /// Accept the upload but report no id
    NoId,
    Fail(String),
}

#[derive(Debug, Clone)]
pub struct MockUploader {
    label: String,
    behavior: UploadBehavior,
    /// Tool names that fail regardless of `behavior`
    failing_tools: Vec<String>,
    uploaded: Arc<Mutex<Vec<String>>>,
}

impl MockUploader {
    fn new(label: &str, behavior: UploadBehavior) -> Self {
        Self {
            label: label.to_string(),
            behavior,
            failing_tools: Vec::new(),
            uploaded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Uploads succeed with id `<prefix>-<tool name>`
    pub fn success(label: &str, prefix: &str) -> Self {
        Self::new(label, UploadBehavior::Succeed(prefix.to_string()))
    }

    pub fn no_id(label: &str) -> Self {
        Self::new(label, UploadBehavior::NoId)
    }

    pub fn failure(label: &str, error: &str) -> Self {
        Self::new(label, UploadBehavior::Fail(error.to_string()))
    }

    /// Make uploads of `tool` fail while others follow the normal behavior
    pub fn failing_for(mut self, tool: &str) -> Self {
        self.failing_tools.push(tool.to_string());
        self
    }

    /// Tool names this uploader was called with, in order
    pub fn calls(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.uploaded.lock().unwrap().len()
    }
}

#[async_trait]
impl Uploader for MockUploader {
    fn name(&self) -> &str {
        &self.label
    }

    async fn upload(&self, request: &UploadRequest<'_>) -> Result<Option<String>> {
        self.uploaded
            .lock()
            .unwrap()
            .push(request.tool.name.clone());

        if self.failing_tools.contains(&request.tool.name) {
            return Err(ToolError::Upload(format!("mock failure for {}", request.tool.name)).into());
        }

        match &self.behavior {
            UploadBehavior::Succeed(prefix) => Ok(Some(format!("{}-{}", prefix, request.tool.name))),
            UploadBehavior::NoId => Ok(None),
            UploadBehavior::Fail(error) => Err(ToolError::Upload(error.clone()).into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockAttacher {
    succeeds: bool,
    attached: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAttacher {
    pub fn success() -> Self {
        Self {
            succeeds: true,
            attached: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failure() -> Self {
        Self {
            succeeds: false,
            ..Self::success()
        }
    }

    /// `(agent_id, tool_id)` pairs seen so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.attached.lock().unwrap().clone()
    }
}

#[async_trait]
impl Attacher for MockAttacher {
    async fn attach(&self, agent_id: &str, tool_id: &str) -> Result<()> {
        self.attached
            .lock()
            .unwrap()
            .push((agent_id.to_string(), tool_id.to_string()));

        if self.succeeds {
            Ok(())
        } else {
            Err(ToolError::Attach("mock attach failure".to_string()).into())
        }
    }

    fn command_line(&self, agent_id: &str, tool_id: &str) -> String {
        format!("attach --agent_id {} --tool_id {}", agent_id, tool_id)
    }
}

/// Answers prompts from a fixed list; runs out as empty answers
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    questions: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<&str>) -> Self {
        Self {
            answers: answers.into_iter().map(String::from).collect(),
            questions: Vec::new(),
        }
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    fn next_answer(&mut self, question: &str) -> String {
        self.questions.push(question.to_string());
        self.answers.pop_front().unwrap_or_default()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let answer = self.next_answer(question).trim().to_lowercase();
        Ok(match answer.as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        Ok(self.next_answer(question).trim().to_string())
    }
}
