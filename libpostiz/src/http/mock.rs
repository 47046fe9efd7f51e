//! Mock transport implementation for testing
//!
//! Records every request and answers from a queue of scripted responses.
//! Clones share their state, so a test can hand one clone to the client and
//! keep another to inspect what was sent.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Debug, Clone)]
enum Fallback {
    /// Answer with this response once the queue is empty
    Respond(HttpResponse),
    /// Answer with the request body as the response body
    Echo,
    /// Fail as if the network were unreachable
    Unreachable(String),
}

/// Mock transport for testing
#[derive(Debug, Clone)]
pub struct MockTransport {
    queue: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    fallback: Fallback,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    fn with_fallback(fallback: Fallback) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            fallback,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answers 200 with the given JSON body
    pub fn ok(body: &str) -> Self {
        Self::with_fallback(Fallback::Respond(HttpResponse::new(200, body)))
    }

    /// Always answers with the given status and body
    pub fn status(status: u16, body: &str) -> Self {
        Self::with_fallback(Fallback::Respond(HttpResponse::new(status, body)))
    }

    /// Answers 200 with the request's JSON body
    pub fn echo() -> Self {
        Self::with_fallback(Fallback::Echo)
    }

    /// Every request fails before a response is received
    pub fn unreachable(message: &str) -> Self {
        Self::with_fallback(Fallback::Unreachable(message.to_string()))
    }

    /// Queue a response to be returned before the fallback behavior
    pub fn push_response(&self, status: u16, body: &str) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queue a transport failure
    pub fn push_failure(&self, message: &str) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Err(TransportError(message.to_string())));
    }

    /// All requests sent so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(scripted) = self.queue.lock().unwrap().pop_front() {
            return scripted;
        }

        match &self.fallback {
            Fallback::Respond(response) => Ok(response.clone()),
            Fallback::Echo => {
                let body = request
                    .body
                    .as_ref()
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "null".to_string());
                Ok(HttpResponse::new(200, body))
            }
            Fallback::Unreachable(message) => Err(TransportError(message.clone())),
        }
    }
}
