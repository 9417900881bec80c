//! Shared helpers for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pr_watcher::github::PullRequestHead;
use pr_watcher::{
    CiState, NotificationChannel, PrKey, SendResult, StatusChangeEvent, StatusClient, StatusError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// A request seen by the mock server
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Canned response for one path
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
}

impl CannedResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Throwaway HTTP/1.1 responder on 127.0.0.1:0
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockServer {
    /// Serve `routes` keyed by exact path; anything else gets `fallback`
    pub async fn start(routes: Vec<(&str, CannedResponse)>, fallback: CannedResponse) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes: HashMap<String, CannedResponse> = routes
            .into_iter()
            .map(|(path, resp)| (path.to_string(), resp))
            .collect();

        let captured = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let Some(request) = read_request(&mut socket).await else {
                    continue;
                };
                let response = routes
                    .get(&request.path)
                    .cloned()
                    .unwrap_or_else(|| fallback.clone());
                captured.lock().unwrap().push(request);

                let raw = format!(
                    "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.status,
                    response.body.len(),
                    response.body
                );
                let _ = socket.write_all(raw.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    /// Always answer with the same response
    pub async fn respond_with(status: u16, body: &str) -> Self {
        Self::start(Vec::new(), CannedResponse::new(status, body)).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    })
}

/// In-memory status client keyed by PR number
pub struct MockStatusClient {
    states: Mutex<HashMap<u64, String>>,
    failing: Mutex<Vec<u64>>,
    fetches: AtomicUsize,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl MockStatusClient {
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            failing: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            cancel_after: None,
        }
    }

    /// Cancel `token` once `n` head fetches have happened
    pub fn cancel_after(mut self, n: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((n, token));
        self
    }

    pub fn set_state(&self, number: u64, state: &str) {
        self.states
            .lock()
            .unwrap()
            .insert(number, state.to_string());
    }

    pub fn fail(&self, number: u64) {
        self.failing.lock().unwrap().push(number);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusClient for MockStatusClient {
    async fn fetch_head(&self, pr: &PrKey) -> Result<PullRequestHead, StatusError> {
        let count = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((n, token)) = &self.cancel_after {
            if count >= *n {
                token.cancel();
            }
        }

        if self.failing.lock().unwrap().contains(&pr.number) {
            return Err(StatusError::Api {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }

        Ok(PullRequestHead {
            sha: format!("sha-{}", pr.number),
            title: format!("PR {}", pr.number),
        })
    }

    async fn fetch_aggregate_status(
        &self,
        _owner: &str,
        _repo: &str,
        sha: &str,
    ) -> Result<CiState, StatusError> {
        let number: u64 = sha.trim_start_matches("sha-").parse().unwrap_or(0);
        let state = self
            .states
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .unwrap_or_default();
        Ok(CiState::parse(&state))
    }
}

/// Records every event it is asked to deliver
pub struct RecordingChannel {
    events: Mutex<Vec<StatusChangeEvent>>,
    outcome: SendResult,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::with_outcome(SendResult::Sent)
    }

    pub fn with_outcome(outcome: SendResult) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            outcome,
        }
    }

    pub fn events(&self) -> Vec<StatusChangeEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, event: &StatusChangeEvent) -> anyhow::Result<SendResult> {
        self.events.lock().unwrap().push(event.clone());
        Ok(self.outcome.clone())
    }
}
