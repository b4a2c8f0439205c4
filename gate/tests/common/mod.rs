//! Shared helpers for session-gate integration tests: token minting, scripted
//! refreshers, a recording page, and a one-route HTTP stub.

#![allow(dead_code)]

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use session_gate::{
    AuthenticatedSession, GateConfig, GateError, ProtectedPage, Result, TokenRefresher,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const NOW_SECS: i64 = 1_750_000_000;
pub const NOW_MILLIS: i64 = NOW_SECS * 1000;

/// Sign `claims` the way the backend does (HS256); the gate never checks it.
pub fn mint(claims: Value) -> String {
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret"))
        .expect("Failed to sign test token")
}

pub fn valid_token(role: &str) -> String {
    mint(json!({ "sub": "a@x.com", "exp": NOW_SECS + 3600, "role": role }))
}

pub fn expired_token() -> String {
    mint(json!({ "sub": "a@x.com", "exp": NOW_SECS - 60, "role": "USER" }))
}

pub fn config() -> GateConfig {
    GateConfig::builder()
        .base_url("http://localhost:8080")
        .login_url("/login.html")
        .build()
        .expect("Failed to build test config")
}

/// Refresher that replays scripted answers and counts calls.
#[derive(Clone, Default)]
pub struct ScriptedRefresher {
    answers: Arc<Mutex<VecDeque<Result<String>>>>,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRefresher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answer: Result<String>) -> Self {
        let refresher = Self::new();
        refresher.push(answer);
        refresher
    }

    pub fn push(&self, answer: Result<String>) {
        self.answers.lock().unwrap().push_back(answer);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_tokens(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenRefresher for ScriptedRefresher {
    async fn refresh(&self, current_token: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(current_token.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GateError::NetworkError("no scripted answer".into())))
    }
}

/// Page double that records what the gate asked of it.
#[derive(Debug, Default)]
pub struct RecordingPage {
    pub initialized: Vec<AuthenticatedSession>,
    pub alerts: Vec<(String, String)>,
    pub redirects: Vec<String>,
}

impl ProtectedPage for RecordingPage {
    fn initialize(&mut self, session: &AuthenticatedSession) {
        self.initialized.push(session.clone());
    }

    fn show_access_denied(&mut self, title: &str, message: &str) {
        self.alerts.push((title.to_string(), message.to_string()));
    }

    fn redirect(&mut self, url: &str) {
        self.redirects.push(url.to_string());
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Minimal HTTP/1.1 server answering every request with one canned response.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubServer {
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Stub server has no address");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let captured = requests.clone();
        let body = body.to_string();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let captured = captured.clone();
                let body = body.clone();
                tokio::spawn(async move {
                    if let Some(request) = read_request(&mut socket).await {
                        captured.lock().unwrap().push(request);
                    }
                    let response = format!(
                        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        reason_phrase(status),
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

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
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + 4 + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.lines().next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let body = String::from_utf8_lossy(&buf[header_end + 4..]).to_string();

    Some(CapturedRequest { method, path, body })
}
