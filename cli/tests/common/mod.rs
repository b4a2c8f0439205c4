#![allow(dead_code)]

use assert_cmd::Command;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

/// Isolated working area: its own config path (never written) and session file.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// `sgate` with `--config` and `--session-file` pointed into the sandbox.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sgate"));
        cmd.arg("--config")
            .arg(self.config_path())
            .arg("--session-file")
            .arg(self.session_path())
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }

    pub fn write_session(&self, email: &str, token: &str) {
        let record = json!({ "email": email, "token": token, "isLoggedIn": true });
        std::fs::write(self.session_path(), record.to_string()).unwrap();
    }

    pub fn read_session(&self) -> Option<Value> {
        read_json(&self.session_path())
    }
}

fn read_json(path: &Path) -> Option<Value> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn mint(claims: Value) -> String {
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"cli-test-secret")).unwrap()
}

pub fn valid_token(role: &str) -> String {
    mint(json!({ "sub": "a@x.com", "role": role, "exp": now_secs() + 3600 }))
}

pub fn expired_token() -> String {
    mint(json!({ "sub": "a@x.com", "role": "USER", "exp": now_secs() - 60 }))
}

/// One-shot HTTP responder on a background thread. Records the request body.
pub struct OneShotServer {
    pub base_url: String,
    body: Arc<Mutex<Option<String>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl OneShotServer {
    pub fn start(status: u16, response_body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let body = Arc::new(Mutex::new(None));
        let captured = body.clone();

        let handle = thread::spawn(move || {
            let (stream, _) = match listener.accept() {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let mut reader = BufReader::new(stream);

            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    break;
                }
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
            }

            let mut request_body = vec![0u8; content_length];
            let _ = reader.read_exact(&mut request_body);
            *captured.lock().unwrap() = Some(String::from_utf8_lossy(&request_body).into_owned());

            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                response_body.len(),
                response_body
            );
            let mut stream = reader.into_inner();
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        });

        Self {
            base_url,
            body,
            handle: Some(handle),
        }
    }

    /// Wait for the single request and return its body.
    pub fn request_body(mut self) -> Option<String> {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.body.lock().unwrap().clone()
    }
}
