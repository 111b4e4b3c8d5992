// API client module: a small blocking HTTP client for the library
// backend, plus the `Backend` trait the rest of the client is written
// against so tests can substitute an in-memory fake.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClientError;
use crate::model::ApiBook;

/// Reply from `POST /api/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginReply {
    pub success: bool,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply from `POST /api/execute`: the wrapped exit state of a backend
/// CLI command.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecReply {
    pub success: bool,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ExecRequest<'a> {
    command: &'a str,
    args: &'a [String],
}

/// The three calls the backend offers the client.
pub trait Backend {
    fn login(&self, username: &str, password: &str) -> Result<LoginReply, ClientError>;

    /// The structured books endpoint. Any error here is a signal to
    /// take the CLI fallback path, never a user-facing failure.
    fn books(&self) -> Result<Vec<ApiBook>, ClientError>;

    fn execute(&self, command: &str, args: &[String]) -> Result<ExecReply, ClientError>;
}

/// Blocking HTTP implementation of [`Backend`] holding a reqwest client
/// and the base URL of the backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Configure from the environment variable `LIBSHELF_API_URL`, or
    /// fall back to `http://localhost:3001`.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("LIBSHELF_API_URL").unwrap_or_else(|_| "http://localhost:3001".into());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn connectivity(err: reqwest::Error) -> ClientError {
    ClientError::Connectivity(err.to_string())
}

impl Backend for ApiClient {
    /// The login endpoint reports bad credentials in the body, not the
    /// HTTP status, so the reply is decoded regardless of status.
    fn login(&self, username: &str, password: &str) -> Result<LoginReply, ClientError> {
        let res = self
            .client
            .post(self.url("/api/login"))
            .json(&LoginRequest { username, password })
            .send()
            .map_err(connectivity)?;
        res.json().map_err(connectivity)
    }

    fn books(&self) -> Result<Vec<ApiBook>, ClientError> {
        let res = self
            .client
            .get(self.url("/api/books"))
            .send()
            .map_err(connectivity)?;
        if !res.status().is_success() {
            debug!(status = %res.status(), "books endpoint unavailable");
            return Err(ClientError::Connectivity(format!(
                "books endpoint returned {}",
                res.status()
            )));
        }
        res.json().map_err(connectivity)
    }

    fn execute(&self, command: &str, args: &[String]) -> Result<ExecReply, ClientError> {
        debug!(command, ?args, "executing backend command");
        let res = self
            .client
            .post(self.url("/api/execute"))
            .json(&ExecRequest { command, args })
            .send()
            .map_err(connectivity)?;
        res.json().map_err(connectivity)
    }
}
