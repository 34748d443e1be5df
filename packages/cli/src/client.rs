use std::path::Path;

use anyhow::{Context, Result, bail};
use common::api::{ErrorResponse, HistoryEntry, SummaryResponse, UploadResponse};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response, multipart};
use reqwest::header::CONTENT_DISPOSITION;

/// A downloaded report.
pub struct Download {
    /// File name suggested by the server, if any.
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Blocking client for the visualizer API.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            bail!("API URL must not be empty");
        }
        let http = Client::builder()
            .user_agent(concat!("chemviz/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn upload(&self, path: &Path) -> Result<UploadResponse> {
        let form = multipart::Form::new()
            .file("file", path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let resp = self
            .http
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .context("Failed to reach the server")?;
        Ok(check(resp)?.json()?)
    }

    /// Latest summary, or `None` when nothing has been uploaded.
    pub fn summary(&self) -> Result<Option<SummaryResponse>> {
        let resp = self
            .http
            .get(self.url("/summary"))
            .send()
            .context("Failed to reach the server")?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        Ok(Some(check(resp)?.json()?))
    }

    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        let resp = self
            .http
            .get(self.url("/history"))
            .send()
            .context("Failed to reach the server")?;
        Ok(check(resp)?.json()?)
    }

    pub fn export_pdf(&self) -> Result<Download> {
        let resp = self
            .http
            .get(self.url("/export-pdf"))
            .send()
            .context("Failed to reach the server")?;
        let resp = check(resp)?;
        let file_name = resp
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_file_name);
        let bytes = resp.bytes()?.to_vec();
        Ok(Download { file_name, bytes })
    }
}

/// Turn non-success responses into errors carrying the server's message.
fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(err) => bail!("{} ({}): {}", err.code, status.as_u16(), err.error),
        Err(_) if text.is_empty() => bail!("Request failed ({status})"),
        Err(_) => bail!("Request failed ({status}): {text}"),
    }
}

/// Extract the plain `filename` parameter from a `Content-Disposition` value.
fn disposition_file_name(value: &str) -> Option<String> {
    value.split(';').map(str::trim).find_map(|param| {
        let name = param.strip_prefix("filename=")?;
        let name = name.trim_matches('"');
        // Never let the server pick a directory.
        let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
        (!matches!(name, "" | "." | "..")).then(|| name.to_string())
    })
}
