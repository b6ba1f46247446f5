use anyhow::Context as _;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::RemoteConfig;

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const MEDIA_TYPE: &str = "application/vnd.github+json";

/// A file read from the repository contents endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub path: String,
    /// Blob sha; the write must echo it back.
    pub sha: String,
    pub text: String,
}

/// The remote file was found but its payload cannot be used, e.g. files
/// over 1 MB come back with encoding `none`.
#[derive(Debug)]
pub struct UnusableContents(pub String);

impl std::fmt::Display for UnusableContents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unusable remote contents: {}", self.0)
    }
}

impl std::error::Error for UnusableContents {}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

pub struct ContentsClient {
    client: reqwest::blocking::Client,
    config: RemoteConfig,
}

impl ContentsClient {
    pub fn new(client: reqwest::blocking::Client, config: RemoteConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    pub fn contents_url(&self, path: &str) -> anyhow::Result<Url> {
        contents_endpoint(&self.config, path)
    }

    pub fn get_file(&self, path: &str) -> anyhow::Result<RemoteFile> {
        let mut url = self.contents_url(path)?;
        url.query_pairs_mut().append_pair("ref", &self.config.branch);

        let mut req = self
            .client
            .get(url.clone())
            .header(ACCEPT, MEDIA_TYPE)
            .header(API_VERSION_HEADER, API_VERSION);
        if let Some(token) = &self.config.token {
            req = req.bearer_auth(token);
        }

        let response = req.send().with_context(|| format!("GET {url}"))?;
        let status = response.status();
        let raw = response.text().context("read contents response body")?;
        if !status.is_success() {
            let message = parse_error_message(&raw).unwrap_or(raw);
            anyhow::bail!("contents read failed ({status}): {message}");
        }

        let body: ContentsResponse =
            serde_json::from_str(&raw).context("parse contents response")?;
        if let Some(encoding) = body.encoding.as_deref()
            && encoding != "base64"
        {
            return Err(UnusableContents(format!("unsupported encoding {encoding:?}")).into());
        }

        let text = decode_content(&body.content)
            .map_err(|err| UnusableContents(format!("{err:#}")))?;
        Ok(RemoteFile {
            path: path.to_owned(),
            sha: body.sha,
            text,
        })
    }

    /// Commits `text` over `file` on the configured branch.
    pub fn put_file(&self, file: &RemoteFile, text: &str, message: &str) -> anyhow::Result<()> {
        let url = self.contents_url(&file.path)?;
        let body = UpdateRequest {
            message,
            content: STANDARD.encode(text.as_bytes()),
            sha: &file.sha,
            branch: &self.config.branch,
        };

        let mut req = self
            .client
            .put(url.clone())
            .header(ACCEPT, MEDIA_TYPE)
            .header(API_VERSION_HEADER, API_VERSION)
            .json(&body);
        if let Some(token) = &self.config.token {
            req = req.bearer_auth(token);
        }

        let response = req.send().with_context(|| format!("PUT {url}"))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let raw = response.text().unwrap_or_default();
        let message = parse_error_message(&raw).unwrap_or(raw);
        anyhow::bail!("contents write failed ({status}): {message}");
    }
}

pub fn contents_endpoint(config: &RemoteConfig, path: &str) -> anyhow::Result<Url> {
    let mut url = config.api_url.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("api url cannot be a base: {}", config.api_url))?;
        segments
            .pop_if_empty()
            .extend(["repos", config.owner.as_str(), config.repo.as_str(), "contents"]);
        for segment in path.split('/') {
            if segment.is_empty() || segment == "." {
                continue;
            }
            if segment == ".." {
                anyhow::bail!("target path must not contain '..': {path}");
            }
            segments.push(segment);
        }
    }
    Ok(url)
}

// The API wraps base64 payloads at 60 columns.
fn decode_content(content: &str) -> anyhow::Result<String> {
    let compact = content
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect::<String>();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .context("decode base64 contents")?;
    String::from_utf8(bytes).context("remote file is not valid UTF-8")
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    let message = value.get("message")?.as_str()?.to_owned();
    Some(message)
}
