use anyhow::Context as _;
use reqwest::header::ACCEPT;
use url::Url;

pub const USER_AGENT_VALUE: &str = concat!("sessionize-sync/", env!("CARGO_PKG_VERSION"));

pub fn build_client() -> anyhow::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT_VALUE)
        .build()
        .context("build http client")
}

pub fn parse_profile_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw).context("parse --url")?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("--url must be http/https: {url}");
    }
    Ok(url)
}

/// GETs the profile page. Any transport error or non-2xx status is fatal.
pub fn fetch_profile_html(client: &reqwest::blocking::Client, url: &Url) -> anyhow::Result<String> {
    tracing::info!(%url, "fetching profile");

    let response = client
        .get(url.clone())
        .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
        .send()
        .with_context(|| format!("GET {url}"))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("profile fetch failed ({status}): {url}");
    }

    response.text().context("read profile response body")
}
