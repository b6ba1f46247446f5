use anyhow::Context as _;
use url::Url;

use crate::cli::SyncArgs;

pub const DEFAULT_REPOSITORY: &str = "piotr-rogala/piotr-rogala.github.io";
pub const DEFAULT_BRANCH: &str = "gh-pages";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Remote repository settings, resolved from flags first and the
/// environment second.
#[derive(Clone)]
pub struct RemoteConfig {
    pub api_url: Url,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub token: Option<String>,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_url", &self.api_url.as_str())
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RemoteConfig {
    pub fn from_env(args: &SyncArgs) -> anyhow::Result<Self> {
        Self::resolve(args, non_empty_env)
    }

    /// Flag, then `lookup(VAR)`, then the built-in default.
    pub fn resolve(
        args: &SyncArgs,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let repository = args
            .repo
            .clone()
            .or_else(|| lookup("GITHUB_REPOSITORY"))
            .unwrap_or_else(|| DEFAULT_REPOSITORY.to_owned());
        let (owner, repo) = parse_repository(&repository)
            .with_context(|| format!("invalid repository: {repository:?}"))?;

        let branch = args
            .branch
            .clone()
            .or_else(|| lookup("SESSIONIZE_SYNC_BRANCH"))
            .unwrap_or_else(|| DEFAULT_BRANCH.to_owned());

        let api_url = args
            .api_url
            .clone()
            .or_else(|| lookup("SESSIONIZE_SYNC_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_url = Url::parse(&api_url).with_context(|| format!("parse api url: {api_url}"))?;
        if api_url.scheme() != "http" && api_url.scheme() != "https" {
            anyhow::bail!("api url must be http/https: {api_url}");
        }

        Ok(Self {
            api_url,
            owner,
            repo,
            branch,
            token: lookup("GITHUB_TOKEN"),
        })
    }
}

pub fn parse_repository(raw: &str) -> anyhow::Result<(String, String)> {
    let Some((owner, repo)) = raw.trim().split_once('/') else {
        anyhow::bail!("expected `owner/repo`");
    };
    let (owner, repo) = (owner.trim(), repo.trim());
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        anyhow::bail!("expected `owner/repo`");
    }
    Ok((owner.to_owned(), repo.to_owned()))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
