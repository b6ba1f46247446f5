use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_PROFILE_URL: &str = "https://sessionize.com/piotr-rogala/";
pub const DEFAULT_TARGET_FILE: &str = "brand.html";

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape the profile and update the embedded `sessionizeData` object.
    Sync(SyncArgs),
    /// Scrape the profile and print the extracted record as JSON.
    Extract(ProfileArgs),
    /// Scrape the profile and print the rendered object literal.
    Render(ProfileArgs),
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Speaker profile page (must be http/https).
    #[arg(long, default_value = DEFAULT_PROFILE_URL)]
    pub url: String,
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Target file path (local path, or path inside the remote repository).
    #[arg(long, default_value = DEFAULT_TARGET_FILE)]
    pub file: String,

    /// Where the target file is read from and written to.
    #[arg(long, value_enum, default_value_t = TargetMode::Local)]
    pub target: TargetMode,

    /// Remote repository as `owner/repo` (default: $GITHUB_REPOSITORY).
    #[arg(long)]
    pub repo: Option<String>,

    /// Remote branch (default: $SESSIONIZE_SYNC_BRANCH or `gh-pages`).
    #[arg(long)]
    pub branch: Option<String>,

    /// Content API base URL (default: $SESSIONIZE_SYNC_API_URL or GitHub).
    #[arg(long)]
    pub api_url: Option<String>,

    /// Commit message used for remote writes.
    #[arg(long, default_value = "Update Sessionize profile data")]
    pub message: String,

    /// Report whether the target would change without writing it.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetMode {
    Local,
    Remote,
}
