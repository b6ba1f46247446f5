use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;

use crate::cli::{ProfileArgs, SyncArgs, TargetMode};
use crate::config::RemoteConfig;
use crate::formats::Profile;
use crate::github::ContentsClient;
use crate::target::{LocalDocument, TargetDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Updated,
    Unchanged,
    WouldUpdate,
}

/// Fetches and extracts the profile page.
pub fn scrape_profile(
    client: &reqwest::blocking::Client,
    args: &ProfileArgs,
) -> anyhow::Result<Profile> {
    let url = crate::fetch::parse_profile_url(&args.url)?;
    let html = crate::fetch::fetch_profile_html(client, &url).context("fetch profile")?;
    crate::extract::extract_profile(&html).context("extract profile")
}

pub fn run(args: SyncArgs) -> anyhow::Result<SyncOutcome> {
    let http = crate::fetch::build_client()?;

    let profile = scrape_profile(&http, &args.profile)?;
    let literal = crate::literal::render_object_literal(&profile);

    let contents;
    let document: Box<dyn TargetDocument + '_> = match args.target {
        TargetMode::Local => Box::new(LocalDocument::open(Path::new(&args.file))?),
        TargetMode::Remote => {
            let config = RemoteConfig::from_env(&args).context("resolve remote target")?;
            tracing::debug!(?config, "remote target");
            contents = ContentsClient::new(http.clone(), config);
            crate::target::open_remote_or_local(&contents, &args.file, &args.message)?
        }
    };

    let location = document.location();
    let updated = crate::splice::replace_object_literal(document.text(), &literal)
        .with_context(|| format!("update {location}"))?;

    if updated == document.text() {
        tracing::info!(target_file = %location, "no changes detected");
        return Ok(SyncOutcome::Unchanged);
    }

    if args.dry_run {
        tracing::info!(target_file = %location, "changes detected; dry run, not writing");
        return Ok(SyncOutcome::WouldUpdate);
    }

    document.write(&updated)?;
    tracing::info!(target_file = %location, "successfully updated");
    Ok(SyncOutcome::Updated)
}

pub fn extract(args: ProfileArgs) -> anyhow::Result<()> {
    let http = crate::fetch::build_client()?;
    let profile = scrape_profile(&http, &args)?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &profile).context("serialize profile")?;
    stdout.write_all(b"\n").context("write stdout")?;
    Ok(())
}

pub fn render(args: ProfileArgs) -> anyhow::Result<()> {
    let http = crate::fetch::build_client()?;
    let profile = scrape_profile(&http, &args)?;
    let literal = crate::literal::render_object_literal(&profile);

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}{literal};", crate::splice::ASSIGNMENT_PREFIX).context("write stdout")?;
    Ok(())
}
