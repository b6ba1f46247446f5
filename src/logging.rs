use anyhow::Context as _;

// html5ever and selectors report recoverable markup errors through `log`;
// the profile page produces plenty of them.
const DEFAULT_DIRECTIVES: &str = "info,html5ever=error,selectors=error";

/// Installs the stderr subscriber. A valid `RUST_LOG` replaces the default
/// filter; an unset or unparsable one falls back to it.
pub fn init() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(DEFAULT_DIRECTIVES))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
