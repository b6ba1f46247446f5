use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::github::{ContentsClient, RemoteFile, UnusableContents};

/// The file holding the `sessionizeData` object, wherever it was read from.
pub trait TargetDocument {
    fn location(&self) -> String;
    fn text(&self) -> &str;
    fn write(&self, updated: &str) -> anyhow::Result<()>;
}

#[derive(Debug)]
pub struct LocalDocument {
    path: PathBuf,
    text: String,
}

impl LocalDocument {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            anyhow::bail!("target file not found: {}", path.display());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read target file: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }
}

impl TargetDocument for LocalDocument {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn write(&self, updated: &str) -> anyhow::Result<()> {
        std::fs::write(&self.path, updated)
            .with_context(|| format!("write target file: {}", self.path.display()))
    }
}

pub struct RemoteDocument<'a> {
    client: &'a ContentsClient,
    file: RemoteFile,
    message: String,
}

impl<'a> RemoteDocument<'a> {
    pub fn open(client: &'a ContentsClient, path: &str, message: &str) -> anyhow::Result<Self> {
        let file = client
            .get_file(path)
            .with_context(|| format!("read remote target: {path}"))?;
        Ok(Self {
            client,
            file,
            message: message.to_owned(),
        })
    }

    pub fn sha(&self) -> &str {
        &self.file.sha
    }
}

impl TargetDocument for RemoteDocument<'_> {
    fn location(&self) -> String {
        let config = self.client.config();
        format!(
            "{}/{}@{}:{}",
            config.owner, config.repo, config.branch, self.file.path
        )
    }

    fn text(&self) -> &str {
        &self.file.text
    }

    fn write(&self, updated: &str) -> anyhow::Result<()> {
        self.client
            .put_file(&self.file, updated, &self.message)
            .with_context(|| format!("write remote target: {}", self.location()))
    }
}

/// Reads the remote file; when that fails, falls back to the local copy at
/// the same path if there is one. A remote file that exists but cannot be
/// decoded never falls back.
pub fn open_remote_or_local<'a>(
    client: &'a ContentsClient,
    path: &str,
    message: &str,
) -> anyhow::Result<Box<dyn TargetDocument + 'a>> {
    match RemoteDocument::open(client, path, message) {
        Ok(document) => {
            tracing::info!(
                target_file = %document.location(),
                sha = %document.sha(),
                "read remote target"
            );
            Ok(Box::new(document))
        }
        Err(err) if err.downcast_ref::<UnusableContents>().is_some() => Err(err),
        Err(err) => {
            let local_path = Path::new(path);
            if !local_path.is_file() {
                return Err(err.context("no local copy to fall back to"));
            }
            tracing::warn!(
                error = %format!("{err:#}"),
                local = %local_path.display(),
                "remote read failed; using local copy"
            );
            Ok(Box::new(LocalDocument::open(local_path)?))
        }
    }
}
