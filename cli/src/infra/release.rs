//! Infrastructure implementation of the `ReleaseFetcher` port.
//!
//! Release assets are plain HTTPS downloads from the project's releases
//! page. The blocking `ureq` transfer runs on the blocking pool.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ReleaseFetcher;

/// Releases page the assets are published under.
pub const DEFAULT_RELEASES_URL: &str = "https://github.com/Optum/dce/releases";

/// Environment variable overriding [`DEFAULT_RELEASES_URL`].
pub const RELEASES_URL_ENV: &str = "DCE_RELEASES_URL";

/// Download URL of `asset` for release `version`.
#[must_use]
pub fn asset_url(base: &str, version: &str, asset: &str) -> String {
    format!("{}/download/v{version}/{asset}", base.trim_end_matches('/'))
}

/// Downloads release assets over HTTP.
pub struct HttpReleaseFetcher {
    base_url: String,
    quiet: bool,
}

impl HttpReleaseFetcher {
    #[must_use]
    pub fn new(base_url: impl Into<String>, quiet: bool) -> Self {
        Self {
            base_url: base_url.into(),
            quiet,
        }
    }

    /// Fetcher for the public releases page, honouring `DCE_RELEASES_URL`.
    #[must_use]
    pub fn from_env(quiet: bool) -> Self {
        let base =
            std::env::var(RELEASES_URL_ENV).unwrap_or_else(|_| DEFAULT_RELEASES_URL.to_string());
        Self::new(base, quiet)
    }
}

impl ReleaseFetcher for HttpReleaseFetcher {
    async fn download_release_asset(
        &self,
        asset: &str,
        version: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        let url = asset_url(&self.base_url, version, asset);
        let dest = dest_dir.join(asset);
        let label = format!("{asset} v{version}");
        let quiet = self.quiet;
        tracing::info!(%url, dest = %dest.display(), "downloading release asset");

        let task_dest = dest.clone();
        tokio::task::spawn_blocking(move || download(&url, &task_dest, &label, quiet))
            .await
            .context("download task panicked")??;
        Ok(dest)
    }
}

fn download(url: &str, dest: &Path, label: &str, quiet: bool) -> Result<()> {
    let response = match ureq::get(url).set("User-Agent", "dce-cli").call() {
        Ok(r) => r,
        Err(ureq::Error::Status(404, _)) => anyhow::bail!("release asset {label} not found"),
        Err(ureq::Error::Status(code, _)) => anyhow::bail!("download of {label} failed: HTTP {code}"),
        Err(e) => return Err(e).with_context(|| format!("downloading {label}")),
    };

    let total = response
        .header("Content-Length")
        .and_then(|v| v.parse::<u64>().ok());
    let pb = make_progress_bar(quiet, total);

    let partial = {
        let mut s = dest.as_os_str().to_owned();
        s.push(".partial");
        PathBuf::from(s)
    };
    let mut file =
        File::create(&partial).with_context(|| format!("creating {}", partial.display()))?;
    let mut reader = response.into_reader();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf).context("download interrupted")?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).context("download interrupted")?;
        pb.inc(n as u64);
    }
    pb.finish_and_clear();
    drop(file);
    std::fs::rename(&partial, dest)
        .with_context(|| format!("finalising {}", dest.display()))?;
    Ok(())
}

fn make_progress_bar(quiet: bool, total: Option<u64>) -> indicatif::ProgressBar {
    if quiet {
        return indicatif::ProgressBar::hidden();
    }
    if let Some(t) = total {
        let pb = indicatif::ProgressBar::new(t);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("[{bar:40}] {bytes}/{total_bytes}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        pb
    } else {
        indicatif::ProgressBar::new_spinner()
    }
}
