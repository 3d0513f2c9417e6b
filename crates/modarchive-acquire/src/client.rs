use crate::parse;
use crate::player::Player;
use crate::session::HttpSession;
use anyhow::{Context, Result};
use modarchive_model::{safe_file_name, DownloadedTrack, SearchResult, SearchType};
use reqwest::Url;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DEFAULT_BASE_URL: &str = "https://modarchive.org/";

/// The only content type accepted as a module download.
const MODULE_CONTENT_TYPE: &str = "application/octet-stream";

/// Where the archive lives.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root of the site; search and relative download links resolve against it.
    pub base_url: Url,
}

impl ClientConfig {
    /// Build a config from a base URL string, adding the trailing `/` that
    /// relative link resolution depends on.
    pub fn with_base_url(base: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base).with_context(|| format!("Invalid archive base URL: {base}"))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default base URL"),
        }
    }
}

/// Tracks written by one `download` call.
///
/// Tracks that could not be kept in the output directory are written to a
/// scratch directory owned by the batch. Their paths stay valid until the
/// batch is dropped, which deletes the scratch directory and its contents.
#[derive(Debug, Default)]
pub struct DownloadBatch {
    pub tracks: Vec<DownloadedTrack>,
    scratch: Option<TempDir>,
}

impl DownloadBatch {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// The scratch directory, if any ephemeral track was written.
    pub fn scratch_path(&self) -> Option<&Path> {
        self.scratch.as_ref().map(TempDir::path)
    }

    /// Whether the track at `index` can be deleted once it has been played:
    /// it lives in the scratch directory and no later track reuses its path.
    pub fn removable_after(&self, index: usize) -> bool {
        match self.tracks.get(index) {
            Some(track) => {
                !track.persisted
                    && !self.tracks[index + 1..].iter().any(|t| t.path == track.path)
            }
            None => false,
        }
    }

    fn scratch_dir(&mut self) -> Result<PathBuf> {
        let dir = match self.scratch.take() {
            Some(dir) => dir,
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("modarchive-")
                    .tempdir()
                    .context("Failed to create scratch directory")?;
                tracing::debug!(path = %dir.path().display(), "Created scratch directory");
                dir
            }
        };
        let path = dir.path().to_path_buf();
        self.scratch = Some(dir);
        Ok(path)
    }
}

/// Client for the Mod Archive: search, download, play and remove modules.
///
/// Owns one HTTP session for its whole lifetime, so cookies set by the
/// search page are sent along with the downloads that follow.
pub struct ArchiveClient<S, P> {
    config: ClientConfig,
    session: S,
    player: P,
}

impl<S: HttpSession, P: Player> ArchiveClient<S, P> {
    pub fn new(config: ClientConfig, session: S, player: P) -> Self {
        Self {
            config,
            session,
            player,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the search endpoint URL with properly encoded parameters.
    pub fn search_url(&self, query: Option<&str>, search_type: SearchType) -> Result<Url> {
        let mut url = self
            .config
            .base_url
            .join("index.php")
            .context("Failed to build search URL")?;
        url.query_pairs_mut()
            .append_pair("request", "search")
            .append_pair("submit", "Find")
            .append_pair("query", query.unwrap_or(""))
            .append_pair("search_type", search_type.as_str());
        Ok(url)
    }

    /// Search the archive and return the download links of the results page.
    ///
    /// A non-200 response is logged and yields no results. A page without a
    /// results table is an error, as are transport failures.
    pub async fn search(
        &self,
        query: Option<&str>,
        search_type: SearchType,
    ) -> Result<Vec<SearchResult>> {
        let url = self.search_url(query, search_type)?;
        tracing::info!(query = query.unwrap_or(""), search_type = %search_type, "Searching the Mod Archive");

        let response = self.session.get(url.as_str()).await?;
        if response.status != 200 {
            tracing::warn!(status = response.status, url = %url, "Failed to search the modarchive");
            return Ok(Vec::new());
        }

        let html = response.text();
        tracing::debug!(bytes = html.len(), "Received results page");
        let results = parse::parse_results(&html).context("Failed to read search results")?;
        tracing::info!(results = results.len(), "Parsed search results");
        Ok(results)
    }

    /// Resolve a scraped href against the archive root, dropping the
    /// fragment that only carries the track name.
    pub fn resolve(&self, href: &str) -> Result<Url> {
        let mut url = self
            .config
            .base_url
            .join(href)
            .with_context(|| format!("Invalid download link: {href}"))?;
        url.set_fragment(None);
        Ok(url)
    }

    /// Download the selected results in order.
    ///
    /// Files go to `output_dir` when it is an existing directory and to the
    /// batch's scratch directory otherwise. Unavailable tracks, responses that
    /// are not modules, and unsafe names are logged and skipped.
    pub async fn download(
        &self,
        selected: &[SearchResult],
        output_dir: &Path,
    ) -> Result<DownloadBatch> {
        let mut batch = DownloadBatch::default();
        if selected.is_empty() {
            return Ok(batch);
        }

        let persist = output_dir.is_dir();
        if !persist {
            tracing::info!(dir = %output_dir.display(), "Output directory does not exist, tracks will not be kept");
        }

        for result in selected {
            tracing::info!(track = %result.name, "Downloading");

            let name = match safe_file_name(&result.name) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(track = %result.name, "Refusing to save track: {e}");
                    continue;
                }
            };

            let url = match self.resolve(&result.url) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(track = %result.name, "{e:#}");
                    continue;
                }
            };

            let response = match self.session.get(url.as_str()).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(track = %result.name, "{e:#}");
                    continue;
                }
            };

            if response.status != 200 {
                tracing::warn!(track = %result.name, status = response.status, "This song is not available");
                continue;
            }

            if response.content_type.as_deref() != Some(MODULE_CONTENT_TYPE) {
                tracing::warn!(
                    track = %result.name,
                    content_type = response.content_type.as_deref().unwrap_or("<none>"),
                    "This song is in invalid format / not a song"
                );
                continue;
            }

            let dir = if persist {
                output_dir.to_path_buf()
            } else {
                batch.scratch_dir()?
            };
            let path = dir.join(name);
            if batch.tracks.iter().any(|t| t.path == path) {
                tracing::warn!(path = %path.display(), url = %result.url, "Overwriting a track saved earlier in this batch");
            }
            fs::write(&path, &response.body)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = response.body.len(), "Saved track");

            batch.tracks.push(DownloadedTrack {
                name: name.to_string(),
                path,
                persisted: persist,
            });
        }

        Ok(batch)
    }

    /// Play a downloaded file, blocking until the player finishes.
    pub async fn play(&self, path: &Path) -> Result<()> {
        tracing::info!(path = %path.display(), "Playing");
        self.player.play(path).await
    }

    /// Delete a downloaded file.
    pub fn remove(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Removed track");
        Ok(())
    }
}
