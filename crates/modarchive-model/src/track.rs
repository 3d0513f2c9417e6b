use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One download link scraped from an archive results page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    /// Display name, taken from the fragment of `url` (e.g., "song.mod").
    pub name: String,
    /// The anchor `href` exactly as it appeared on the page.
    pub url: String,
}

impl SearchResult {
    /// Build a result from a raw download href, deriving its name.
    pub fn from_href(href: &str) -> Self {
        Self {
            name: track_name(href).to_string(),
            url: href.to_string(),
        }
    }
}

/// A module that was fetched and written to disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadedTrack {
    pub name: String,
    pub path: PathBuf,
    /// True when written to the user's output directory, false when the file
    /// lives in a scratch directory that goes away with its download batch.
    pub persisted: bool,
}

/// The part of an href after its last `#`, or the whole href if it has none.
///
/// Archive download links look like `downloads.php?moduleid=1234#song.mod`;
/// the fragment carries the module's file name.
pub fn track_name(href: &str) -> &str {
    match href.rfind('#') {
        Some(idx) => &href[idx + 1..],
        None => href,
    }
}
