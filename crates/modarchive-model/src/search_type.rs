use serde::{Deserialize, Serialize};
use std::fmt;

/// Which server-side field a search query is matched against.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    #[default]
    FilenameOrSongtitle,
    Filename,
    Songtitle,
    ModuleInstruments,
    ModuleComments,
    Hash,
}

impl SearchType {
    /// The value sent as the `search_type` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchType::FilenameOrSongtitle => "filename_or_songtitle",
            SearchType::Filename => "filename",
            SearchType::Songtitle => "songtitle",
            SearchType::ModuleInstruments => "module_instruments",
            SearchType::ModuleComments => "module_comments",
            SearchType::Hash => "hash",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
