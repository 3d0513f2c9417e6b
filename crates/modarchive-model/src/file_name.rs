use thiserror::Error;

/// Why a remote track name cannot be used as a local file name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnsafeName {
    #[error("track name is empty")]
    Empty,

    #[error("track name '{0}' refers to a directory")]
    DotSegment(String),

    #[error("track name '{0}' contains a path separator")]
    PathSeparator(String),

    #[error("track name contains a NUL byte")]
    Nul,
}

/// Check that a track name scraped from a results page is a plain file name.
///
/// Names come from remote HTML, so anything that could escape the target
/// directory is rejected rather than rewritten.
pub fn safe_file_name(name: &str) -> Result<&str, UnsafeName> {
    if name.is_empty() {
        return Err(UnsafeName::Empty);
    }
    if name == "." || name == ".." {
        return Err(UnsafeName::DotSegment(name.to_string()));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(UnsafeName::PathSeparator(name.to_string()));
    }
    if name.contains('\0') {
        return Err(UnsafeName::Nul);
    }
    Ok(name)
}
