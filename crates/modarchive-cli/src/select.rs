use std::num::IntErrorKind;
use thiserror::Error;

/// What the user picked from the numbered results menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The `0` entry: every result.
    All,
    /// Zero-based indices into the results, in the order they were typed.
    Tracks(Vec<usize>),
    /// Nothing usable was entered; ask again.
    Retry,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("'{0}' is not a track number")]
    InvalidToken(String),
}

/// Interpret a comma-separated list of menu numbers.
///
/// The menu lists results as `1..=len`, with `0` meaning all of them.
/// Numbers outside that range are ignored; anything that is not an integer
/// is an error.
pub fn parse_selection(input: &str, len: usize) -> Result<Selection, SelectionError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Selection::Retry);
    }

    // Integers too large for i64 are valid input but never a menu entry
    let numbers = input
        .split(',')
        .map(|token| {
            let token = token.trim();
            match token.parse::<i64>() {
                Ok(n) => Ok(Some(n)),
                Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                    Ok(None)
                }
                Err(_) => Err(SelectionError::InvalidToken(token.to_string())),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    if numbers.contains(&Some(0)) {
        return Ok(Selection::All);
    }

    let picked: Vec<usize> = numbers
        .into_iter()
        .flatten()
        .filter_map(|n| usize::try_from(n).ok())
        .filter(|&n| n <= len)
        .map(|n| n - 1)
        .collect();

    if picked.is_empty() {
        Ok(Selection::Retry)
    } else {
        Ok(Selection::Tracks(picked))
    }
}

impl Selection {
    /// The chosen items, cloned out of `items`.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        match self {
            Selection::All => items.to_vec(),
            Selection::Tracks(indices) => indices
                .iter()
                .filter_map(|&i| items.get(i).cloned())
                .collect(),
            Selection::Retry => Vec::new(),
        }
    }
}
