use crate::select::{parse_selection, Selection};
use anyhow::Result;
use modarchive_model::SearchResult;
use std::io::{BufRead, Write};

/// Print the numbered results menu.
pub fn print_menu<W: Write>(out: &mut W, results: &[SearchResult]) -> Result<()> {
    writeln!(out, "Select songs to play/download separated by a comma: ")?;
    writeln!(out, "{}", "-".repeat(50))?;
    writeln!(out, "0] Download all songs")?;
    for (i, result) in results.iter().enumerate() {
        writeln!(out, "{}] {}", i + 1, result.name)?;
    }
    Ok(())
}

/// Prompt until the user picks at least one result.
///
/// Returns `None` when input ends before a selection is made.
pub fn prompt_selection<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    results: &[SearchResult],
) -> Result<Option<Vec<SearchResult>>> {
    loop {
        write!(out, "song: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match parse_selection(&line, results.len())? {
            Selection::Retry => {
                tracing::debug!(input = %line.trim(), "No valid track numbers");
            }
            selection => return Ok(Some(selection.apply(results))),
        }
    }
}
