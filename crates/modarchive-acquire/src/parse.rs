use modarchive_model::SearchResult;
use scraper::{Html, Selector};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("search results page has no results table")]
    MissingResultsTable,
}

/// Extract the download links from a search results page.
///
/// Only the first `<table>` is considered. Within it, every `<a>` inside a
/// `<td>` of a `<tr>` whose `title` is exactly `Download` contributes its
/// `href`, in document order. Duplicates are kept.
pub fn parse_download_links(html: &str) -> Result<Vec<String>, ParseError> {
    let document = Html::parse_document(html);

    let table_sel = Selector::parse("table").expect("valid selector");
    let tr_sel = Selector::parse("tr").expect("valid selector");
    let td_sel = Selector::parse("td").expect("valid selector");
    let a_sel = Selector::parse("a").expect("valid selector");

    let table = document
        .select(&table_sel)
        .next()
        .ok_or(ParseError::MissingResultsTable)?;

    let mut links = Vec::new();
    for tr in table.select(&tr_sel) {
        for td in tr.select(&td_sel) {
            for a in td.select(&a_sel) {
                if a.value().attr("title") != Some("Download") {
                    continue;
                }
                match a.value().attr("href") {
                    Some(href) => links.push(href.to_string()),
                    None => tracing::debug!("Skipping download anchor without href"),
                }
            }
        }
    }

    Ok(links)
}

/// Parse a results page straight into search results.
pub fn parse_results(html: &str) -> Result<Vec<SearchResult>, ParseError> {
    let links = parse_download_links(html)?;
    Ok(links.iter().map(|href| SearchResult::from_href(href)).collect())
}
