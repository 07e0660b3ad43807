//! Finding a case inside a cause list.
//!
//! The cause list is flattened to `|`-delimited lines of text and scanned
//! line by line. Only the serial number is guessed; the court column is not
//! parsed and always comes back as `"?"`.

use scraper::Html;

use super::html::{flatten_text, LINE_SEPARATOR};
use crate::models::{ListingIdentifiers, ListingMatch};

const UNKNOWN: &str = "?";

/// Look for the case in a cause list given as HTML or plain text.
///
/// The CNR is tried first; when it is absent or not found, `"{number}/{year}"`
/// is tried if both parts are present. Both comparisons ignore case.
pub fn match_in_listing(listing: &str, identifiers: &ListingIdentifiers) -> Option<ListingMatch> {
    let document = Html::parse_document(listing);
    let text = flatten_text(&document);
    let lines: Vec<&str> = text.split(LINE_SEPARATOR).collect();

    if let Some(cnr) = present(&identifiers.cnr) {
        if let Some(found) = find_line(&lines, cnr) {
            return Some(found);
        }
    }

    match (present(&identifiers.number), present(&identifiers.year)) {
        (Some(number), Some(year)) => find_line(&lines, &format!("{}/{}", number, year)),
        _ => None,
    }
}

/// First whitespace-separated token made only of digits, in any script
pub fn first_numeric_token(line: &str) -> Option<&str> {
    line.split_whitespace()
        .find(|token| token.chars().all(char::is_numeric))
}

fn find_line(lines: &[&str], needle: &str) -> Option<ListingMatch> {
    let needle = needle.to_lowercase();
    let line = lines
        .iter()
        .find(|line| line.to_lowercase().contains(&needle))?;

    Some(ListingMatch {
        serial: first_numeric_token(line).unwrap_or(UNKNOWN).to_string(),
        court: UNKNOWN.to_string(),
        line: line.to_string(),
    })
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
