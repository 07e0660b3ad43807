//! Document helpers over `scraper`.

use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Elements whose text never shows up on the page
const HIDDEN_TEXT_PARENTS: [&str; 3] = ["script", "style", "template"];

/// Separator between text nodes in [`flatten_text`]
pub const LINE_SEPARATOR: &str = "|";

/// Every element matching `css`, in document order
pub fn select<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(e) => {
            tracing::warn!("Invalid selector {:?}: {:?}", css, e);
            Vec::new()
        }
    }
}

/// Anchors with an `href`, paired with it
pub fn anchors(document: &Html) -> Vec<(ElementRef<'_>, &str)> {
    select(document, "a[href]")
        .into_iter()
        .filter_map(|a| a.value().attr("href").map(|href| (a, href)))
        .collect()
}

/// Visible text of the document: each text node trimmed, empty ones dropped,
/// joined with `|`
pub fn flatten_text(document: &Html) -> String {
    let lines: Vec<&str> = document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let Node::Text(text) = node.value() else {
                return None;
            };
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|el| el.name()))
                .is_some_and(|name| HIDDEN_TEXT_PARENTS.contains(&name));
            if hidden {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect();

    lines.join(LINE_SEPARATOR)
}

/// Text of an element with every text node trimmed and glued together
pub fn stripped_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Full text of an element, trimmed at the ends only
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolve `href` against `base` into an absolute URL
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::debug!("Skipping unresolvable href {:?}: {}", href, e);
            None
        }
    }
}

/// First `count` characters of `s`
pub fn truncate_chars(s: &str, count: usize) -> String {
    s.chars().take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_text_skips_scripts_and_blanks() {
        let html = r#"
            <html><head><title> Case Status </title><script>var x = "hidden";</script></head>
            <body>
                <h2>  CNR Number  </h2>
                <p>Listed on <b>12-03-2024</b></p>
                <style>.x { color: red }</style>
            </body></html>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(
            flatten_text(&document),
            "Case Status|CNR Number|Listed on|12-03-2024"
        );
    }

    #[test]
    fn test_flatten_plain_text() {
        let document = Html::parse_document("  case 55/2024 serial 7  ");
        assert_eq!(flatten_text(&document), "case 55/2024 serial 7");
    }

    #[test]
    fn test_stripped_and_element_text() {
        let document = Html::parse_document("<a href='x'> Crl <span> 10/2023 </span></a>");
        let (anchor, href) = anchors(&document).into_iter().next().unwrap();
        assert_eq!(href, "x");
        assert_eq!(stripped_text(&anchor), "Crl10/2023");
        assert_eq!(element_text(&anchor), "Crl  10/2023");
    }

    #[test]
    fn test_resolve_href() {
        let base = Url::parse("https://services.ecourts.gov.in/ecourtindia_v6/").unwrap();
        assert_eq!(
            resolve_href(&base, "orders/a.pdf").unwrap(),
            "https://services.ecourts.gov.in/ecourtindia_v6/orders/a.pdf"
        );
        assert_eq!(
            resolve_href(&base, "/files/b.PDF").unwrap(),
            "https://services.ecourts.gov.in/files/b.PDF"
        );
        assert_eq!(
            resolve_href(&base, "https://cdn.example.com/c.pdf").unwrap(),
            "https://cdn.example.com/c.pdf"
        );
        assert!(resolve_href(&base, "http://[::1").is_none());
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("न्यायालय", 2), "न्");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_invalid_selector_is_empty() {
        let document = Html::parse_document("<p>x</p>");
        assert!(select(&document, "p[").is_empty());
    }
}
