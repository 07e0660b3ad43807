//! Page extraction for the eCourts case status and cause list pages.
//!
//! The site has no public API, so every lookup builds a URL by string
//! interpolation, fetches it through a [`Transport`], and picks fields out of
//! the returned HTML with loose text and attribute heuristics. Nothing here
//! is resilient to layout changes; absence of an element is a normal
//! "not found" outcome, never an error.

pub mod html;
pub mod listing;

pub use listing::{first_numeric_token, match_in_listing};

use chrono::{Local, NaiveDate};
use scraper::Html;
use std::sync::Arc;
use url::Url;

use crate::models::{
    CaseInfo, CaseLink, CaseRecord, CaseSearchResult, CauseListAttempt, CnrLookup,
};
use crate::transport::Transport;

/// How much of the fallback page is kept in `raw`
pub const RAW_PREVIEW_CHARS: usize = 5000;

/// Reason reported when the cause list index could not be fetched
pub const CAUSE_LIST_UNAVAILABLE: &str = "Failed to load cause list index";

/// Reason reported when the index has no direct PDF links
pub const NO_CAUSE_LIST_PDFS: &str =
    "no direct PDFs found (interactive verification likely required)";

/// Extracts case fields from eCourts pages
#[derive(Debug, Clone)]
pub struct PageExtractor {
    transport: Arc<dyn Transport>,
    base: Url,
}

impl PageExtractor {
    /// Create an extractor for the site rooted at `base_url`
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            transport,
            base: Url::parse(base_url)?,
        })
    }

    /// The transport requests go through
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// The base every URL is joined onto
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Case details endpoint, which sometimes answers with JSON
    pub fn case_details_url(&self, cnr: &str) -> String {
        self.page_url(&format!("?p=casestatus%2Fcase_details&cnr={}", cnr))
    }

    /// Case status page for a CNR
    pub fn case_status_url(&self, cnr: &str) -> String {
        self.page_url(&format!("?p=casestatus%2Findex&cnr={}", cnr))
    }

    /// Case status search form
    pub fn case_search_url(&self) -> String {
        self.page_url("?p=casestatus%2Findex")
    }

    /// Cause list index page
    pub fn cause_list_index_url(&self) -> String {
        self.page_url("?p=cause_list%2Findex")
    }

    fn page_url(&self, path: &str) -> String {
        self.base
            .join(path)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}", self.base, path))
    }

    /// Look a case up by CNR.
    ///
    /// A JSON answer from the details endpoint is returned as-is. Otherwise
    /// the case status page is scraped for a title, PDF links and any mention
    /// of a listing.
    pub async fn search_by_cnr(&self, cnr: &str) -> CnrLookup {
        tracing::info!("Searching for CNR: {}", cnr);

        if let Some(page) = self.transport.fetch(&self.case_details_url(cnr), None).await {
            if page.is_json() {
                match serde_json::from_slice(&page.body) {
                    Ok(value) => return CnrLookup::Json(value),
                    Err(e) => tracing::debug!("Ignoring malformed JSON for {}: {}", cnr, e),
                }
            }
        }

        let Some(page) = self.transport.fetch(&self.case_status_url(cnr), None).await else {
            return CnrLookup::Page(CaseRecord::not_found(cnr));
        };

        let text = page.text();
        let info = self.parse_case_page(&text);

        CnrLookup::Page(CaseRecord {
            cnr: cnr.to_string(),
            found: info.has_signal(),
            raw: Some(html::truncate_chars(&text, RAW_PREVIEW_CHARS)),
            info: Some(info),
        })
    }

    /// Pull the title, PDF links and listing mention out of a case page
    pub fn parse_case_page(&self, page: &str) -> CaseInfo {
        let document = Html::parse_document(page);

        let title = html::select(&document, "h1, h2, h3")
            .into_iter()
            .map(|heading| html::element_text(&heading))
            .find(|text| text.contains("CNR"));

        let pdf_links = html::anchors(&document)
            .into_iter()
            .filter(|(_, href)| href.to_lowercase().ends_with(".pdf"))
            .filter_map(|(_, href)| html::resolve_href(&self.base, href))
            .collect();

        let text = html::flatten_text(&document).to_lowercase();
        let page_mentions_listing = text.contains("cause list") || text.contains("listed");

        CaseInfo {
            title,
            pdf_links,
            page_mentions_listing,
        }
    }

    /// Search the case status form by type, number and year.
    ///
    /// An anchor is kept when its text contains the case type (ignoring
    /// case), the number, or the year. The match is deliberately loose.
    pub async fn search_by_case(
        &self,
        case_type: &str,
        number: &str,
        year: &str,
    ) -> CaseSearchResult {
        tracing::info!("Searching for case: {} {}/{}", case_type, number, year);

        let params = [
            ("case_type", case_type),
            ("case_no", number),
            ("case_year", year),
        ];
        let Some(page) = self
            .transport
            .fetch(&self.case_search_url(), Some(&params[..]))
            .await
        else {
            return CaseSearchResult::not_found();
        };

        CaseSearchResult::from_links(self.parse_case_links(&page.text(), case_type, number, year))
    }

    /// Anchors on a search page that loosely match the case
    pub fn parse_case_links(
        &self,
        page: &str,
        case_type: &str,
        number: &str,
        year: &str,
    ) -> Vec<CaseLink> {
        let document = Html::parse_document(page);
        let case_type = case_type.to_lowercase();

        html::anchors(&document)
            .into_iter()
            .filter_map(|(anchor, href)| {
                let text = html::stripped_text(&anchor);
                let keep = text.to_lowercase().contains(&case_type)
                    || text.contains(number)
                    || text.contains(year);
                if !keep {
                    return None;
                }
                let href = html::resolve_href(&self.base, href)?;
                Some(CaseLink { text, href })
            })
            .collect()
    }

    /// Look for downloadable cause list PDFs.
    ///
    /// The date is only logged: the index page always shows the site's
    /// current listing whatever date is asked for.
    pub async fn cause_list_links(&self, date: Option<NaiveDate>) -> CauseListAttempt {
        let date = date.unwrap_or_else(|| Local::now().date_naive());
        tracing::info!(
            "Attempting to fetch cause list for {} (may require captcha).",
            date.format("%Y-%m-%d")
        );

        let Some(page) = self
            .transport
            .fetch(&self.cause_list_index_url(), None)
            .await
        else {
            return CauseListAttempt::failed(CAUSE_LIST_UNAVAILABLE);
        };

        let pdfs = self.parse_cause_list_links(&page.text());
        if pdfs.is_empty() {
            CauseListAttempt::failed(NO_CAUSE_LIST_PDFS)
        } else {
            CauseListAttempt::found(pdfs)
        }
    }

    /// PDF links on the index whose href mentions "cause"
    pub fn parse_cause_list_links(&self, page: &str) -> Vec<String> {
        let document = Html::parse_document(page);

        html::anchors(&document)
            .into_iter()
            .filter(|(_, href)| {
                let href = href.to_lowercase();
                href.contains(".pdf") && href.contains("cause")
            })
            .filter_map(|(_, href)| html::resolve_href(&self.base, href))
            .collect()
    }
}
