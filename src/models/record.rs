//! Records extracted from eCourts pages and the assembled output.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::Query;

/// Fields pulled out of a case status page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseInfo {
    /// First heading that mentions "CNR"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Absolute URLs of every linked PDF, in page order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pdf_links: Vec<String>,

    /// Whether the page text mentions a cause list or a listing
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub page_mentions_listing: bool,
}

impl CaseInfo {
    /// Whether any structural signal was located on the page
    pub fn has_signal(&self) -> bool {
        self.title.is_some() || !self.pdf_links.is_empty()
    }
}

/// Result of a CNR lookup that went through the HTML page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseRecord {
    pub cnr: String,
    pub found: bool,

    /// Leading slice of the fetched page, kept for diagnostics
    pub raw: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<CaseInfo>,
}

impl CaseRecord {
    /// Record for a page that could not be fetched
    pub fn not_found(cnr: impl Into<String>) -> Self {
        Self {
            cnr: cnr.into(),
            found: false,
            raw: None,
            info: None,
        }
    }

    /// PDF links of the record, empty when the page was never parsed
    pub fn pdf_links(&self) -> &[String] {
        self.info
            .as_ref()
            .map(|info| info.pdf_links.as_slice())
            .unwrap_or_default()
    }
}

/// Outcome of a CNR lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CnrLookup {
    /// The case details endpoint answered with JSON, passed through untouched
    Json(serde_json::Value),

    /// Fields scraped from the case status page
    Page(CaseRecord),
}

impl CnrLookup {
    /// PDF links found on the page (never any for a JSON answer)
    pub fn pdf_links(&self) -> &[String] {
        match self {
            CnrLookup::Json(_) => &[],
            CnrLookup::Page(record) => record.pdf_links(),
        }
    }
}

/// An anchor kept by the case search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseLink {
    pub text: String,
    pub href: String,
}

/// Result of a case type/number/year search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseSearchResult {
    pub found: bool,

    /// Absent when the search page could not be fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<CaseLink>>,
}

impl CaseSearchResult {
    /// Result for a page that could not be fetched
    pub fn not_found() -> Self {
        Self {
            found: false,
            results: None,
        }
    }

    /// Result built from the kept anchors
    pub fn from_links(links: Vec<CaseLink>) -> Self {
        Self {
            found: !links.is_empty(),
            results: Some(links),
        }
    }
}

/// Result of looking for cause list PDFs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CauseListAttempt {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdfs: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CauseListAttempt {
    /// Successful attempt with the PDFs found
    pub fn found(pdfs: Vec<String>) -> Self {
        Self {
            ok: true,
            pdfs: Some(pdfs),
            reason: None,
        }
    }

    /// Failed attempt with a reason
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            pdfs: None,
            reason: Some(reason.into()),
        }
    }

    /// PDFs of a successful attempt
    pub fn pdfs(&self) -> &[String] {
        if !self.ok {
            return &[];
        }
        self.pdfs.as_deref().unwrap_or_default()
    }
}

/// A line of a cause list that mentions the case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingMatch {
    /// First purely numeric token on the line, or "?"
    pub serial: String,

    /// Always "?", the court column is not parsed
    pub court: String,

    pub line: String,
}

/// Whatever the main stage of a run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResults {
    CaseRecord(CaseRecord),
    CaseSearch(CaseSearchResult),
    CauseList(CauseListAttempt),

    /// JSON answer from the case details endpoint
    Passthrough(serde_json::Value),
}

impl From<CnrLookup> for QueryResults {
    fn from(lookup: CnrLookup) -> Self {
        match lookup {
            CnrLookup::Json(value) => QueryResults::Passthrough(value),
            CnrLookup::Page(record) => QueryResults::CaseRecord(record),
        }
    }
}

/// Stages that ran besides the main query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extras {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause_list: Option<CauseListAttempt>,
}

impl Extras {
    pub fn is_empty(&self) -> bool {
        self.cause_list.is_none()
    }
}

/// Every partial result of one run, keyed by stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledOutput {
    pub query: Query,

    pub results: Option<QueryResults>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause_list_attempt: Option<CauseListAttempt>,

    /// `Some(None)` when a cause list was scanned without finding the case
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub found_in_causelist: Option<Option<ListingMatch>>,

    #[serde(default, skip_serializing_if = "Extras::is_empty")]
    pub extras: Extras,
}

impl AssembledOutput {
    /// Output with only the query stage filled in
    pub fn new(query: Query) -> Self {
        Self {
            query,
            results: None,
            cause_list_attempt: None,
            found_in_causelist: None,
            extras: Extras::default(),
        }
    }
}

// A key that is present (even as null) deserializes to `Some`.
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_record_shape() {
        let record = CaseRecord {
            cnr: "ABC".to_string(),
            found: true,
            raw: Some("<html>".to_string()),
            info: Some(CaseInfo {
                title: Some("CNR Number: ABC".to_string()),
                pdf_links: vec![],
                page_mentions_listing: false,
            }),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "cnr": "ABC",
                "found": true,
                "raw": "<html>",
                "info": { "title": "CNR Number: ABC" }
            })
        );
    }

    #[test]
    fn test_query_results_untagged_roundtrip() {
        let variants = vec![
            QueryResults::CaseRecord(CaseRecord::not_found("ABC")),
            QueryResults::CaseSearch(CaseSearchResult::from_links(vec![CaseLink {
                text: "Crl 10/2023".to_string(),
                href: "https://example.com/a".to_string(),
            }])),
            QueryResults::CaseSearch(CaseSearchResult::not_found()),
            QueryResults::CauseList(CauseListAttempt::failed("nope")),
            QueryResults::Passthrough(serde_json::json!({ "status": "Disposed" })),
        ];

        for variant in variants {
            let json = serde_json::to_string(&variant).unwrap();
            let back: QueryResults = serde_json::from_str(&json).unwrap();
            assert_eq!(back, variant, "roundtrip of {}", json);
        }
    }

    #[test]
    fn test_found_in_causelist_null_is_kept() {
        let mut output = AssembledOutput::new(Query::cnr("ABC"));
        output.found_in_causelist = Some(None);

        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("found_in_causelist").unwrap().is_null());
        assert!(json.get("cause_list_attempt").is_none());
        assert!(json.get("extras").is_none());
        assert!(json.get("results").unwrap().is_null());

        let back: AssembledOutput = serde_json::from_value(json).unwrap();
        assert_eq!(back, output);
    }

    #[test]
    fn test_cause_list_pdfs_only_when_ok() {
        let attempt = CauseListAttempt {
            ok: false,
            pdfs: Some(vec!["https://example.com/cause.pdf".to_string()]),
            reason: None,
        };
        assert!(attempt.pdfs().is_empty());
        assert_eq!(
            CauseListAttempt::found(vec!["x".to_string()]).pdfs(),
            ["x".to_string()]
        );
    }
}
