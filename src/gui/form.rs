//! Form fields and the requests they turn into.

use crate::models::{ListingDay, Query, QueryError, RunOptions};
use std::path::PathBuf;

/// Fields of the "Search Case" tab
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub cnr: String,
    pub case_type: String,
    pub number: String,
    pub year: String,
    pub today: bool,
    pub tomorrow: bool,
    pub download_pdf: bool,
}

impl SearchForm {
    /// Query and options for a run of this form
    pub fn request(&self) -> Result<(Query, RunOptions), QueryError> {
        let query = Query::from_form(&self.cnr, &self.case_type, &self.number, &self.year)?;

        let mut options = RunOptions::new().download_pdfs(self.download_pdf);
        if let Some(day) = ListingDay::from_flags(self.today, self.tomorrow) {
            options = options.listing_day(day);
        }
        Ok((query, options))
    }
}

/// A message shown in a modal window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Destination of the "Cause List" tab, or the notice to show instead
pub fn cause_list_path(text: &str) -> Result<PathBuf, Notice> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Notice::new(
            "Output Path",
            "Select an output file path first!",
        ));
    }
    Ok(PathBuf::from(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_form_request() {
        let form = SearchForm {
            case_type: "Crl".to_string(),
            number: "10".to_string(),
            year: "2023".to_string(),
            tomorrow: true,
            download_pdf: true,
            ..Default::default()
        };

        let (query, options) = form.request().unwrap();
        assert_eq!(query, Query::case("Crl", "10", "2023"));
        assert_eq!(options.listing_day, Some(ListingDay::Tomorrow));
        assert!(options.download_pdfs);
        assert!(!options.download_cause_list);
    }

    #[test]
    fn test_empty_form_is_missing_input() {
        let form = SearchForm {
            number: "10".to_string(),
            ..Default::default()
        };
        assert_eq!(form.request().unwrap_err(), QueryError::MissingInput);
    }

    #[test]
    fn test_cause_list_path() {
        assert_eq!(
            cause_list_path(" lists/today.json ").unwrap(),
            PathBuf::from("lists/today.json")
        );
        assert_eq!(cause_list_path("  ").unwrap_err().title, "Output Path");
    }
}
