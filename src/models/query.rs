//! Query and run-option models.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of a CNR as issued by the courts.
pub const CNR_LENGTH: usize = 16;

/// One lookup against the eCourts site.
///
/// Exactly one shape is active per run. The serialized form is the `query`
/// stage of the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Query {
    /// Lookup by CNR
    Cnr { cnr: String },

    /// Lookup by case type, number and year
    Case {
        case_type: String,
        number: String,
        year: String,
    },

    /// Cause list for a date
    CauseList { date: NaiveDate },
}

impl Query {
    /// Create a CNR query
    pub fn cnr(cnr: impl Into<String>) -> Self {
        Query::Cnr { cnr: cnr.into() }
    }

    /// Create a case type/number/year query
    pub fn case(
        case_type: impl Into<String>,
        number: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Query::Case {
            case_type: case_type.into(),
            number: number.into(),
            year: year.into(),
        }
    }

    /// Create a cause list query
    pub fn cause_list(date: NaiveDate) -> Self {
        Query::CauseList { date }
    }

    /// Build a query from free-text form fields.
    ///
    /// A non-empty CNR wins over the case fields; otherwise all three case
    /// fields must be filled in.
    pub fn from_form(
        cnr: &str,
        case_type: &str,
        number: &str,
        year: &str,
    ) -> Result<Self, QueryError> {
        let cnr = cnr.trim();
        if !cnr.is_empty() {
            if cnr.chars().count() != CNR_LENGTH {
                tracing::warn!(
                    "CNR {} is {} characters long, expected {}",
                    cnr,
                    cnr.chars().count(),
                    CNR_LENGTH
                );
            }
            return Ok(Self::cnr(cnr));
        }

        let (case_type, number, year) = (case_type.trim(), number.trim(), year.trim());
        if case_type.is_empty() || number.is_empty() || year.is_empty() {
            return Err(QueryError::MissingInput);
        }
        Ok(Self::case(case_type, number, year))
    }

    /// Short human-readable label, used in logs and the terminal summary
    pub fn label(&self) -> String {
        match self {
            Query::Cnr { cnr } => format!("CNR {}", cnr),
            Query::Case {
                case_type,
                number,
                year,
            } => format!("{} {}/{}", case_type, number, year),
            Query::CauseList { date } => format!("cause list {}", date),
        }
    }

    /// Identifiers used to look this query up in a cause list
    pub fn listing_identifiers(&self) -> Option<ListingIdentifiers> {
        match self {
            Query::Cnr { cnr } => Some(ListingIdentifiers::cnr(cnr)),
            Query::Case { number, year, .. } => Some(ListingIdentifiers::number_year(number, year)),
            Query::CauseList { .. } => None,
        }
    }
}

/// Errors raised while building a query from user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Enter either CNR or Case Type/Number/Year")]
    MissingInput,
}

/// Which day's cause list to check a case against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingDay {
    Today,
    Tomorrow,
}

impl ListingDay {
    /// Pick the day from the two flags; today wins when both are set
    pub fn from_flags(today: bool, tomorrow: bool) -> Option<Self> {
        if today {
            Some(ListingDay::Today)
        } else if tomorrow {
            Some(ListingDay::Tomorrow)
        } else {
            None
        }
    }

    /// Resolve against the given current date
    pub fn date(self, today: NaiveDate) -> NaiveDate {
        match self {
            ListingDay::Today => today,
            ListingDay::Tomorrow => today.checked_add_days(Days::new(1)).unwrap_or(today),
        }
    }
}

/// Options that chain extra stages onto a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Check the case against this day's cause list
    pub listing_day: Option<ListingDay>,

    /// Download PDFs linked from the case page
    pub download_pdfs: bool,

    /// Fetch today's cause list and download its PDFs
    pub download_cause_list: bool,
}

impl RunOptions {
    /// Create options with every stage switched off
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listing day
    pub fn listing_day(mut self, day: ListingDay) -> Self {
        self.listing_day = Some(day);
        self
    }

    /// Enable/disable case PDF downloads
    pub fn download_pdfs(mut self, download: bool) -> Self {
        self.download_pdfs = download;
        self
    }

    /// Enable/disable the cause list download
    pub fn download_cause_list(mut self, download: bool) -> Self {
        self.download_cause_list = download;
        self
    }
}

/// Identifiers searched for inside a cause list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingIdentifiers {
    pub cnr: Option<String>,
    pub number: Option<String>,
    pub year: Option<String>,
}

impl ListingIdentifiers {
    pub fn cnr(cnr: impl Into<String>) -> Self {
        Self {
            cnr: Some(cnr.into()),
            ..Default::default()
        }
    }

    pub fn number_year(number: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            year: Some(year.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_form_prefers_cnr() {
        let query = Query::from_form("  DLHC010012342023 ", "Crl", "10", "2023").unwrap();
        assert_eq!(query, Query::cnr("DLHC010012342023"));
    }

    #[test]
    fn test_from_form_case_fields() {
        let query = Query::from_form("", "Crl", " 10", "2023").unwrap();
        assert_eq!(query, Query::case("Crl", "10", "2023"));
    }

    #[test]
    fn test_from_form_missing_input() {
        assert_eq!(
            Query::from_form(" ", "Crl", "", "2023"),
            Err(QueryError::MissingInput)
        );
        assert_eq!(
            QueryError::MissingInput.to_string(),
            "Enter either CNR or Case Type/Number/Year"
        );
    }

    #[test]
    fn test_query_serialization_shapes() {
        let cnr = serde_json::to_value(Query::cnr("ABC")).unwrap();
        assert_eq!(cnr, serde_json::json!({ "cnr": "ABC" }));

        let case = serde_json::to_value(Query::case("Crl", "10", "2023")).unwrap();
        assert_eq!(
            case,
            serde_json::json!({ "case_type": "Crl", "number": "10", "year": "2023" })
        );

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let back: Query =
            serde_json::from_value(serde_json::to_value(Query::cause_list(date)).unwrap()).unwrap();
        assert_eq!(back, Query::cause_list(date));
    }

    #[test]
    fn test_listing_day() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(ListingDay::Today.date(today), today);
        assert_eq!(
            ListingDay::Tomorrow.date(today),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(ListingDay::from_flags(true, true), Some(ListingDay::Today));
        assert_eq!(ListingDay::from_flags(false, true), Some(ListingDay::Tomorrow));
        assert_eq!(ListingDay::from_flags(false, false), None);
    }

    #[test]
    fn test_listing_identifiers_per_query() {
        assert_eq!(
            Query::case("Crl", "55", "2024").listing_identifiers(),
            Some(ListingIdentifiers::number_year("55", "2024"))
        );
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(Query::cause_list(date).listing_identifiers().is_none());
    }
}
