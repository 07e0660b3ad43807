//! Core data models for queries and scraped records.

mod query;
mod record;

pub use query::{ListingDay, ListingIdentifiers, Query, QueryError, RunOptions, CNR_LENGTH};
pub use record::{
    AssembledOutput, CaseInfo, CaseLink, CaseRecord, CaseSearchResult, CauseListAttempt,
    CnrLookup, Extras, ListingMatch, QueryResults,
};
