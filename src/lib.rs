//! # eCourts scraper
//!
//! A best-effort scraper for the public eCourts case records site. It looks a
//! case up by CNR or by type/number/year, checks whether the case appears in a
//! cause list, and downloads linked PDFs.
//!
//! ## Architecture
//!
//! - [`transport`]: HTTP GET and file download behind the [`Transport`] trait
//! - [`extractor`]: URL building and HTML field extraction ([`PageExtractor`])
//! - [`assembler`]: composes extractor calls for one query ([`ResultAssembler`])
//! - [`output`]: the JSON result file
//! - [`models`]: queries, run options and extracted records
//! - [`config`]: configuration management
//!
//! Every failure on the network side comes back as a "not found" value rather
//! than an error, so a run always produces a result document.

pub mod assembler;
pub mod config;
pub mod extractor;
#[cfg(feature = "gui")]
pub mod gui;
pub mod models;
pub mod output;
pub mod transport;
pub mod ui;

pub use assembler::ResultAssembler;
pub use extractor::PageExtractor;
pub use models::{AssembledOutput, Query, RunOptions};
pub use transport::{HttpTransport, Transport};
