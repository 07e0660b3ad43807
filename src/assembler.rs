//! Composition of extractor calls into one result per query.

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

use crate::config::DownloadConfig;
use crate::extractor::{match_in_listing, PageExtractor};
use crate::models::{
    AssembledOutput, CauseListAttempt, ListingIdentifiers, ListingMatch, Query, QueryResults,
    RunOptions,
};

/// Runs a [`Query`] and the optional stages chained onto it.
///
/// Every run is independent: nothing is cached between calls and there are
/// no retries.
#[derive(Debug, Clone)]
pub struct ResultAssembler {
    extractor: PageExtractor,
    documents_dir: PathBuf,
    cause_lists_dir: PathBuf,
}

impl ResultAssembler {
    pub fn new(extractor: PageExtractor, downloads: &DownloadConfig) -> Self {
        Self {
            extractor,
            documents_dir: downloads.documents_dir.clone(),
            cause_lists_dir: downloads.cause_lists_dir.clone(),
        }
    }

    pub fn extractor(&self) -> &PageExtractor {
        &self.extractor
    }

    /// Run with today's local date
    pub async fn run(&self, query: &Query, options: &RunOptions) -> AssembledOutput {
        self.run_on(query, options, Local::now().date_naive()).await
    }

    /// Run as if `today` were the current date
    pub async fn run_on(
        &self,
        query: &Query,
        options: &RunOptions,
        today: NaiveDate,
    ) -> AssembledOutput {
        let mut output = AssembledOutput::new(query.clone());

        match query {
            Query::Cnr { cnr } => {
                let lookup = self.extractor.search_by_cnr(cnr).await;

                if options.download_pdfs && !lookup.pdf_links().is_empty() {
                    self.download_documents(cnr, lookup.pdf_links()).await;
                }
                output.results = Some(lookup.into());
            }
            Query::Case {
                case_type,
                number,
                year,
            } => {
                let result = self.extractor.search_by_case(case_type, number, year).await;
                output.results = Some(QueryResults::CaseSearch(result));
            }
            Query::CauseList { date } => {
                let attempt = self.extractor.cause_list_links(Some(*date)).await;
                output.results = Some(QueryResults::CauseList(attempt));
            }
        }

        if let (Some(day), Some(identifiers)) = (options.listing_day, query.listing_identifiers()) {
            let attempt = self.extractor.cause_list_links(Some(day.date(today))).await;
            if let Some(first) = attempt.pdfs().first() {
                if let Some(found) = self.check_listing(first, &identifiers).await {
                    output.found_in_causelist = Some(found);
                }
            }
            output.cause_list_attempt = Some(attempt);
        }

        if options.download_cause_list {
            let attempt = self.extractor.cause_list_links(Some(today)).await;
            if !attempt.pdfs().is_empty() {
                self.download_cause_lists(&attempt).await;
            }
            output.extras.cause_list = Some(attempt);
        }

        output
    }

    /// Fetch a cause list and look for the case in it.
    ///
    /// `None` when the list could not be fetched, `Some(None)` when it was
    /// scanned without a match.
    async fn check_listing(
        &self,
        url: &str,
        identifiers: &ListingIdentifiers,
    ) -> Option<Option<ListingMatch>> {
        let page = self.extractor.transport().fetch(url, None).await?;
        Some(match_in_listing(&page.text(), identifiers))
    }

    /// Download case documents as `{cnr}_doc_{n}.pdf`, returning how many landed
    pub async fn download_documents(&self, cnr: &str, urls: &[String]) -> usize {
        self.download_all(&self.documents_dir, urls, |n| format!("{}_doc_{}.pdf", cnr, n))
            .await
    }

    /// Download cause lists as `cause_list_{n}.pdf`, returning how many landed
    pub async fn download_cause_lists(&self, attempt: &CauseListAttempt) -> usize {
        self.download_all(&self.cause_lists_dir, attempt.pdfs(), |n| {
            format!("cause_list_{}.pdf", n)
        })
        .await
    }

    async fn download_all(
        &self,
        dir: &Path,
        urls: &[String],
        file_name: impl Fn(usize) -> String,
    ) -> usize {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            tracing::error!("Failed to create directory {}: {}", dir.display(), e);
            return 0;
        }

        let mut downloaded = 0;
        for (i, url) in urls.iter().enumerate() {
            let destination = dir.join(file_name(i + 1));
            if self
                .extractor
                .transport()
                .download_file(url, &destination)
                .await
            {
                downloaded += 1;
            }
        }
        downloaded
    }
}
