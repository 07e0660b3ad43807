use anyhow::Result;
use clap::{Args, Parser};
use ecourts_scraper::config::{find_config_file, load_config, Config, LogFormat};
use ecourts_scraper::models::{ListingDay, Query, RunOptions};
use ecourts_scraper::output::{to_pretty_json, write_json};
use ecourts_scraper::ui::{self, Spinner};
use ecourts_scraper::{HttpTransport, PageExtractor, ResultAssembler};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// eCourts scraper - look up a case by CNR or case number and check today's cause list
#[derive(Parser, Debug)]
#[command(name = "ecourts-scraper")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Look up eCourts cases and cause lists", long_about = None)]
struct Cli {
    #[command(flatten)]
    query: QueryArgs,

    /// Check whether the case is listed today
    #[arg(long)]
    today: bool,

    /// Check whether the case is listed tomorrow
    #[arg(long)]
    tomorrow: bool,

    /// Download today's cause list PDFs
    #[arg(long)]
    causelist: bool,

    /// Download the case's PDFs (CNR lookups only)
    #[arg(long)]
    download_pdf: bool,

    /// Where to write the JSON result
    #[arg(long, default_value = "results.json")]
    out: PathBuf,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Override the site base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Also print the JSON result to stdout
    #[arg(long)]
    print: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct QueryArgs {
    /// 16-character CNR
    #[arg(long)]
    cnr: Option<String>,

    /// Case type, number and year
    #[arg(long, num_args = 3, value_names = ["CASE_TYPE", "NUMBER", "YEAR"])]
    case: Option<Vec<String>>,
}

impl QueryArgs {
    fn to_query(&self) -> Result<Query> {
        let cnr = self.cnr.as_deref().unwrap_or_default();
        let (case_type, number, year) = match self.case.as_deref() {
            Some([case_type, number, year]) => (case_type.as_str(), number.as_str(), year.as_str()),
            _ => ("", "", ""),
        };
        Ok(Query::from_form(cnr, case_type, number, year)?)
    }
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        let mut options = RunOptions::new()
            .download_pdfs(self.download_pdf)
            .download_cause_list(self.causelist);
        if let Some(day) = ListingDay::from_flags(self.today, self.tomorrow) {
            options = options.listing_day(day);
        }
        options
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout {
            config.http.timeout_secs = timeout;
        }
        if let Some(base_url) = &self.base_url {
            config.site.base_url = base_url.clone();
        }
    }
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("ecourts_scraper={}", level)),
    );

    let (text, json) = match config.logging.format {
        LogFormat::Text => (Some(fmt::layer().with_writer(std::io::stderr)), None),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();
}

fn build_assembler(config: &Config) -> Result<ResultAssembler> {
    let transport = Arc::new(HttpTransport::new(&config.http)?);
    let extractor = PageExtractor::new(transport, &config.site.base_url)?;
    Ok(ResultAssembler::new(extractor, &config.downloads))
}

/// Result file for a run that never got to query the site
fn write_empty_output(path: &Path) -> Result<()> {
    write_json(path, &serde_json::json!({ "query": {}, "results": null }))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            write_empty_output(&cli.out)?;
            return Err(e.into());
        }
    };
    cli.apply_overrides(&mut config);

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let ready = cli
        .query
        .to_query()
        .and_then(|query| Ok((query, build_assembler(&config)?)));
    let (query, assembler) = match ready {
        Ok(ready) => ready,
        Err(e) => {
            tracing::error!("{:#}", e);
            write_empty_output(&cli.out)?;
            return Err(e);
        }
    };
    let options = cli.run_options();

    let spinner = if cli.quiet || !ui::is_terminal() {
        Spinner::hidden()
    } else {
        Spinner::new(&format!("Looking up {}", query.label()))
    };
    let output = assembler.run(&query, &options).await;
    spinner.finish_with_output(&output);

    write_json(&cli.out, &output)?;

    if cli.print {
        println!("{}", to_pretty_json(&output)?);
    }
    if !cli.quiet {
        ui::print_summary(&output);
        println!();
    }
    println!("Done.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cnr_with_flags() {
        let cli = Cli::try_parse_from([
            "ecourts-scraper",
            "--cnr",
            "DLHC010012342023",
            "--today",
            "--tomorrow",
            "--download-pdf",
            "--out",
            "out/run.json",
        ])
        .unwrap();

        assert_eq!(cli.query.to_query().unwrap(), Query::cnr("DLHC010012342023"));
        assert_eq!(cli.out, PathBuf::from("out/run.json"));

        let options = cli.run_options();
        assert_eq!(options.listing_day, Some(ListingDay::Today));
        assert!(options.download_pdfs);
        assert!(!options.download_cause_list);
    }

    #[test]
    fn test_parse_case_triple() {
        let cli = Cli::try_parse_from([
            "ecourts-scraper",
            "--case",
            "Crl",
            "10",
            "2023",
            "--causelist",
            "-vv",
        ])
        .unwrap();

        assert_eq!(
            cli.query.to_query().unwrap(),
            Query::case("Crl", "10", "2023")
        );
        assert_eq!(cli.out, PathBuf::from("results.json"));
        assert_eq!(cli.verbose, 2);
        assert!(cli.run_options().download_cause_list);
        assert_eq!(cli.run_options().listing_day, None);
    }

    #[test]
    fn test_query_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["ecourts-scraper"]).is_err());
        assert!(Cli::try_parse_from([
            "ecourts-scraper",
            "--cnr",
            "DLHC010012342023",
            "--case",
            "Crl",
            "10",
            "2023",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["ecourts-scraper", "--case", "Crl", "10"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "ecourts-scraper",
            "--cnr",
            "X",
            "--timeout",
            "3",
            "--base-url",
            "http://localhost:9000/ecourtindia_v6/",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.http.timeout_secs, 3);
        assert_eq!(config.site.base_url, "http://localhost:9000/ecourtindia_v6/");
    }

    #[test]
    fn test_blank_cnr_is_rejected() {
        let cli = Cli::try_parse_from(["ecourts-scraper", "--cnr", "   "]).unwrap();
        assert!(cli.query.to_query().is_err());
    }

    #[test]
    fn test_bad_base_url_is_rejected() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(build_assembler(&config).is_err());
        assert!(build_assembler(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_output_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("results.json");

        write_empty_output(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "query": {}, "results": null }));
    }
}
