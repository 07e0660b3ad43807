#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use anyhow::Result;
use ecourts_scraper::config::{find_config_file, load_config};
use ecourts_scraper::{gui, HttpTransport, PageExtractor, ResultAssembler};
use eframe::egui::ViewportBuilder;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let config = load_config(find_config_file().as_deref())?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("ecourts_scraper={}", config.logging.level)
        })))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let transport = Arc::new(HttpTransport::new(&config.http)?);
    let extractor = PageExtractor::new(transport, &config.site.base_url)?;
    let assembler = ResultAssembler::new(extractor, &config.downloads);

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("eCourts Scraper")
            .with_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    gui::run(options, assembler).map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}
