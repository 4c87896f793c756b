use clap::Parser;
use leadmap::browser::WebDriverBrowser;
use leadmap::{Row, ScrapeSession, ScraperConfig, run_batch};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    eprintln!("Note: Scraping requires a WebDriver server (e.g., ChromeDriver).");
    eprintln!("Set WEBDRIVER_URL or pass --webdriver-url if not using {}", config.webdriver_url);

    let Some(browser) = WebDriverBrowser::connect(&config).await else {
        std::process::exit(1);
    };

    let plan = args.plan();
    ::log::info!(
        "Starting {} searches in {}",
        plan.locations.len() * plan.business_types.len(),
        plan.state_code()
    );

    let start_time = std::time::Instant::now();
    let mut session = ScrapeSession::new(browser, config);
    let rows = run_batch(&mut session, &plan).await;
    session.into_browser().close().await;

    ::log::info!(
        "Scraping complete - {} businesses in {:.2} seconds",
        rows.len(),
        start_time.elapsed().as_secs_f64()
    );

    if let Err(e) = write_rows(&rows, args.output.as_deref()) {
        ::log::error!("Failed to write results: {}", e);
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<ScraperConfig, Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    };
    let mut config = config.with_env_overrides();

    if let Some(url) = &args.webdriver_url {
        config.webdriver_url = url.clone();
    }
    Ok(config)
}

fn write_rows(rows: &[Row], output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writer.flush()?;
            ::log::info!("Wrote {} rows to {}", rows.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
