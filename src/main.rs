// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap, load the config file
// 2. Validate the seed URL (a bad seed stops everything)
// 3. Crawl, printing each new link as it is found
// 4. Write the link files and print a summary
// 5. Exit with proper code (0 = crawl finished, 2 = setup error,
//    130 = second Ctrl-C)
//
// Individual pages failing (404s, timeouts) never change the exit code:
// the crawl is best effort.
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod links;
mod output;
mod transport;

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::CrawlConfig;
use crawl::{Crawler, Registry};
use links::{CanonicalUrl, Classifier};
use output::OutputFiles;
use transport::{FixedUserAgent, HttpTransport, RotatingUserAgents, UserAgentSource};

#[tokio::main]
async fn main() {
    let result = run().await;
    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    std::process::exit(exit_code(&result));
}

// 0 once a crawl has run (even with failed pages or Ctrl-C), 2 for anything
// that stopped it from starting or from writing its results
fn exit_code(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 2,
    }
}

// Everything checked before the first request goes out
struct Setup {
    config: CrawlConfig,
    seed: CanonicalUrl,
}

fn prepare(cli: &Cli) -> Result<Setup> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CrawlConfig::default(),
    };
    config::merge_cli_args(&mut config, cli.overrides());
    config.validate()?;

    let seed = CanonicalUrl::parse_seed(&cli.url)?;

    if !cli.no_files {
        output::prepare_output_dir(&config.output_dir).with_context(|| {
            format!("output directory {} is not writable", config.output_dir.display())
        })?;
    }

    Ok(Setup { config, seed })
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let Setup { config, seed } = prepare(&cli)?;

    let user_agents: Arc<dyn UserAgentSource> = match &config.fixed_user_agent {
        Some(ua) => Arc::new(FixedUserAgent(ua.clone())),
        None => Arc::new(RotatingUserAgents::new(config.user_agents.clone())),
    };
    let transport = HttpTransport::new(config.timeout(), user_agents)
        .map_err(error::CrawlError::from)?;

    // Live link lines come through a channel so workers never touch stdout
    let print_links = !cli.quiet && !cli.json;
    let (registry, printer) = if print_links {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let printer = tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                output::print_link_event(&event);
            }
        });
        (Arc::new(Registry::with_events(events_tx)), Some(printer))
    } else {
        (Arc::new(Registry::new()), None)
    };

    let classifier = Classifier::new(seed.host(), config.domain_match, &config.disallowed_schemes);
    let crawler = Crawler::new(Arc::new(transport), Arc::clone(&registry), classifier, &config);

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if watch_interrupts(tokio::signal::ctrl_c, cancel).await {
                std::process::exit(130);
            }
        })
    };

    let report = crawler.run(seed, cancel).await;

    // Dropping the last registry handle closes the event channel
    drop(crawler);
    drop(registry);
    if let Some(printer) = printer {
        let _ = printer.await;
    }

    if !cli.no_files {
        let files = OutputFiles::for_domain(&config.output_dir, &report.target_domain, Local::now());
        output::write_link_files(&report, &files).context("writing link files")?;
        info!(
            internal = %files.internal.display(),
            external = %files.external.display(),
            "link files written"
        );
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_summary(&report);
    }

    interrupt.abort();
    Ok(())
}

// The first Ctrl-C cancels the crawl and lets running fetches finish.
// Returns true on a second one, so the caller can quit right away.
async fn watch_interrupts<F, Fut>(mut interrupt: F, cancel: CancellationToken) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if interrupt().await.is_err() {
        return false;
    }
    warn!("interrupt received, stopping crawl (Ctrl-C again to quit now)");
    cancel.cancel();

    if interrupt().await.is_err() {
        return false;
    }
    warn!("second interrupt, quitting without waiting for running fetches");
    true
}

// Logs go to stderr so stdout stays clean for --json
fn init_logging(cli: &Cli) {
    let filter = if cli.verbose {
        "link_extractor=debug"
    } else if cli.quiet {
        "link_extractor=warn"
    } else {
        "link_extractor=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
