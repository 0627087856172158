use std::io;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grad_rankings::collector;
use grad_rankings::settings;
use grad_rankings::shell::Shell;
use grad_rankings::RankingsClient;

fn main() -> Result<()> {
    init_tracing();

    let root = std::env::var("ROOT").unwrap_or_else(|_| ".".to_string());
    let settings = settings::load_settings(&root)?;

    // Fetch everything once up front; the shell only reads from memory
    let client = RankingsClient::new(&settings)?;
    info!(endpoint = %settings.endpoint, max_pages = settings.max_pages, "fetching rankings");
    let table = collector::collect(&client, settings.max_pages)
        .context("Failed to collect rankings")?;
    println!(
        "Loaded {} colleges across {} ranks",
        table.college_count(),
        table.len()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), settings.dump_path(&root));
    shell.run(&table)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grad_rankings=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
