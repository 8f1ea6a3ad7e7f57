// Forbid unwrap() in production code to prevent panics on bad input.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::io::{self, BufRead, Write};
use std::time::Instant;

use bplusdb::catalog::{loader, AnyHasher, Catalog};
use bplusdb::common::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Read one trimmed line, or `None` at end of input.
fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<Option<String>> {
    println!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn run(config: AppConfig) -> bplusdb::Result<()> {
    let records = loader::load_file(&config.csv_path)?;
    let catalog = Catalog::from_records(config.order, AnyHasher::from(config.hash), records)?;

    let stats = catalog.tree().stats();
    println!("Number of splits: {}", stats.splits);
    println!("Height of the tree: {}", stats.height);
    println!("Estimated memory usage: {} bytes", catalog.estimated_bytes());

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let Some(department) = prompt(&mut input, "Please enter the department name to search: ")? else {
            break;
        };
        let Some(rank_text) = prompt(&mut input, "Please enter the rank to search: ")? else {
            break;
        };

        let rank = match rank_text.trim().parse::<usize>() {
            Ok(rank) => rank,
            Err(_) => {
                println!("Rank must be a positive number, got '{rank_text}'");
                continue;
            }
        };

        let start = Instant::now();
        let found = catalog.rank(&department, rank);
        let seek_time = start.elapsed();

        match found {
            Ok(Some(record)) => {
                println!("{record}");
                println!("Seek time: {:.3} ms", seek_time.as_secs_f64() * 1e3);
            }
            Ok(None) => println!("No records found for department: {department}"),
            Err(e) => println!("{e}"),
        }
    }

    tracing::debug!("input closed, exiting");
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bplusdb=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: csv_path={}, order={}, hash={:?}",
        config.csv_path.display(),
        config.order,
        config.hash
    );

    if let Err(e) = run(config) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
