// Entry point and interactive CLI flow.
//
// - Fetch up to `limit` NYC 311 complaints from the open-data API.
// - Let the user pick one report (complaint type, borough, or day).
// - Let the user pick a chart (bar, pie, line), then save the chart and a
//   CSV export of the counts to the output directory.
//
// Exit codes: 0 on completion or an invalid menu choice, 1 when the data
// cannot be fetched or the configuration is invalid.
mod charts;
mod config;
mod dataset;
mod error;
mod loader;
mod output;
mod reports;
mod session;
mod types;
mod util;

use charts::RendererKind;
use config::{Config, CONFIG_FILE};
use dataset::Dataset;
use loader::{HttpSource, RecordSource};
use reports::AggregatorKind;
use session::{Console, Menu, Session};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use types::Summary;

/// Console backed by stdin/stdout.
struct Terminal;

impl Console for Terminal {
    fn choose(&mut self, menu: Menu) -> String {
        match menu {
            Menu::Aggregator => {
                println!("Select Report:");
                for (i, kind) in AggregatorKind::ALL.iter().enumerate() {
                    println!("[{}] {}", i + 1, kind.label());
                }
            }
            Menu::Renderer => {
                println!("Select Chart:");
                for (i, kind) in RendererKind::ALL.iter().enumerate() {
                    println!("[{}] {}", i + 1, kind.label());
                }
            }
        }
        println!();
        read_choice()
    }

    fn show_summary(&mut self, title: &str, summary: &Summary) {
        println!("\n{}", title);
        println!(
            "({} keys, {} complaints counted)\n",
            util::format_int(summary.len() as u64),
            util::format_int(summary.total())
        );
        println!("{}\n", output::summary_table(summary));
    }

    fn notify(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Log to stderr so the menus on stdout stay readable.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn main() -> ExitCode {
    let config = match Config::load(Path::new(CONFIG_FILE)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(config.verbose);
    info!("complaint_report v{}", env!("CARGO_PKG_VERSION"));

    let source = HttpSource::new(
        config.endpoint.clone(),
        Duration::from_secs(config.timeout_seconds),
    );
    println!("Fetching complaint records...");
    let records = match source.fetch(config.limit) {
        Ok(r) => r,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let data = Dataset::from_records(records);
    println!(
        "Processing dataset... ({} records loaded)\n",
        util::format_int(data.len() as u64)
    );
    if data.is_empty() {
        println!("Note: the service returned no records; reports will be empty.\n");
    }

    let outcome = Session::new(&data, config.output_dir.clone()).run(&mut Terminal);
    info!(
        keys = outcome.summary.as_ref().map_or(0, Summary::len),
        artifact = ?outcome.artifact,
        export = ?outcome.export,
        notices = outcome.notices.len(),
        "Session finished"
    );
    if outcome.completed {
        println!("Done.");
    }
    ExitCode::SUCCESS
}
