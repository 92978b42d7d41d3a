//! LUBM benchmark runner
//!
//! Generates the configured universities into an in-memory triple store,
//! then runs the nine LUBM queries and prints a report.

use anyhow::Context;
use clap::Parser;
use comfy_table::{ContentArrangement, Table};
use lubm::config::{DEFAULT_QUEUE_CAPACITY, DEFAULT_SEED};
use lubm::{BenchmarkConfig, BenchmarkReport};

#[derive(Parser)]
#[command(name = "lubm", version, about = "Lehigh University Benchmark")]
struct Cli {
    /// Number of universities to generate
    #[arg(short = 'n', long, default_value_t = 1, env = "LUBM_UNIVERSITIES")]
    universities: usize,

    /// Generator seed
    #[arg(long, default_value_t = DEFAULT_SEED, env = "LUBM_SEED")]
    seed: u64,

    /// Upper bound for degree references (defaults to the university count)
    #[arg(long, env = "LUBM_MAX_UNIVERSITY_ID")]
    max_university_id: Option<usize>,

    /// Ingestion queue capacity, in bags
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY, env = "LUBM_QUEUE_CAPACITY")]
    queue_capacity: usize,

    /// Output format
    #[arg(long, default_value = "table", env = "LUBM_FORMAT")]
    format: OutputFormat,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    fn config(&self) -> BenchmarkConfig {
        let config = BenchmarkConfig::new()
            .with_seed(self.seed)
            .with_universities(self.universities)
            .with_queue_capacity(self.queue_capacity);
        match self.max_university_id {
            Some(max) => config.with_max_university_id(max),
            None => config,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = cli.config();

    let report = lubm::run(&config).context("benchmark aborted")?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_table(&report),
    }
    Ok(())
}

fn print_table(report: &BenchmarkReport) {
    println!("LUBM v{}", lubm::version());
    println!(
        "Loaded {} universities: {} triples ({} new) from {} bags in {:.2} ms",
        report.load.universities,
        report.load.triples,
        report.load.inserted,
        report.load.bags,
        report.load.elapsed_ms
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Query", "Rows", "Time (ms)", "Error"]);

    for query in &report.queries {
        table.add_row(vec![
            query.name.clone(),
            query.rows.map(|n| n.to_string()).unwrap_or_default(),
            format!("{:.2}", query.elapsed_ms),
            query.error.clone().unwrap_or_default(),
        ]);
    }

    println!("{table}");
}
