use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use logscan::{
    run_generate, run_scan, GenerateConfig, GenerateEvent, ScanConfig, ScanEvent, ScanOutcome,
};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory of log files for a keyword
    Scan(Box<ScanArgs>),

    /// Generate a synthetic log corpus to scan
    Generate {
        /// Directory to write log files into (created if missing)
        #[arg(short, long)]
        dir: PathBuf,

        /// Number of files to generate
        #[arg(short, long, default_value = "100")]
        files: usize,

        /// Lines per file
        #[arg(short, long, default_value = "1000")]
        lines: usize,

        /// Date of the first file (YYYY-MM-DD); file names follow log_dd_mm_yy.txt
        #[arg(long, default_value = "2024-01-01")]
        start_date: NaiveDate,

        /// Keyword to seed sparsely into the generated lines
        #[arg(short, long, default_value = "login by 99")]
        keyword: String,

        /// Number of writer threads (default: CPU cores)
        #[arg(short = 'j', long)]
        threads: Option<NonZeroUsize>,
    },
}

#[derive(Parser)]
struct ScanArgs {
    /// Directory of log files to scan
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Literal keyword to search for (case-sensitive)
    #[arg(short, long, default_value = "")]
    keyword: String,

    /// Only scan files whose name starts with this prefix
    #[arg(short, long)]
    prefix: Option<String>,

    /// Result file to write (overwritten each run)
    #[arg(short, long, default_value = "results.txt")]
    output: PathBuf,

    /// Number of worker threads (default: CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Suppress per-worker progress lines
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => scan(*args),
        Commands::Generate {
            dir,
            files,
            lines,
            start_date,
            keyword,
            threads,
        } => generate(dir, files, lines, start_date, keyword, threads),
    }
}

fn scan(args: ScanArgs) -> Result<()> {
    init_tracing(&args.log_level);

    let mut cli_config = ScanConfig::new(args.dir, args.keyword);
    cli_config.file_prefix = args.prefix;
    cli_config.output_path = args.output;
    cli_config.log_level = args.log_level;
    if let Some(threads) = args.threads {
        cli_config.thread_count = threads;
    }

    // Config files layer under CLI flags; with no config file anywhere the
    // CLI flags stand alone.
    let config = match ScanConfig::load_from(args.config.as_deref()) {
        Ok(file_config) => file_config.merge_with_cli(cli_config),
        Err(e) if args.config.is_some() => {
            return Err(e).context("failed to load configuration file")
        }
        Err(_) => cli_config,
    };

    let (tx, rx) = crossbeam_channel::unbounded();
    let quiet = args.quiet;
    let consumer = thread::spawn(move || {
        for event in rx {
            print_scan_event(&event, quiet);
        }
    });

    let result = run_scan(&config, Some(tx));
    // Sender dropped inside run_scan; the consumer drains and exits.
    let _ = consumer.join();

    let report = result?;
    match &report.outcome {
        ScanOutcome::NoMatches => {
            println!(
                "{} for keyword {:?}",
                "No results found".yellow(),
                config.keyword
            );
        }
        ScanOutcome::Matches(matches) => {
            println!(
                "{} {} match(es), written to {}",
                "Found".green(),
                matches.len(),
                config.output_path.display()
            );
        }
    }
    println!(
        "Scanned {} file(s) with {} worker(s), {} unreadable",
        report.summary.files_scanned,
        report.summary.workers_spawned,
        report.summary.files_failed
    );
    Ok(())
}

fn generate(
    dir: PathBuf,
    files: usize,
    lines: usize,
    start_date: NaiveDate,
    keyword: String,
    threads: Option<NonZeroUsize>,
) -> Result<()> {
    init_tracing("warn");

    let mut config = GenerateConfig::new(dir, files, lines);
    config.start_date = start_date;
    config.keyword = keyword;
    if let Some(threads) = threads {
        config.thread_count = threads;
    }

    let (tx, rx) = crossbeam_channel::unbounded();
    let consumer = thread::spawn(move || {
        for event in rx {
            print_generate_event(&event);
        }
    });

    let result = run_generate(&config, Some(tx));
    let _ = consumer.join();

    let summary = result?;
    println!(
        "{} {} file(s) in {} using {} worker(s), {} failed",
        "Generated".green(),
        summary.files_written,
        config.dir.display(),
        summary.workers_spawned,
        summary.files_failed
    );
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_scan_event(event: &ScanEvent, quiet: bool) {
    match event {
        ScanEvent::Listed { files } => {
            eprintln!("Files to scan: {files}");
        }
        ScanEvent::Started { workers } => {
            eprintln!("Using {workers} worker thread(s)");
        }
        ScanEvent::FileFailed { path, message } => {
            eprintln!("{} {}: {}", "skipped".red(), path.display(), message);
        }
        ScanEvent::WorkerFinished {
            worker,
            files_scanned,
            matches,
        } => {
            if !quiet {
                eprintln!(
                    "worker {worker} done: {files_scanned} file(s), {matches} match(es)"
                );
            }
        }
        ScanEvent::Completed { summary } => {
            eprintln!(
                "scan complete: {} match(es) in {} file(s)",
                summary.matches_found, summary.files_scanned
            );
        }
    }
}

fn print_generate_event(event: &GenerateEvent) {
    match event {
        GenerateEvent::Started { workers, files } => {
            eprintln!("Generating {files} file(s) with {workers} writer thread(s)");
        }
        GenerateEvent::FileFailed { path, message } => {
            eprintln!("{} {}: {}", "failed".red(), path.display(), message);
        }
        GenerateEvent::WriterFinished {
            worker,
            files_written,
        } => {
            eprintln!("writer {worker} done: {files_written} file(s)");
        }
    }
}
