use clap::{Parser, ValueEnum};
use log::{error, info};
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use cnacall::pipeline::run_batch;
use cnacall::utils::cytoband::CytobandMap;

#[derive(Parser)]
#[command(name = "cnacall")]
#[command(
    about = "Gene-level CNA caller for ABSOLUTE annotated segment files",
    long_about = "Calls deletions, amplifications, and high-level amplifications per gene \
                  from gene-annotated segmentation files, normalizing for ploidy via a \
                  per-sample genome-wide distribution of rescaled copy numbers."
)]
struct Cli {
    /// Directory containing annotated gene-level segment files (names ending
    /// in `annotated`)
    input_dir: PathBuf,
    /// Genome build label; enables cytoband/arm annotation and the per-arm
    /// event summary
    #[arg(long, requires = "cytoband")]
    build: Option<String>,
    /// UCSC-style cytoband table matching --build
    #[arg(long, requires = "build")]
    cytoband: Option<PathBuf>,
    /// Directory for output files (defaults to the input directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Log verbosity level
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
    /// Write log output to a file instead of stderr
    #[arg(long)]
    log_file: Option<String>,
    /// Append to log file instead of truncating
    #[arg(long)]
    append_log: bool,
}

#[derive(Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let mut log_builder = env_logger::Builder::from_default_env();
    log_builder
        .filter_level(cli.log_level.to_level_filter())
        .format_module_path(false);
    if let Some(ref path) = cli.log_file {
        let file = if cli.append_log {
            std::fs::File::options().create(true).append(true).open(path)
        } else {
            std::fs::File::create(path)
        }
        .unwrap_or_else(|e| panic!("Could not open log file '{}': {}", path, e));
        log_builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    log_builder.init();

    let bands = match (&cli.build, &cli.cytoband) {
        (Some(build), Some(table_path)) => {
            match CytobandMap::load(table_path) {
                Ok(map) => {
                    info!(
                        "Band mode enabled for {}: {} bands across {} chromosomes",
                        build,
                        map.band_count(),
                        map.chromosome_count()
                    );
                    Some(map)
                }
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        _ => None,
    };

    let output_dir = cli.output_dir.clone().unwrap_or_else(|| cli.input_dir.clone());
    if let Err(e) = run_batch(&cli.input_dir, &output_dir, bands.as_ref()) {
        error!("{}", e);
        std::process::exit(1);
    }
}
