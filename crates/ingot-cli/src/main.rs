use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use ingot_core::AmalgamationJob;

mod manifest;

use manifest::{parse_dialect, parse_layout, parse_preset, Manifest};

#[derive(Parser)]
#[command(name = "ingot")]
#[command(about = "Amalgamate a C/C++ source tree into single-file artifacts", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Amalgamate once, configured entirely from flags
    Merge {
        /// Root directory to scan; repeat for multiple roots
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,

        /// Base name of the output artifacts
        #[arg(short, long)]
        output: String,

        /// Directory the artifacts are written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Output dialect (c, cpp)
        #[arg(long, default_value = "c")]
        dialect: String,

        /// Write one combined artifact instead of a header/source pair
        #[arg(long)]
        combined: bool,

        /// System-header preset (c, arduino)
        #[arg(long, default_value = "c")]
        preset: String,

        /// Additional allow-listed system header; repeat as needed
        #[arg(long = "system-header")]
        system_headers: Vec<String>,

        /// File whose contents replace the default banner
        #[arg(long)]
        banner_file: Option<PathBuf>,
    },

    /// Run every job in a TOML manifest
    Run {
        /// Manifest path
        #[arg(short, long, default_value = "ingot.toml")]
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with_target(cli.debug) // Show target module in debug mode
        .init();

    match cli.command {
        Commands::Merge {
            root,
            output,
            out_dir,
            dialect,
            combined,
            preset,
            system_headers,
            banner_file,
        } => handle_merge(
            root,
            output,
            out_dir,
            &dialect,
            combined,
            &preset,
            system_headers,
            banner_file,
        ),
        Commands::Run { manifest } => handle_run(&manifest),
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_merge(
    roots: Vec<PathBuf>,
    output: String,
    out_dir: PathBuf,
    dialect: &str,
    combined: bool,
    preset: &str,
    system_headers: Vec<String>,
    banner_file: Option<PathBuf>,
) -> Result<()> {
    let mut allow_list = parse_preset(preset)?;
    for entry in &system_headers {
        allow_list.insert(entry);
    }

    let layout = if combined { "combined" } else { "split" };
    let mut job = AmalgamationJob::new(roots, output, out_dir)
        .with_dialect(parse_dialect(dialect)?)
        .with_layout(parse_layout(layout)?)
        .with_system_headers(allow_list);

    if let Some(banner_file) = banner_file {
        let banner = fs::read_to_string(&banner_file)
            .with_context(|| format!("Failed to read banner {}", banner_file.display()))?;
        job = job.with_banner(banner);
    }

    run_job(&job)
}

fn handle_run(manifest_path: &PathBuf) -> Result<()> {
    let manifest = Manifest::from_file(manifest_path)?;
    info!(
        jobs = manifest.jobs.len(),
        "running manifest {}",
        manifest_path.display()
    );

    // Jobs run in manifest order; the first failure aborts the remainder.
    for spec in &manifest.jobs {
        let job = spec.to_job()?;
        run_job(&job).with_context(|| format!("Job {:?} failed", spec.name))?;
    }
    Ok(())
}

fn run_job(job: &AmalgamationJob) -> Result<()> {
    let report = job.run()?;
    info!(
        headers = report.header_count,
        sources = report.source_count,
        system_includes = report.system_include_count,
        "amalgamated {} file(s)",
        report.header_count + report.source_count
    );
    for path in &report.written {
        println!("{}", path.display());
    }
    Ok(())
}
