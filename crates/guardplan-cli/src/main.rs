//! guardplan CLI - Guard duty plan export
//!
//! Reads a guard plan as JSON and writes the styled XLSX workbook.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use guardplan_core::{period_label, ExportOptions};
use guardplan_render::{DirectorySink, FsLogoSource, ScheduleExporter, SheetLayout};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "guardplan")]
#[command(author, version, about = "Guard duty plan export", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a guard plan to XLSX
    Export {
        /// JSON guard plan ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Directory the workbook is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// File name (overrides the one in the plan)
        #[arg(short, long)]
        filename: Option<String>,

        /// Logo image (overrides the plan's logoPath)
        #[arg(long, conflicts_with = "no_logo")]
        logo: Option<PathBuf>,

        /// Export without a logo
        #[arg(long)]
        no_logo: bool,

        /// Title printed above each table
        #[arg(long, env = "GUARDPLAN_TITLE")]
        title: Option<String>,
    },

    /// Print the period header labels
    Labels {
        /// Minutes per period
        #[arg(short, long, default_value_t = 60)]
        duration: u32,

        /// Number of periods
        #[arg(short, long, default_value_t = 24)]
        count: u16,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Export {
            input,
            output_dir,
            filename,
            logo,
            no_logo,
            title,
        } => cmd_export(&input, &output_dir, filename, logo, no_logo, title),
        Commands::Labels { duration, count } => {
            cmd_labels(duration, count);
            Ok(())
        }
    }
}

fn cmd_export(
    input: &Path,
    output_dir: &Path,
    filename: Option<String>,
    logo: Option<PathBuf>,
    no_logo: bool,
    title: Option<String>,
) -> Result<()> {
    let mut options = read_options(input)?;

    if let Some(filename) = filename {
        options.filename = Some(filename);
    }
    if let Some(logo) = logo {
        options.logo_path = logo.to_string_lossy().into_owned();
    }
    if no_logo {
        options.logo_path.clear();
    }

    // Web-style logo paths resolve against the plan's directory
    let base_dir = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty() && input != Path::new("-"))
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    debug!(base_dir = %base_dir.display(), "logo base directory");

    let mut layout = SheetLayout::new();
    if let Some(title) = title {
        layout = layout.title(title);
    }

    let exporter = ScheduleExporter::new()
        .layout(layout)
        .logo_source(FsLogoSource::new().base_dir(base_dir));

    let mut sink = DirectorySink::new(output_dir);
    let report = exporter.export(&options, &mut sink)?;

    let path = sink
        .saved()
        .last()
        .cloned()
        .unwrap_or_else(|| output_dir.join(&report.filename));
    println!(
        "Wrote {} ({} sheet{}, {} bytes{})",
        path.display(),
        report.sheets,
        if report.sheets == 1 { "" } else { "s" },
        report.bytes,
        if report.logo_fetched { "" } else { ", no logo" }
    );

    Ok(())
}

fn read_options(input: &Path) -> Result<ExportOptions> {
    let json = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read guard plan from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };

    serde_json::from_str(&json).with_context(|| format!("Invalid guard plan in {}", input.display()))
}

fn cmd_labels(duration: u32, count: u16) {
    for index in 0..count {
        println!("{:>3}  {}", index + 1, period_label(index, duration).replace('\n', " "));
    }
}
