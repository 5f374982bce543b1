//! Sunshine CLI - global direct solar irradiance GeoTIFFs

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use sunshine_algorithms::solar::{generate_raster_with, parse_timestamp, AccuracyMode, EvaluatorParams};
use sunshine_core::io::read_geotiff;
use sunshine_core::Raster;
use sunshine_parallel::{num_cpus, ProcessingMode};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "sunshine")]
#[command(author, version, about = "Global direct solar irradiance rasters", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute direct irradiance on the 0.5° global grid and write a GeoTIFF
    Generate {
        /// UTC time as YYYYMMDDHHMM, or RFC 3339 with offset (default: now)
        #[arg(short, long)]
        start_time: Option<String>,
        /// Output file
        #[arg(short, long, default_value = "output.tif")]
        output: PathBuf,
        /// Use the high-accuracy solar position model
        #[arg(long)]
        high_accuracy: bool,
        /// Worker threads (default: all cores)
        #[arg(short = 'j', long)]
        threads: Option<usize>,
    },
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    match ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        Ok(style) => pb.set_style(style),
        Err(e) => debug!("Falling back to default spinner style: {}", e),
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_raster(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster = read_geotiff::<f64, _>(path).with_context(|| format!("Failed to read {}", path.display()));
    pb.finish_and_clear();
    let raster = raster?;
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn processing_mode(threads: Option<usize>) -> ProcessingMode {
    match threads {
        Some(n) => ProcessingMode::ParallelWith(n),
        None => ProcessingMode::Parallel,
    }
}

fn select_mode(high_accuracy: bool) -> AccuracyMode {
    if high_accuracy {
        info!("Using HIGH_ACCURACY. Please be patient.");
        AccuracyMode::HighAccuracy
    } else {
        AccuracyMode::Fast
    }
}

// ─── Commands ───────────────────────────────────────────────────────────

fn generate(
    start_time: Option<String>,
    output: PathBuf,
    high_accuracy: bool,
    threads: Option<usize>,
) -> Result<()> {
    let timestamp = match start_time.as_deref() {
        Some(value) => parse_timestamp(value).context("Invalid --start-time")?,
        None => Utc::now(),
    };
    let mode = select_mode(high_accuracy);
    let processing = processing_mode(threads);

    info!(
        "Time: {} | mode: {} | threads: {}",
        timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        mode,
        threads.unwrap_or_else(num_cpus)
    );

    let params = EvaluatorParams {
        timestamp,
        mode,
        processing,
    };

    let start = Instant::now();
    let pb = spinner("Computing direct irradiance...");
    let summary = generate_raster_with(&params, &output, None);
    pb.finish_and_clear();
    let summary = summary.with_context(|| format!("Failed to generate {}", output.display()))?;
    let elapsed = start.elapsed();

    println!(
        "  {} x {} cells, {} daylit, peak {:.1} W/m2",
        summary.cols, summary.rows, summary.daylit_cells, summary.peak_irradiance
    );
    done("Direct irradiance", &output, elapsed);
    Ok(())
}

fn info_command(input: &Path) -> Result<()> {
    let raster = read_raster(input)?;
    let (rows, cols) = raster.shape();
    let gt = raster.transform().to_gdal();
    let bounds = raster.bounds();
    let stats = raster.statistics();

    println!("File: {}", input.display());
    println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
    println!(
        "GeoTransform: [{}, {}, {}, {}, {}, {}]",
        gt[0], gt[1], gt[2], gt[3], gt[4], gt[5]
    );
    println!(
        "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
        bounds.0, bounds.1, bounds.2, bounds.3
    );
    match raster.crs() {
        Some(crs) => println!("CRS: {}", crs),
        None => println!("CRS: (none)"),
    }
    if let Some(nodata) = raster.nodata() {
        println!("NoData: {}", nodata);
    }
    println!("\nStatistics:");
    if let Some(min) = stats.min {
        println!("  Min: {:.4}", min);
    }
    if let Some(max) = stats.max {
        println!("  Max: {:.4}", max);
    }
    if let Some(mean) = stats.mean {
        println!("  Mean: {:.4}", mean);
    }
    let positive = raster.data().iter().filter(|v| **v > 0.0).count();
    println!(
        "  Valid cells: {} ({:.1}%), above zero: {}",
        stats.valid_count,
        100.0 * stats.valid_count as f64 / raster.len() as f64,
        positive
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Generate {
            start_time,
            output,
            high_accuracy,
            threads,
        } => generate(start_time, output, high_accuracy, threads),
        Commands::Info { input } => info_command(&input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_high_accuracy_notice_is_info() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();

        let mode = tracing::subscriber::with_default(subscriber, || select_mode(true));
        assert_eq!(mode, AccuracyMode::HighAccuracy);

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let line = output
            .lines()
            .find(|l| l.contains("Please be patient."))
            .expect("notice not logged");
        assert!(line.contains("INFO"), "{}", line);
        assert!(!line.contains("WARN"), "{}", line);
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["sunshine", "generate"]).unwrap();
        match cli.command {
            Commands::Generate {
                start_time,
                output,
                high_accuracy,
                threads,
            } => {
                assert!(start_time.is_none());
                assert_eq!(output, PathBuf::from("output.tif"));
                assert!(!high_accuracy);
                assert!(threads.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "sunshine",
            "-v",
            "generate",
            "-s",
            "202006211200",
            "-o",
            "solstice.tif",
            "--high-accuracy",
            "--threads",
            "2",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate {
                start_time,
                high_accuracy,
                threads,
                ..
            } => {
                assert_eq!(start_time.as_deref(), Some("202006211200"));
                assert!(high_accuracy);
                assert_eq!(processing_mode(threads), ProcessingMode::ParallelWith(2));
            }
            _ => panic!("expected generate"),
        }
    }
}
