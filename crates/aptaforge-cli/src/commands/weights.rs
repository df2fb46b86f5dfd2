use crate::cli::{WeightsArgs, WeightsCommands};
use crate::error::Result;
use crate::store::{DownloadProgress, WeightStore};
use aptaforge::weights::WeightStatus;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

pub async fn run(args: WeightsArgs) -> Result<()> {
    match args.command {
        WeightsCommands::Verify => {
            handle_verify()?;
        }
        WeightsCommands::Repair { force } => {
            handle_repair(force).await?;
        }
        WeightsCommands::Path => {
            handle_path()?;
        }
        WeightsCommands::SetPath { path } => {
            handle_set_path(path)?;
        }
        WeightsCommands::ResetPath => {
            handle_reset_path()?;
        }
    }
    Ok(())
}

fn handle_verify() -> Result<()> {
    let store = WeightStore::new()?;
    println!("Auditing weight store at {:?}", store.path());

    let report = store.scan_all()?;
    for entry in &report.entries {
        let status = match entry.status {
            WeightStatus::Ok => "ok".to_string(),
            WeightStatus::Missing => "MISSING".to_string(),
            WeightStatus::Empty => "EMPTY".to_string(),
            WeightStatus::Truncated {
                actual,
                expected_min,
            } => format!("TRUNCATED ({actual} of at least {expected_min} bytes)"),
        };
        println!("  {:<28} {}", entry.file.name, status);
    }

    if report.is_complete() {
        println!("✓ All {} weight files are intact.", report.entries.len());
    } else {
        println!(
            "✗ {} of {} weight files are damaged or missing. Run 'aptaforge weights repair' to fix them.",
            report.needs_repair().count(),
            report.entries.len()
        );
    }
    Ok(())
}

async fn handle_repair(force: bool) -> Result<()> {
    let store = WeightStore::new()?;
    println!("Repairing weight store at {:?}", store.path());

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {msg:<32} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        )
        .expect("Failed to create progress style template")
        .progress_chars("#>-"),
    );
    pb.set_draw_target(indicatif::ProgressDrawTarget::stderr_with_hz(2));

    let progress_callback = |progress: DownloadProgress| match progress {
        DownloadProgress::FileStarted { name, total_bytes } => {
            pb.reset();
            pb.set_length(total_bytes.unwrap_or(0));
            pb.set_message(name);
        }
        DownloadProgress::Downloading { downloaded } => {
            pb.set_position(downloaded);
        }
        DownloadProgress::FileFinished { name } => {
            pb.println(format!("  ✓ {name}"));
        }
    };

    match store.repair(force, progress_callback).await {
        Ok(summary) => {
            pb.finish_and_clear();
            if summary.fetched.is_empty() {
                println!(
                    "✓ All {} weight files were already intact.",
                    summary.already_intact
                );
            } else {
                info!("Refetched weight files: {:?}", summary.fetched);
                println!(
                    "✓ Repair complete: {} file(s) fetched, {} already intact.",
                    summary.fetched.len(),
                    summary.already_intact
                );
            }
            Ok(())
        }
        Err(e) => {
            pb.finish_with_message("✗ Repair failed.");
            Err(e)
        }
    }
}

fn handle_path() -> Result<()> {
    let store = WeightStore::new()?;
    println!("{}", store.path().display());
    Ok(())
}

fn handle_set_path(path: PathBuf) -> Result<()> {
    WeightStore::set_custom_path(&path)?;
    println!("✓ Weight-store path set to: {}", path.display());
    Ok(())
}

fn handle_reset_path() -> Result<()> {
    WeightStore::reset_path()?;
    println!("✓ Weight-store path reset to the default location.");
    Ok(())
}
