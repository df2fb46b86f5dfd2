use crate::cli::RunArgs;
use crate::config::{self, FileConfig};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use aptaforge::design::TargetSource;
use aptaforge::driver::DriverCommand;
use aptaforge::progress::ProgressReporter;
use aptaforge::scores::ScoreTable;
use tracing::{debug, info, warn};

pub async fn run(args: RunArgs) -> Result<()> {
    let file_config = FileConfig::load_or_default(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let run_config = config::build_run_config(&args, file_config)?;

    if let TargetSource::File(path) = &run_config.job.target_source {
        if !path.exists() {
            return Err(CliError::Argument(format!(
                "Target structure file does not exist: {}",
                path.display()
            )));
        }
    }

    let mut command = DriverCommand::for_job(
        run_config.python.clone(),
        run_config.script.clone(),
        &run_config.job,
    );
    if let Some(dir) = &run_config.working_dir {
        command = command.working_dir(dir.clone());
    }

    if args.dry_run {
        println!("{}", command.command_line());
        return Ok(());
    }

    let output_dir = run_config.job.output_dir(&run_config.output_root);
    std::fs::create_dir_all(&output_dir)?;
    info!("Run outputs will be written to {:?}", &output_dir);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Designing {} binder(s) against '{}' ({} samples, device {})...",
        run_config.job.binder_type, run_config.job.target_name, run_config.job.samples,
        run_config.job.device,
    );
    let output = command.run(&reporter).await?;
    debug!("Driver stdout:\n{}", output.stdout);

    let table_path = run_config.job.score_table_path(&run_config.output_root);
    if !table_path.exists() {
        warn!("No score table found at {:?}.", table_path);
        println!(
            "Run finished, but no score table was found at {}",
            table_path.display()
        );
        return Ok(());
    }

    let table = ScoreTable::from_path(&table_path)?;
    let accepted = table.accepted(&run_config.criteria);
    println!(
        "Run complete: {} design(s), {} passing acceptance thresholds.",
        table.len(),
        accepted.len()
    );
    if let Some(best) = table.best() {
        println!(
            "✓ Best design: {} (iptm {:.2}, plddt {:.2}, rmsd {:.2} Å)",
            best.design, best.iptm, best.complex_plddt, best.rmsd
        );
    }

    Ok(())
}
