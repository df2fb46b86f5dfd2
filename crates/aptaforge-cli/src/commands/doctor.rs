use crate::cli::DoctorArgs;
use crate::config::{self, FileConfig};
use crate::error::{CliError, Result};
use crate::store::WeightStore;
use aptaforge::doctor::run_doctor;
use tracing::info;

pub async fn run(args: DoctorArgs) -> Result<()> {
    let file_config = FileConfig::load_or_default(args.config.as_deref())?;

    let weights_dir = match &args.weights_dir {
        Some(dir) => dir.clone(),
        None => WeightStore::new()?.path().to_path_buf(),
    };
    let doctor_config = config::build_doctor_config(&args, &file_config, weights_dir);

    println!("Checking pipeline installation...");
    info!("Running installation checks: {:?}", doctor_config);
    let report = run_doctor(&doctor_config).await;

    println!("{report}");

    if report.passed() {
        Ok(())
    } else {
        Err(CliError::ChecksFailed)
    }
}
