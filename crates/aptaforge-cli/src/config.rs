use crate::cli::{DoctorArgs, RunArgs};
use crate::error::{CliError, Result};
use aptaforge::design::{
    DesignJob, DesignJobBuilder, Device, InteractionParams, OptimizationParams, TargetSource,
};
use aptaforge::doctor::DoctorConfig;
use aptaforge::scores::AcceptanceCriteria;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialDriverConfig {
    pub python: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub conda_env: Option<String>,
    pub working_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialOutputsConfig {
    pub root: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialDoctorConfig {
    pub viewer: Option<String>,
    pub imports: Option<Vec<String>>,
}

/// On-disk configuration. Hyperparameter sections deserialize straight into
/// the core types, which fill omitted keys from their defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub driver: Option<PartialDriverConfig>,
    pub outputs: Option<PartialOutputsConfig>,
    pub optimization: Option<OptimizationParams>,
    pub interaction: Option<InteractionParams>,
    pub acceptance: Option<AcceptanceCriteria>,
    pub doctor: Option<PartialDoctorConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Everything the `run` command needs: the validated job plus where and how
/// to launch the driver.
pub struct RunConfig {
    pub job: DesignJob,
    pub python: PathBuf,
    pub script: PathBuf,
    pub working_dir: Option<PathBuf>,
    pub output_root: PathBuf,
    pub criteria: AcceptanceCriteria,
}

pub fn build_run_config(args: &RunArgs, mut file: FileConfig) -> Result<RunConfig> {
    apply_set_values(&mut file, &args.set_values)?;

    let driver = file.driver.take().unwrap_or_default();
    let script = args
        .driver
        .clone()
        .or(driver.script)
        .ok_or_else(|| {
            CliError::Config(
                "A driver script is required: set `script` in the [driver] section or pass --driver."
                    .to_string(),
            )
        })?;
    let python = driver.python.unwrap_or_else(|| PathBuf::from("python3"));

    let target_source = TargetSource::parse(&args.target)?;
    let target_type = args.target_type.parse()?;

    let mut builder = DesignJobBuilder::new()
        .target_name(args.name.clone())
        .target_type(target_type)
        .target_source(target_source)
        .use_msa(args.use_msa)
        .optimization(file.optimization.take().unwrap_or_default())
        .interaction(file.interaction.take().unwrap_or_default());

    if let Some(chains) = &args.target_chains {
        builder = builder.target_chains(parse_chain_list(chains)?);
    }
    if let Some(binder_type) = &args.binder_type {
        builder = builder.binder_type(binder_type.parse()?);
    }
    if let Some(chain) = args.binder_chain {
        builder = builder.binder_chain(chain);
    }
    if args.min_length.is_some() || args.max_length.is_some() {
        builder = builder.length_bounds(
            args.min_length.unwrap_or(30),
            args.max_length.unwrap_or(60),
        );
    }
    if let Some(samples) = args.samples {
        builder = builder.samples(samples);
    }
    if let Some(device) = &args.device {
        let device = Device::from_str(device).map_err(|e| CliError::Argument(e.to_string()))?;
        builder = builder.device(device);
    }
    if let Some(suffix) = &args.suffix {
        builder = builder.suffix(suffix.clone());
    }

    let job = builder.build()?;

    Ok(RunConfig {
        job,
        python,
        script,
        working_dir: driver.working_dir,
        output_root: args
            .output_root
            .clone()
            .or(file.outputs.take().and_then(|o| o.root))
            .unwrap_or_else(|| PathBuf::from("outputs")),
        criteria: file.acceptance.take().unwrap_or_default(),
    })
}

/// Acceptance thresholds: CLI flags override the config file, which
/// overrides the defaults.
pub fn build_criteria(
    file: &FileConfig,
    min_iptm: Option<f64>,
    min_plddt: Option<f64>,
    max_rmsd: Option<f64>,
) -> AcceptanceCriteria {
    let mut criteria = file.acceptance.unwrap_or_default();
    if let Some(v) = min_iptm {
        criteria.min_iptm = v;
    }
    if let Some(v) = min_plddt {
        criteria.min_plddt = v;
    }
    if let Some(v) = max_rmsd {
        criteria.max_rmsd = v;
    }
    criteria
}

pub fn build_doctor_config(
    args: &DoctorArgs,
    file: &FileConfig,
    weights_dir: PathBuf,
) -> DoctorConfig {
    let driver = file.driver.clone().unwrap_or_default();
    let doctor = file.doctor.clone().unwrap_or_default();

    let mut config = DoctorConfig::new(weights_dir);
    if let Some(python) = args.python.clone().or(driver.python) {
        config.python = Some(python);
    }
    if let Some(env) = args.conda_env.clone().or(driver.conda_env) {
        config.conda_env = Some(env);
    }
    if let Some(viewer) = args.viewer.clone().or(doctor.viewer) {
        config.viewer = viewer;
    }
    if let Some(imports) = doctor.imports {
        config.required_imports = imports;
    }
    config
}

fn parse_chain_list(chains: &str) -> Result<Vec<char>> {
    chains
        .split(',')
        .map(|part| {
            let part = part.trim();
            let mut chars = part.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(CliError::Argument(format!(
                    "Invalid chain identifier '{part}' in chain list '{chains}'."
                ))),
            }
        })
        .collect()
}

fn apply_set_values(file: &mut FileConfig, set_values: &[String]) -> Result<()> {
    if set_values.is_empty() {
        return Ok(());
    }
    for kv_pair in set_values {
        let parts: Vec<_> = kv_pair.splitn(2, '=').collect();
        if parts.len() != 2 {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        }
        let key = parts[0];
        let value = parts[1];

        match key {
            "optimization.learning-rate" => {
                file.optimization.get_or_insert_with(Default::default).learning_rate =
                    parse_value(key, value)?;
            }
            "optimization.warmup-learning-rate" => {
                file.optimization
                    .get_or_insert_with(Default::default)
                    .warmup_learning_rate = parse_value(key, value)?;
            }
            "optimization.warmup-iterations" => {
                file.optimization
                    .get_or_insert_with(Default::default)
                    .warmup_iterations = parse_value(key, value)?;
            }
            "optimization.logits-iterations" => {
                file.optimization
                    .get_or_insert_with(Default::default)
                    .logits_iterations = parse_value(key, value)?;
            }
            "optimization.soft-iterations" => {
                file.optimization
                    .get_or_insert_with(Default::default)
                    .soft_iterations = parse_value(key, value)?;
            }
            "optimization.temp-iterations" => {
                file.optimization
                    .get_or_insert_with(Default::default)
                    .temp_iterations = parse_value(key, value)?;
            }
            "optimization.hard-iterations" => {
                file.optimization
                    .get_or_insert_with(Default::default)
                    .hard_iterations = parse_value(key, value)?;
            }
            "optimization.semi-greedy-steps" => {
                file.optimization
                    .get_or_insert_with(Default::default)
                    .semi_greedy_steps = parse_value(key, value)?;
            }
            "optimization.recycling-steps" => {
                file.optimization
                    .get_or_insert_with(Default::default)
                    .recycling_steps = parse_value(key, value)?;
            }
            "interaction.inter-chain-contacts" => {
                file.interaction
                    .get_or_insert_with(Default::default)
                    .inter_chain_contacts = parse_value(key, value)?;
            }
            "interaction.inter-chain-cutoff" => {
                file.interaction
                    .get_or_insert_with(Default::default)
                    .inter_chain_cutoff = parse_value(key, value)?;
            }
            "interaction.intra-chain-cutoff" => {
                file.interaction
                    .get_or_insert_with(Default::default)
                    .intra_chain_cutoff = parse_value(key, value)?;
            }
            "acceptance.min-iptm" => {
                file.acceptance.get_or_insert_with(Default::default).min_iptm =
                    parse_value(key, value)?;
            }
            "acceptance.min-plddt" => {
                file.acceptance.get_or_insert_with(Default::default).min_plddt =
                    parse_value(key, value)?;
            }
            "acceptance.max-rmsd" => {
                file.acceptance.get_or_insert_with(Default::default).max_rmsd =
                    parse_value(key, value)?;
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(())
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {key}: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use aptaforge::design::{BinderType, TargetType};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn parse_run_args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["aptaforge", "run", "-t", "pdb:1PPB", "-n", "thrombin"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Run(args) => args,
            _ => panic!("expected 'run' subcommand"),
        }
    }

    #[test]
    fn defaults_apply_when_file_and_flags_are_silent() {
        let args = parse_run_args(&["--driver", "boltzdesign.py"]);
        let config = build_run_config(&args, FileConfig::default()).unwrap();

        assert_eq!(config.python, PathBuf::from("python3"));
        assert_eq!(config.script, PathBuf::from("boltzdesign.py"));
        assert_eq!(config.output_root, PathBuf::from("outputs"));
        assert_eq!(config.job.target_type, TargetType::Protein);
        assert_eq!(config.job.binder_type, BinderType::Dna);
        assert_eq!(config.job.optimization, OptimizationParams::default());
        assert_eq!(config.criteria, AcceptanceCriteria::default());
    }

    #[test]
    fn file_values_are_read_and_merged() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
            [driver]
            python = "/opt/envs/design/bin/python"
            script = "/opt/pipeline/boltzdesign.py"
            working-dir = "/opt/pipeline"

            [outputs]
            root = "/data/designs"

            [optimization]
            soft-iterations = 100
            learning-rate = 0.05

            [acceptance]
            min-iptm = 0.8
            "#,
        )
        .unwrap();

        let args = parse_run_args(&[]);
        let file = FileConfig::from_file(&config_path).unwrap();
        let config = build_run_config(&args, file).unwrap();

        assert_eq!(config.python, PathBuf::from("/opt/envs/design/bin/python"));
        assert_eq!(config.script, PathBuf::from("/opt/pipeline/boltzdesign.py"));
        assert_eq!(config.working_dir, Some(PathBuf::from("/opt/pipeline")));
        assert_eq!(config.output_root, PathBuf::from("/data/designs"));
        assert_eq!(config.job.optimization.soft_iterations, 100);
        assert!((config.job.optimization.learning_rate - 0.05).abs() < 1e-12);
        // Unset keys keep their defaults.
        assert_eq!(config.job.optimization.temp_iterations, 45);
        assert!((config.criteria.min_iptm - 0.8).abs() < 1e-12);
        assert!((config.criteria.max_rmsd - 2.0).abs() < 1e-12);
    }

    #[test]
    fn cli_flags_override_file_values() {
        let args = parse_run_args(&[
            "--driver",
            "cli-driver.py",
            "--samples",
            "8",
            "--binder-type",
            "rna",
            "--binder-chain",
            "C",
            "--min-length",
            "25",
            "--max-length",
            "40",
            "--device",
            "cuda:2",
            "--suffix",
            "run3",
            "--target-chains",
            "A,B",
            "-o",
            "elsewhere",
        ]);

        let mut file = FileConfig::default();
        file.driver = Some(PartialDriverConfig {
            script: Some(PathBuf::from("file-driver.py")),
            ..Default::default()
        });
        file.outputs = Some(PartialOutputsConfig {
            root: Some(PathBuf::from("/data/designs")),
        });

        let config = build_run_config(&args, file).unwrap();
        assert_eq!(config.script, PathBuf::from("cli-driver.py"));
        assert_eq!(config.output_root, PathBuf::from("elsewhere"));
        assert_eq!(config.job.samples, 8);
        assert_eq!(config.job.binder_type, BinderType::Rna);
        assert_eq!(config.job.binder_chain, 'C');
        assert_eq!((config.job.length_min, config.job.length_max), (25, 40));
        assert_eq!(config.job.device, Device::Cuda(2));
        assert_eq!(config.job.suffix.as_deref(), Some("run3"));
        assert_eq!(config.job.target_chains, vec!['A', 'B']);
    }

    #[test]
    fn set_values_override_file_and_defaults() {
        let args = parse_run_args(&[
            "--driver",
            "boltzdesign.py",
            "-S",
            "optimization.soft-iterations=120",
            "-S",
            "acceptance.min-iptm=0.9",
            "-S",
            "interaction.inter-chain-cutoff=18.5",
        ]);

        let config = build_run_config(&args, FileConfig::default()).unwrap();
        assert_eq!(config.job.optimization.soft_iterations, 120);
        assert!((config.criteria.min_iptm - 0.9).abs() < 1e-12);
        assert!((config.job.interaction.inter_chain_cutoff - 18.5).abs() < 1e-12);
    }

    #[test]
    fn unsupported_set_key_is_rejected() {
        let args = parse_run_args(&["--driver", "d.py", "-S", "nonsense.key=1"]);
        let result = build_run_config(&args, FileConfig::default());
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn missing_driver_script_is_a_config_error() {
        let args = parse_run_args(&[]);
        let result = build_run_config(&args, FileConfig::default());
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("driver")),
            other => panic!("unexpected result: {:?}", other.map(|c| c.script)),
        }
    }

    #[test]
    fn malformed_chain_list_is_rejected() {
        let args = parse_run_args(&["--driver", "d.py", "--target-chains", "A,BC"]);
        let result = build_run_config(&args, FileConfig::default());
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[driver]\nscirpt = \"typo.py\"\n").unwrap();

        let result = FileConfig::from_file(&config_path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn criteria_precedence_is_flags_then_file_then_defaults() {
        let mut file = FileConfig::default();
        file.acceptance = Some(AcceptanceCriteria {
            min_iptm: 0.6,
            min_plddt: 0.8,
            max_rmsd: 1.5,
        });

        let criteria = build_criteria(&file, Some(0.75), None, None);
        assert!((criteria.min_iptm - 0.75).abs() < 1e-12);
        assert!((criteria.min_plddt - 0.8).abs() < 1e-12);
        assert!((criteria.max_rmsd - 1.5).abs() < 1e-12);

        let criteria = build_criteria(&FileConfig::default(), None, None, None);
        assert_eq!(criteria, AcceptanceCriteria::default());
    }
}
