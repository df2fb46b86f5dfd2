use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "aptaforge - operations CLI for a nucleic-acid aptamer design pipeline: run the external design driver, verify the installation, manage model weights, and triage design scores.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Design aptamers against a target by invoking the external pipeline driver.
    Run(RunArgs),
    /// Verify the pipeline installation end to end.
    Doctor(DoctorArgs),
    /// Manage the local store of model checkpoint and parameter files.
    Weights(WeightsArgs),
    /// Rank and filter a confidence score table produced by a design run.
    Scores(ScoresArgs),
    /// Check an aptamer sequence against the synthesis rules.
    Validate(ValidateArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Target specifier: 'pdb:1ABC', 'file:target.pdb', 'seq:ACGU...',
    /// 'smiles:...', a bare database id, or an existing path.
    #[arg(short, long, required = true, value_name = "SPEC")]
    pub target: String,

    /// Short name for the target, used in output paths.
    #[arg(short, long, required = true, value_name = "NAME")]
    pub name: String,

    /// Target type: protein, dna, rna, small_molecule or metal.
    #[arg(long, value_name = "TYPE", default_value = "protein")]
    pub target_type: String,

    /// Comma-separated target chains to keep (e.g. 'A,C'). Keeps all when omitted.
    #[arg(long, value_name = "CHAINS")]
    pub target_chains: Option<String>,

    /// Binder type: dna, rna or peptide.
    #[arg(long, value_name = "TYPE")]
    pub binder_type: Option<String>,

    /// Chain identifier assigned to the designed binder.
    #[arg(long, value_name = "CHAIN")]
    pub binder_chain: Option<char>,

    /// Minimum binder length in nucleotides/residues.
    #[arg(long, value_name = "INT")]
    pub min_length: Option<usize>,

    /// Maximum binder length in nucleotides/residues.
    #[arg(long, value_name = "INT")]
    pub max_length: Option<usize>,

    /// Number of independent designs to generate.
    #[arg(short, long, value_name = "INT")]
    pub samples: Option<usize>,

    /// Compute device: 'cpu', 'cuda' or 'cuda:<index>'.
    #[arg(short, long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Let the driver build and use an MSA for the target.
    #[arg(long)]
    pub use_msa: bool,

    /// Output-naming suffix distinguishing repeated runs on one target.
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Path to the driver script, overriding the config file.
    #[arg(long, value_name = "PATH")]
    pub driver: Option<PathBuf>,

    /// Root directory for run outputs, overriding the config file.
    #[arg(short, long, value_name = "DIR")]
    pub output_root: Option<PathBuf>,

    /// Path to the configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the fully rendered driver command line without running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S optimization.soft-iterations=100
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `doctor` subcommand.
#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Explicit Python interpreter to probe instead of auto-detection.
    #[arg(long, value_name = "PATH")]
    pub python: Option<PathBuf>,

    /// Conda environment name to look for.
    #[arg(long, value_name = "NAME")]
    pub conda_env: Option<String>,

    /// Weight-store directory, overriding the managed location.
    #[arg(long, value_name = "DIR")]
    pub weights_dir: Option<PathBuf>,

    /// Structure-viewer binary name or path.
    #[arg(long, value_name = "NAME_OR_PATH")]
    pub viewer: Option<String>,

    /// Path to the configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `weights` subcommand.
#[derive(Args, Debug)]
pub struct WeightsArgs {
    #[command(subcommand)]
    pub command: WeightsCommands,
}

/// Available commands for weight-store management.
#[derive(Subcommand, Debug)]
pub enum WeightsCommands {
    /// Audit the local store against the full weight manifest.
    Verify,
    /// Delete damaged files and re-download them from the official sources.
    Repair {
        /// Re-download every file, intact ones included.
        #[arg(long)]
        force: bool,
    },
    /// Show the absolute path to the local weight store.
    Path,
    /// Set a custom absolute path for the local weight store.
    SetPath {
        /// The new path to use for storing weight files.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the weight-store path to its default, OS-specific location.
    ResetPath,
}

/// Arguments for the `scores` subcommand.
#[derive(Args, Debug)]
pub struct ScoresArgs {
    /// Path to the score table (summary.csv of a finished run).
    #[arg(required = true, value_name = "PATH")]
    pub table: PathBuf,

    /// Minimum interface-confidence score, overriding the config file.
    #[arg(long, value_name = "FLOAT")]
    pub min_iptm: Option<f64>,

    /// Minimum structure-confidence score, overriding the config file.
    #[arg(long, value_name = "FLOAT")]
    pub min_plddt: Option<f64>,

    /// Maximum deviation in Å, overriding the config file.
    #[arg(long, value_name = "FLOAT")]
    pub max_rmsd: Option<f64>,

    /// Show only the best N accepted designs.
    #[arg(long, value_name = "INT")]
    pub top: Option<usize>,

    /// Write the accepted designs to a new CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to the configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Aptamer sequence (A/C/G/T/U, case insensitive).
    #[arg(required = true, value_name = "SEQUENCE")]
    pub sequence: String,

    /// Minimum acceptable length.
    #[arg(long, value_name = "INT")]
    pub min_length: Option<usize>,

    /// Maximum acceptable length.
    #[arg(long, value_name = "INT")]
    pub max_length: Option<usize>,
}
