use super::params::{Device, InteractionParams, OptimizationParams};
use super::target::{BinderType, TargetSource, TargetType};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DesignError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid target name '{0}'. Expected a non-empty name without path separators or whitespace.")]
    InvalidTargetName(String),

    #[error("Invalid chain identifier '{0}'. Expected a single ASCII uppercase letter.")]
    InvalidChainId(String),

    #[error("Binder chain '{chain}' is already a target chain.")]
    ChainCollision { chain: char },

    #[error("Invalid binder length bounds {min}..{max}: minimum must be at least 1 and not exceed maximum.")]
    InvalidLengthBounds { min: usize, max: usize },

    #[error("Sample count must be at least 1.")]
    ZeroSamples,

    #[error("Parameter '{name}' must be positive and finite, got {value}.")]
    InvalidLearningRate { name: &'static str, value: f64 },

    #[error("Cutoff '{name}' must be a positive distance in Å, got {value}.")]
    InvalidCutoff { name: &'static str, value: f64 },
}

/// A fully validated driver invocation.
///
/// Only the builder can construct one, so every job can be rendered to a
/// flag vector without further checks.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignJob {
    pub target_name: String,
    pub target_type: TargetType,
    pub target_source: TargetSource,
    /// Target chains to keep from the input structure; empty keeps all.
    pub target_chains: Vec<char>,
    pub binder_type: BinderType,
    pub binder_chain: char,
    pub length_min: usize,
    pub length_max: usize,
    pub samples: usize,
    pub device: Device,
    pub use_msa: bool,
    pub optimization: OptimizationParams,
    pub interaction: InteractionParams,
    /// Output-naming suffix distinguishing repeated runs on one target.
    pub suffix: Option<String>,
}

impl DesignJob {
    /// Renders the complete driver argument vector. Deterministic: flag
    /// order is fixed and independent of how the job was built.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--target_name".into(),
            self.target_name.clone(),
            "--target_type".into(),
            self.target_type.as_flag().into(),
        ];

        match &self.target_source {
            TargetSource::PdbId(id) => {
                args.push("--target_id".into());
                args.push(id.clone());
            }
            TargetSource::File(path) => {
                args.push("--pdb_path".into());
                args.push(path.display().to_string());
            }
            TargetSource::Sequence(seq) => {
                args.push("--target_seq".into());
                args.push(seq.clone());
            }
            TargetSource::Smiles(smiles) => {
                args.push("--smiles".into());
                args.push(smiles.clone());
            }
        }

        if !self.target_chains.is_empty() {
            args.push("--target_chains".into());
            args.push(
                self.target_chains
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }

        args.extend([
            "--binder_type".into(),
            self.binder_type.as_flag().into(),
            "--binder_chain".into(),
            self.binder_chain.to_string(),
            "--min_length".into(),
            self.length_min.to_string(),
            "--max_length".into(),
            self.length_max.to_string(),
            "--num_samples".into(),
            self.samples.to_string(),
            "--device".into(),
            self.device.to_string(),
        ]);

        if self.use_msa {
            args.push("--use_msa".into());
        }

        let opt = &self.optimization;
        args.extend([
            "--learning_rate".into(),
            opt.learning_rate.to_string(),
            "--warmup_learning_rate".into(),
            opt.warmup_learning_rate.to_string(),
            "--warmup_iterations".into(),
            opt.warmup_iterations.to_string(),
            "--logits_iterations".into(),
            opt.logits_iterations.to_string(),
            "--soft_iterations".into(),
            opt.soft_iterations.to_string(),
            "--temp_iterations".into(),
            opt.temp_iterations.to_string(),
            "--hard_iterations".into(),
            opt.hard_iterations.to_string(),
            "--semi_greedy_steps".into(),
            opt.semi_greedy_steps.to_string(),
            "--recycling_steps".into(),
            opt.recycling_steps.to_string(),
        ]);

        let inter = &self.interaction;
        args.extend([
            "--inter_chain_contacts".into(),
            inter.inter_chain_contacts.to_string(),
            "--inter_chain_cutoff".into(),
            inter.inter_chain_cutoff.to_string(),
            "--intra_chain_cutoff".into(),
            inter.intra_chain_cutoff.to_string(),
        ]);

        if let Some(suffix) = &self.suffix {
            args.push("--suffix".into());
            args.push(suffix.clone());
        }

        args
    }

    /// Directory the driver writes this run into, keyed by target type,
    /// target name and suffix.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        let leaf = match &self.suffix {
            Some(suffix) => format!("{}_{}", self.target_name, suffix),
            None => self.target_name.clone(),
        };
        root.join(self.target_type.as_flag()).join(leaf)
    }

    /// Final confidence/quality score table for this run.
    pub fn score_table_path(&self, root: &Path) -> PathBuf {
        self.output_dir(root).join("results_final").join("summary.csv")
    }
}

#[derive(Default)]
pub struct DesignJobBuilder {
    target_name: Option<String>,
    target_type: Option<TargetType>,
    target_source: Option<TargetSource>,
    target_chains: Vec<char>,
    binder_type: Option<BinderType>,
    binder_chain: Option<char>,
    length_min: Option<usize>,
    length_max: Option<usize>,
    samples: Option<usize>,
    device: Option<Device>,
    use_msa: bool,
    optimization: Option<OptimizationParams>,
    interaction: Option<InteractionParams>,
    suffix: Option<String>,
}

impl DesignJobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }
    pub fn target_type(mut self, target_type: TargetType) -> Self {
        self.target_type = Some(target_type);
        self
    }
    pub fn target_source(mut self, source: TargetSource) -> Self {
        self.target_source = Some(source);
        self
    }
    pub fn target_chains(mut self, chains: Vec<char>) -> Self {
        self.target_chains = chains;
        self
    }
    pub fn binder_type(mut self, binder_type: BinderType) -> Self {
        self.binder_type = Some(binder_type);
        self
    }
    pub fn binder_chain(mut self, chain: char) -> Self {
        self.binder_chain = Some(chain);
        self
    }
    pub fn length_bounds(mut self, min: usize, max: usize) -> Self {
        self.length_min = Some(min);
        self.length_max = Some(max);
        self
    }
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }
    pub fn device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }
    pub fn use_msa(mut self, use_msa: bool) -> Self {
        self.use_msa = use_msa;
        self
    }
    pub fn optimization(mut self, params: OptimizationParams) -> Self {
        self.optimization = Some(params);
        self
    }
    pub fn interaction(mut self, params: InteractionParams) -> Self {
        self.interaction = Some(params);
        self
    }
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn build(self) -> Result<DesignJob, DesignError> {
        let target_name = self
            .target_name
            .ok_or(DesignError::MissingParameter("target_name"))?;
        if target_name.is_empty()
            || target_name
                .chars()
                .any(|c| c.is_whitespace() || c == '/' || c == '\\')
        {
            return Err(DesignError::InvalidTargetName(target_name));
        }

        let binder_chain = self.binder_chain.unwrap_or('B');
        Self::check_chain(binder_chain)?;
        for &chain in &self.target_chains {
            Self::check_chain(chain)?;
            if chain == binder_chain {
                return Err(DesignError::ChainCollision { chain });
            }
        }

        let length_min = self.length_min.unwrap_or(30);
        let length_max = self.length_max.unwrap_or(60);
        if length_min < 1 || length_min > length_max {
            return Err(DesignError::InvalidLengthBounds {
                min: length_min,
                max: length_max,
            });
        }

        let samples = self.samples.unwrap_or(1);
        if samples < 1 {
            return Err(DesignError::ZeroSamples);
        }

        let optimization = self.optimization.unwrap_or_default();
        optimization.validate()?;
        let interaction = self.interaction.unwrap_or_default();
        interaction.validate()?;

        Ok(DesignJob {
            target_name,
            target_type: self
                .target_type
                .ok_or(DesignError::MissingParameter("target_type"))?,
            target_source: self
                .target_source
                .ok_or(DesignError::MissingParameter("target_source"))?,
            target_chains: self.target_chains,
            binder_type: self.binder_type.unwrap_or(BinderType::Dna),
            binder_chain,
            length_min,
            length_max,
            samples,
            device: self.device.unwrap_or_default(),
            use_msa: self.use_msa,
            optimization,
            interaction,
            suffix: self.suffix,
        })
    }

    fn check_chain(chain: char) -> Result<(), DesignError> {
        if chain.is_ascii_uppercase() {
            Ok(())
        } else {
            Err(DesignError::InvalidChainId(chain.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_builder() -> DesignJobBuilder {
        DesignJobBuilder::new()
            .target_name("thrombin")
            .target_type(TargetType::Protein)
            .target_source(TargetSource::PdbId("1PPB".to_string()))
    }

    #[test]
    fn minimal_job_gets_aptamer_defaults() {
        let job = minimal_builder().build().unwrap();

        assert_eq!(job.binder_type, BinderType::Dna);
        assert_eq!(job.binder_chain, 'B');
        assert_eq!((job.length_min, job.length_max), (30, 60));
        assert_eq!(job.samples, 1);
        assert_eq!(job.device, Device::Cuda(0));
        assert!(!job.use_msa);
        assert_eq!(job.optimization, OptimizationParams::default());
    }

    #[test]
    fn missing_target_is_an_error() {
        let result = DesignJobBuilder::new().target_name("t").build();
        assert_eq!(result.unwrap_err(), DesignError::MissingParameter("target_type"));
    }

    #[test]
    fn invalid_target_names_are_rejected() {
        for name in ["", "a b", "a/b"] {
            let result = minimal_builder().target_name(name).build();
            assert!(matches!(result, Err(DesignError::InvalidTargetName(_))));
        }
    }

    #[test]
    fn chain_ids_must_be_uppercase_letters() {
        let result = minimal_builder().binder_chain('b').build();
        assert_eq!(
            result.unwrap_err(),
            DesignError::InvalidChainId("b".to_string())
        );
    }

    #[test]
    fn binder_chain_must_not_collide_with_target_chains() {
        let result = minimal_builder()
            .target_chains(vec!['A', 'B'])
            .binder_chain('B')
            .build();
        assert_eq!(result.unwrap_err(), DesignError::ChainCollision { chain: 'B' });
    }

    #[test]
    fn inverted_length_bounds_are_rejected() {
        let result = minimal_builder().length_bounds(60, 30).build();
        assert_eq!(
            result.unwrap_err(),
            DesignError::InvalidLengthBounds { min: 60, max: 30 }
        );
        let result = minimal_builder().length_bounds(0, 30).build();
        assert!(matches!(
            result,
            Err(DesignError::InvalidLengthBounds { .. })
        ));
    }

    #[test]
    fn zero_samples_are_rejected() {
        let result = minimal_builder().samples(0).build();
        assert_eq!(result.unwrap_err(), DesignError::ZeroSamples);
    }

    #[test]
    fn args_cover_every_field_deterministically() {
        let job = minimal_builder()
            .target_chains(vec!['A'])
            .samples(4)
            .device(Device::Cuda(1))
            .use_msa(true)
            .suffix("run2")
            .build()
            .unwrap();

        let args = job.to_args();
        assert_eq!(args, job.to_args());

        let joined = args.join(" ");
        assert!(joined.starts_with("--target_name thrombin --target_type protein"));
        assert!(joined.contains("--target_id 1PPB"));
        assert!(joined.contains("--target_chains A"));
        assert!(joined.contains("--binder_type dna --binder_chain B"));
        assert!(joined.contains("--min_length 30 --max_length 60"));
        assert!(joined.contains("--num_samples 4"));
        assert!(joined.contains("--device cuda:1"));
        assert!(joined.contains("--use_msa"));
        assert!(joined.contains("--learning_rate 0.1"));
        assert!(joined.contains("--soft_iterations 75"));
        assert!(joined.contains("--inter_chain_cutoff 20"));
        assert!(joined.ends_with("--suffix run2"));
    }

    #[test]
    fn sequence_and_smiles_sources_render_their_own_flags() {
        let job = minimal_builder()
            .target_source(TargetSource::Sequence("ACGU".to_string()))
            .build()
            .unwrap();
        assert!(job.to_args().join(" ").contains("--target_seq ACGU"));

        let job = minimal_builder()
            .target_type(TargetType::SmallMolecule)
            .target_source(TargetSource::Smiles("CCO".to_string()))
            .build()
            .unwrap();
        assert!(job.to_args().join(" ").contains("--smiles CCO"));
    }

    #[test]
    fn output_layout_is_keyed_by_type_name_and_suffix() {
        let root = Path::new("outputs");
        let job = minimal_builder().suffix("a1").build().unwrap();
        assert_eq!(
            job.output_dir(root),
            Path::new("outputs/protein/thrombin_a1")
        );
        assert_eq!(
            job.score_table_path(root),
            Path::new("outputs/protein/thrombin_a1/results_final/summary.csv")
        );

        let job = minimal_builder().build().unwrap();
        assert_eq!(job.output_dir(root), Path::new("outputs/protein/thrombin"));
    }
}
