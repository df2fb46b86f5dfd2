/// One required model-parameter file: its on-disk name, where to fetch it,
/// and the smallest size at which it is plausibly intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightFile {
    pub name: &'static str,
    pub url: &'static str,
    pub min_bytes: u64,
}

const MIB: u64 = 1024 * 1024;

macro_rules! mpnn_weight {
    ($name:literal) => {
        WeightFile {
            name: $name,
            url: concat!("https://files.ipd.uw.edu/pub/ligandmpnn/", $name),
            min_bytes: MIB,
        }
    };
}

/// Parameter files of the sequence-design model, one per noise level and
/// variant. The driver loads whichever the redesign stage is configured for,
/// so all of them have to be present.
pub const SEQUENCE_MODEL_WEIGHTS: &[WeightFile] = &[
    mpnn_weight!("proteinmpnn_v_48_002.pt"),
    mpnn_weight!("proteinmpnn_v_48_010.pt"),
    mpnn_weight!("proteinmpnn_v_48_020.pt"),
    mpnn_weight!("proteinmpnn_v_48_030.pt"),
    mpnn_weight!("ligandmpnn_v_32_005_25.pt"),
    mpnn_weight!("ligandmpnn_v_32_010_25.pt"),
    mpnn_weight!("ligandmpnn_v_32_020_25.pt"),
    mpnn_weight!("ligandmpnn_v_32_030_25.pt"),
];

/// Structure-prediction model checkpoint and its chemical component
/// dictionary.
pub const STRUCTURE_MODEL_FILES: &[WeightFile] = &[
    WeightFile {
        name: "boltz1_conf.ckpt",
        url: "https://huggingface.co/boltz-community/boltz-1/resolve/main/boltz1_conf.ckpt",
        min_bytes: MIB,
    },
    WeightFile {
        name: "ccd.pkl",
        url: "https://huggingface.co/boltz-community/boltz-1/resolve/main/ccd.pkl",
        min_bytes: MIB,
    },
];

/// Every file the pipeline needs, structure model first.
pub fn full_manifest() -> impl Iterator<Item = &'static WeightFile> {
    STRUCTURE_MODEL_FILES.iter().chain(SEQUENCE_MODEL_WEIGHTS)
}
