use std::fmt;

/// Known external failure modes, recognized from driver stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverFailure {
    /// The selected compute device ran out of memory.
    DeviceMemory,
    /// Fetching a reference structure from the database failed.
    Network,
    /// A requested chain identifier does not exist in the target structure.
    UnknownChain,
    /// The structure-model checkpoint is absent or unreadable.
    MissingCheckpoint,
}

impl DriverFailure {
    /// Manual remediation for the operator.
    pub fn hint(&self) -> &'static str {
        match self {
            DriverFailure::DeviceMemory => {
                "Reduce --num-samples or the binder length bounds, or move to a larger device."
            }
            DriverFailure::Network => {
                "Pre-download the structure file and pass it with 'file:<path>' instead of a database id."
            }
            DriverFailure::UnknownChain => {
                "Check the chain identifiers in the input structure and fix --target-chains / --binder-chain."
            }
            DriverFailure::MissingCheckpoint => {
                "Run 'aptaforge weights repair' to fetch the model parameter files."
            }
        }
    }
}

impl fmt::Display for DriverFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DriverFailure::DeviceMemory => "compute device out of memory",
            DriverFailure::Network => "network failure while fetching the reference structure",
            DriverFailure::UnknownChain => "unknown chain identifier in the target structure",
            DriverFailure::MissingCheckpoint => "model checkpoint missing or unreadable",
        };
        f.write_str(text)
    }
}

const MEMORY_SIGNATURES: &[&str] = &["CUDA out of memory", "CUDA error: out of memory", "OutOfMemoryError"];
const NETWORK_SIGNATURES: &[&str] = &[
    "SSLError",
    "CERTIFICATE_VERIFY_FAILED",
    "Max retries exceeded",
    "Connection refused",
    "Temporary failure in name resolution",
    "HTTPSConnectionPool",
];
const CHAIN_SIGNATURES: &[&str] = &["chain not found", "Invalid chain", "unknown chain"];
const CHECKPOINT_SIGNATURES: &[&str] = &[".ckpt", "checkpoint"];

/// Matches driver stderr against the known failure signatures. First match
/// wins, in the order the troubleshooting runbook lists them.
pub fn classify_stderr(stderr: &str) -> Option<DriverFailure> {
    let contains_any = |signatures: &[&str]| signatures.iter().any(|sig| stderr.contains(sig));

    if contains_any(MEMORY_SIGNATURES) {
        return Some(DriverFailure::DeviceMemory);
    }
    if contains_any(NETWORK_SIGNATURES) {
        return Some(DriverFailure::Network);
    }
    if contains_any(CHAIN_SIGNATURES) {
        return Some(DriverFailure::UnknownChain);
    }
    if (stderr.contains("No such file") || stderr.contains("FileNotFoundError"))
        && contains_any(CHECKPOINT_SIGNATURES)
    {
        return Some(DriverFailure::MissingCheckpoint);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_device_memory_exhaustion() {
        let stderr = "RuntimeError: CUDA out of memory. Tried to allocate 2.50 GiB";
        assert_eq!(classify_stderr(stderr), Some(DriverFailure::DeviceMemory));
    }

    #[test]
    fn recognizes_tls_and_connection_failures() {
        for stderr in [
            "requests.exceptions.SSLError: certificate verify failed",
            "HTTPSConnectionPool(host='files.rcsb.org', port=443): Max retries exceeded",
        ] {
            assert_eq!(classify_stderr(stderr), Some(DriverFailure::Network));
        }
    }

    #[test]
    fn recognizes_bad_chain_selection() {
        let stderr = "ValueError: chain not found in structure: 'Q'";
        assert_eq!(classify_stderr(stderr), Some(DriverFailure::UnknownChain));
    }

    #[test]
    fn recognizes_missing_checkpoint() {
        let stderr = "FileNotFoundError: [Errno 2] No such file or directory: 'boltz1_conf.ckpt'";
        assert_eq!(
            classify_stderr(stderr),
            Some(DriverFailure::MissingCheckpoint)
        );
    }

    #[test]
    fn missing_unrelated_file_is_not_a_checkpoint_failure() {
        let stderr = "FileNotFoundError: No such file or directory: 'input.yaml'";
        assert_eq!(classify_stderr(stderr), None);
    }

    #[test]
    fn unknown_stderr_is_unclassified() {
        assert_eq!(classify_stderr("Traceback (most recent call last): ..."), None);
        assert_eq!(classify_stderr(""), None);
    }

    #[test]
    fn every_failure_has_a_hint() {
        for failure in [
            DriverFailure::DeviceMemory,
            DriverFailure::Network,
            DriverFailure::UnknownChain,
            DriverFailure::MissingCheckpoint,
        ] {
            assert!(!failure.hint().is_empty());
            assert!(!failure.to_string().is_empty());
        }
    }
}
