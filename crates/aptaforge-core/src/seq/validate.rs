use super::{gc_content, max_homopolymer_run, tandem_repeat};
use thiserror::Error;

const MIN_GC_FRACTION: f64 = 0.3;
const MAX_GC_FRACTION: f64 = 0.7;
const MAX_HOMOPOLYMER_RUN: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Sequence too short ({length} < {min})")]
    TooShort { length: usize, min: usize },

    #[error("Sequence too long ({length} > {max})")]
    TooLong { length: usize, max: usize },

    #[error("Invalid nucleotides: {found}. Expected only A/C/G/T/U.")]
    InvalidNucleotides { found: String },

    #[error("Sequence mixes T and U; a single strand is either DNA or RNA.")]
    MixedAlphabet,

    #[error("Extreme GC content: {percent:.1}% (should be 30-70%)")]
    ExtremeGcContent { percent: f64 },

    #[error("Long homopolymer detected: {run} consecutive '{base}'")]
    Homopolymer { base: char, run: usize },

    #[error("Simple repeat detected: {motif}")]
    SimpleRepeat { motif: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLimits {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for SequenceLimits {
    fn default() -> Self {
        Self {
            min_length: 20,
            max_length: 100,
        }
    }
}

/// Checks an aptamer candidate against the synthesis rules, reporting the
/// first violated rule. Rules are applied in order: length bounds, alphabet,
/// GC content, homopolymer runs, short tandem repeats.
pub fn validate(sequence: &str, limits: SequenceLimits) -> Result<(), ValidationError> {
    let upper = sequence.to_ascii_uppercase();
    let length = upper.chars().count();

    if length < limits.min_length {
        return Err(ValidationError::TooShort {
            length,
            min: limits.min_length,
        });
    }
    if length > limits.max_length {
        return Err(ValidationError::TooLong {
            length,
            max: limits.max_length,
        });
    }

    let mut invalid: Vec<char> = upper
        .chars()
        .filter(|c| !matches!(c, 'A' | 'C' | 'G' | 'T' | 'U'))
        .collect();
    if !invalid.is_empty() {
        invalid.sort_unstable();
        invalid.dedup();
        return Err(ValidationError::InvalidNucleotides {
            found: invalid.into_iter().collect(),
        });
    }

    if upper.contains('T') && upper.contains('U') {
        return Err(ValidationError::MixedAlphabet);
    }

    let gc = gc_content(&upper);
    if gc < MIN_GC_FRACTION || gc > MAX_GC_FRACTION {
        return Err(ValidationError::ExtremeGcContent {
            percent: gc * 100.0,
        });
    }

    if let Some((base, run)) = max_homopolymer_run(&upper) {
        if run > MAX_HOMOPOLYMER_RUN {
            return Err(ValidationError::Homopolymer { base, run });
        }
    }

    if let Some(motif) = tandem_repeat(&upper) {
        return Err(ValidationError::SimpleRepeat { motif });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> SequenceLimits {
        SequenceLimits::default()
    }

    #[test]
    fn accepts_a_reasonable_aptamer() {
        // 24 nt, 50% GC, no long runs or short repeats.
        let seq = "ACGTTGCAACGGATCCTAGCAGTT";
        assert_eq!(validate(seq, limits()), Ok(()));
    }

    #[test]
    fn rejects_short_and_long_sequences() {
        assert_eq!(
            validate("ACGT", limits()),
            Err(ValidationError::TooShort { length: 4, min: 20 })
        );
        let long = "ACGT".repeat(30);
        assert_eq!(
            validate(&long, limits()),
            Err(ValidationError::TooLong {
                length: 120,
                max: 100
            })
        );
    }

    #[test]
    fn rejects_invalid_characters() {
        let seq = "ACGTNACGTXACGTACGTAC";
        assert_eq!(
            validate(seq, limits()),
            Err(ValidationError::InvalidNucleotides {
                found: "NX".to_string()
            })
        );
    }

    #[test]
    fn rejects_mixed_t_and_u() {
        let seq = "ACGTACGUACGTACGUACGT";
        assert_eq!(validate(seq, limits()), Err(ValidationError::MixedAlphabet));
    }

    #[test]
    fn rejects_extreme_gc_content() {
        let seq = "ATATATATAATTATATATAT";
        assert!(matches!(
            validate(seq, limits()),
            Err(ValidationError::ExtremeGcContent { .. })
        ));
    }

    #[test]
    fn rejects_long_homopolymers() {
        let seq = "ACGTGGGGGGCATCGATCGA";
        assert_eq!(
            validate(seq, limits()),
            Err(ValidationError::Homopolymer { base: 'G', run: 6 })
        );
    }

    #[test]
    fn rejects_simple_repeats() {
        let seq = "ACGACGACGACGACGACGACG";
        assert_eq!(
            validate(seq, limits()),
            Err(ValidationError::SimpleRepeat {
                motif: "ACG".to_string()
            })
        );
    }

    #[test]
    fn custom_limits_are_honored() {
        let limits = SequenceLimits {
            min_length: 4,
            max_length: 10,
        };
        assert_eq!(validate("ACGTGC", limits), Ok(()));
    }
}
