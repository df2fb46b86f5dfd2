use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("Empty target specifier.")]
    Empty,

    #[error(
        "Invalid structure database identifier '{0}'. Expected four alphanumeric characters starting with a digit (e.g. '1ABC')."
    )]
    InvalidPdbId(String),

    #[error("Inline sequence contains characters outside A/C/G/T/U: '{0}'.")]
    InvalidSequence(String),

    #[error("Empty SMILES string.")]
    EmptySmiles,

    #[error(
        "Cannot classify target specifier '{0}'. Use an explicit prefix: 'pdb:', 'file:', 'seq:' or 'smiles:'."
    )]
    Ambiguous(String),

    #[error("Unknown target type '{0}'. Expected protein, dna, rna, small_molecule or metal.")]
    UnknownTargetType(String),

    #[error("Unknown binder type '{0}'. Expected dna, rna or peptide.")]
    UnknownBinderType(String),
}

/// Molecular class of the fixed target, as understood by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Protein,
    Dna,
    Rna,
    SmallMolecule,
    Metal,
}

impl TargetType {
    /// Flag value and output-directory segment used by the driver.
    pub fn as_flag(&self) -> &'static str {
        match self {
            TargetType::Protein => "protein",
            TargetType::Dna => "dna",
            TargetType::Rna => "rna",
            TargetType::SmallMolecule => "small_molecule",
            TargetType::Metal => "metal",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

impl FromStr for TargetType {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "protein" => Ok(TargetType::Protein),
            "dna" => Ok(TargetType::Dna),
            "rna" => Ok(TargetType::Rna),
            "small_molecule" | "small-molecule" | "ligand" => Ok(TargetType::SmallMolecule),
            "metal" => Ok(TargetType::Metal),
            other => Err(TargetParseError::UnknownTargetType(other.to_string())),
        }
    }
}

/// Molecular class of the designed binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinderType {
    Dna,
    Rna,
    Peptide,
}

impl BinderType {
    pub fn as_flag(&self) -> &'static str {
        match self {
            BinderType::Dna => "dna",
            BinderType::Rna => "rna",
            BinderType::Peptide => "peptide",
        }
    }
}

impl fmt::Display for BinderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

impl FromStr for BinderType {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dna" => Ok(BinderType::Dna),
            "rna" => Ok(BinderType::Rna),
            "peptide" => Ok(BinderType::Peptide),
            other => Err(TargetParseError::UnknownBinderType(other.to_string())),
        }
    }
}

/// Where the target structure or identity comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    /// Four-character structure database identifier, fetched by the driver.
    PdbId(String),
    /// Local structure file handed to the driver as-is.
    File(PathBuf),
    /// Inline nucleotide or residue sequence.
    Sequence(String),
    /// Inline SMILES string for a small-molecule target.
    Smiles(String),
}

impl TargetSource {
    /// Parses an operator-supplied target specifier.
    ///
    /// Explicit prefixes always win: `pdb:1ABC`, `file:structures/t.pdb`,
    /// `seq:ACGT...`, `smiles:C1=CC=...`. Without a prefix, a bare
    /// four-character identifier starting with a digit is a database id and
    /// an existing path is a file; anything else is rejected rather than
    /// guessed, since a misclassified target fails deep inside the driver.
    pub fn parse(input: &str) -> Result<Self, TargetParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(TargetParseError::Empty);
        }

        if let Some(id) = input.strip_prefix("pdb:") {
            return Self::parse_pdb_id(id);
        }
        if let Some(path) = input.strip_prefix("file:") {
            return Ok(TargetSource::File(PathBuf::from(path)));
        }
        if let Some(seq) = input.strip_prefix("seq:") {
            return Self::parse_sequence(seq);
        }
        if let Some(smiles) = input.strip_prefix("smiles:") {
            if smiles.is_empty() {
                return Err(TargetParseError::EmptySmiles);
            }
            return Ok(TargetSource::Smiles(smiles.to_string()));
        }

        if Self::looks_like_pdb_id(input) {
            return Ok(TargetSource::PdbId(input.to_ascii_uppercase()));
        }
        if Path::new(input).exists() {
            return Ok(TargetSource::File(PathBuf::from(input)));
        }

        Err(TargetParseError::Ambiguous(input.to_string()))
    }

    fn parse_pdb_id(id: &str) -> Result<Self, TargetParseError> {
        if Self::looks_like_pdb_id(id) {
            Ok(TargetSource::PdbId(id.to_ascii_uppercase()))
        } else {
            Err(TargetParseError::InvalidPdbId(id.to_string()))
        }
    }

    fn parse_sequence(seq: &str) -> Result<Self, TargetParseError> {
        let upper = seq.to_ascii_uppercase();
        if upper.is_empty()
            || !upper
                .chars()
                .all(|c| matches!(c, 'A' | 'C' | 'G' | 'T' | 'U'))
        {
            return Err(TargetParseError::InvalidSequence(seq.to_string()));
        }
        Ok(TargetSource::Sequence(upper))
    }

    fn looks_like_pdb_id(s: &str) -> bool {
        s.len() == 4
            && s.chars().next().is_some_and(|c| c.is_ascii_digit())
            && s.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn prefixed_forms_parse() {
        assert_eq!(
            TargetSource::parse("pdb:1abc"),
            Ok(TargetSource::PdbId("1ABC".to_string()))
        );
        assert_eq!(
            TargetSource::parse("file:structures/target.pdb"),
            Ok(TargetSource::File(PathBuf::from("structures/target.pdb")))
        );
        assert_eq!(
            TargetSource::parse("seq:acgu"),
            Ok(TargetSource::Sequence("ACGU".to_string()))
        );
        assert_eq!(
            TargetSource::parse("smiles:C1=CC=CC=C1"),
            Ok(TargetSource::Smiles("C1=CC=CC=C1".to_string()))
        );
    }

    #[test]
    fn bare_pdb_id_is_recognized() {
        assert_eq!(
            TargetSource::parse("4f5s"),
            Ok(TargetSource::PdbId("4F5S".to_string()))
        );
    }

    #[test]
    fn bare_existing_path_is_a_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("target.pdb");
        std::fs::write(&path, "ATOM").unwrap();

        let spec = path.to_str().unwrap();
        assert_eq!(TargetSource::parse(spec), Ok(TargetSource::File(path)));
    }

    #[test]
    fn unclassifiable_input_is_rejected() {
        assert_eq!(
            TargetSource::parse("thrombin"),
            Err(TargetParseError::Ambiguous("thrombin".to_string()))
        );
        assert_eq!(TargetSource::parse("  "), Err(TargetParseError::Empty));
    }

    #[test]
    fn invalid_pdb_ids_are_rejected() {
        assert_eq!(
            TargetSource::parse("pdb:abcd"),
            Err(TargetParseError::InvalidPdbId("abcd".to_string()))
        );
        assert_eq!(
            TargetSource::parse("pdb:12345"),
            Err(TargetParseError::InvalidPdbId("12345".to_string()))
        );
    }

    #[test]
    fn invalid_inline_sequence_is_rejected() {
        assert!(matches!(
            TargetSource::parse("seq:ACGX"),
            Err(TargetParseError::InvalidSequence(_))
        ));
        assert!(matches!(
            TargetSource::parse("seq:"),
            Err(TargetParseError::InvalidSequence(_))
        ));
    }

    #[test]
    fn type_flags_round_trip() {
        for (s, t) in [
            ("protein", TargetType::Protein),
            ("dna", TargetType::Dna),
            ("rna", TargetType::Rna),
            ("small_molecule", TargetType::SmallMolecule),
            ("metal", TargetType::Metal),
        ] {
            assert_eq!(s.parse::<TargetType>().unwrap(), t);
            assert_eq!(t.as_flag(), s);
        }
        assert!("dna ".parse::<TargetType>().is_err());
    }

    #[test]
    fn binder_types_parse() {
        assert_eq!("DNA".parse::<BinderType>().unwrap(), BinderType::Dna);
        assert_eq!("peptide".parse::<BinderType>().unwrap(), BinderType::Peptide);
        assert!("protein".parse::<BinderType>().is_err());
    }
}
