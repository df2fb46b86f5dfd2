use crate::cli::ValidateArgs;
use crate::error::Result;
use aptaforge::seq::{
    Alphabet, SaltConditions, SequenceLimits, alphabet, gc_content, melting_temperature,
    shannon_complexity, validate,
};

pub fn run(args: ValidateArgs) -> Result<()> {
    let sequence = args.sequence.trim();
    let defaults = SequenceLimits::default();
    let limits = SequenceLimits {
        min_length: args.min_length.unwrap_or(defaults.min_length),
        max_length: args.max_length.unwrap_or(defaults.max_length),
    };

    let kind = match alphabet(sequence) {
        Alphabet::Dna => "DNA",
        Alphabet::Rna => "RNA",
        Alphabet::Undetermined => "DNA/RNA",
    };
    println!("{} nt {} sequence", sequence.chars().count(), kind);
    println!("  GC content:    {:.1}%", gc_content(sequence) * 100.0);
    println!(
        "  Estimated Tm:  {:.1} °C (50 mM Na+, 2 mM Mg2+)",
        melting_temperature(sequence, SaltConditions::default())
    );
    println!("  Complexity:    {:.2}", shannon_complexity(sequence));

    validate(sequence, limits)?;
    println!("✓ Sequence passed validation.");
    Ok(())
}
