use crate::cli::ScoresArgs;
use crate::config::{self, FileConfig};
use crate::error::Result;
use aptaforge::scores::{ScoreTable, write_scores};
use std::fs::File;
use tracing::info;

pub fn run(args: ScoresArgs) -> Result<()> {
    let file_config = FileConfig::load_or_default(args.config.as_deref())?;
    let criteria = config::build_criteria(&file_config, args.min_iptm, args.min_plddt, args.max_rmsd);

    info!("Loading score table from {:?}", &args.table);
    let table = ScoreTable::from_path(&args.table)?;
    if table.is_empty() {
        println!("Score table is empty: {}", args.table.display());
        return Ok(());
    }

    let accepted = table.accepted(&criteria);
    println!(
        "{} design(s), {} passing acceptance thresholds (iptm ≥ {}, plddt ≥ {}, rmsd ≤ {} Å)",
        table.len(),
        accepted.len(),
        criteria.min_iptm,
        criteria.min_plddt,
        criteria.max_rmsd
    );

    let shown = args.top.unwrap_or(accepted.len());
    for (rank, score) in accepted.iter().take(shown).enumerate() {
        println!(
            "{:>3}. {:<32} iptm {:.3}  plddt {:.3}  rmsd {:.2} Å",
            rank + 1,
            score.design,
            score.iptm,
            score.complex_plddt,
            score.rmsd
        );
    }
    if accepted.len() > shown {
        println!("  ... and {} more.", accepted.len() - shown);
    }

    if let Some(output) = &args.output {
        write_scores(accepted.iter().copied(), File::create(output)?)?;
        println!("✓ Accepted designs written to: {}", output.display());
    }

    Ok(())
}
