use crate::core::models::pose::{Pose, ScoreEntry};
use crate::engine::error::EngineError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SCORES_FILE: &str = "scores.csv";
pub const DOCKED_LIGAND_FILE: &str = "docked_ligand.pdbqt";
pub const DOCKED_COMPLEX_FILE: &str = "docked_complex.pdb";

const SCORE_HEADERS: [&str; 2] = ["Pose", "Binding Affinity (kcal/mol)"];

/// Writes the score table as CSV.
pub fn write_scores_csv<W: Write>(writer: W, entries: &[ScoreEntry]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(SCORE_HEADERS)?;
    for entry in entries {
        csv_writer.write_record([entry.rank.to_string(), entry.affinity.to_string()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Receptor followed by the docked poses, as one PDB-like text.
pub fn combined_complex(receptor_pdb: &str, docked_pdbqt: &str) -> String {
    format!("{}\n{}", receptor_pdb, docked_pdbqt)
}

/// Everything a finished run can be exported as.
#[derive(Debug, Clone, Copy)]
pub struct ExportBundle<'a> {
    pub scores: &'a [ScoreEntry],
    pub poses: &'a [Pose],
    pub receptor_pdb: &'a str,
    pub docked_pdbqt: &'a str,
}

/// Writes the bundle into `dir` and returns the paths written.
///
/// Produces `scores.csv`, one `pose_{rank}.pdb` per pose,
/// `docked_ligand.pdbqt` and `docked_complex.pdb`.
pub fn export_results(dir: &Path, bundle: &ExportBundle<'_>) -> Result<Vec<PathBuf>, EngineError> {
    std::fs::create_dir_all(dir).map_err(|e| EngineError::io(dir, e))?;
    let mut written = Vec::new();

    let scores_path = dir.join(SCORES_FILE);
    let file = std::fs::File::create(&scores_path).map_err(|e| EngineError::io(&scores_path, e))?;
    write_scores_csv(file, bundle.scores).map_err(|source| EngineError::Csv {
        path: scores_path.clone(),
        source,
    })?;
    written.push(scores_path);

    for pose in bundle.poses {
        let path = dir.join(format!("pose_{}.pdb", pose.rank()));
        write_text(&path, pose.structure_text())?;
        written.push(path);
    }

    let ligand_path = dir.join(DOCKED_LIGAND_FILE);
    write_text(&ligand_path, bundle.docked_pdbqt)?;
    written.push(ligand_path);

    let complex_path = dir.join(DOCKED_COMPLEX_FILE);
    write_text(
        &complex_path,
        &combined_complex(bundle.receptor_pdb, bundle.docked_pdbqt),
    )?;
    written.push(complex_path);

    info!("Exported {} file(s) to {:?}", written.len(), dir);
    Ok(written)
}

fn write_text(path: &Path, text: &str) -> Result<(), EngineError> {
    std::fs::write(path, text).map_err(|e| EngineError::io(path, e))
}
