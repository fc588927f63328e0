use super::scratch::ScratchLayout;
use crate::core::io::pdbqt::split_models;
use crate::core::io::vina_log::{ScoreParser, ScoreReport};
use crate::core::models::pose::{Pose, PoseBlock};
use crate::core::models::structure::{StructureDocument, StructureFormat};
use crate::engine::babel::{FormatConverter, prepare_ligand, prepare_receptor};
use crate::engine::config::DockingConfig;
use crate::engine::convert::{ConvertedPose, convert_poses};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::vina::{DockingEngine, DockingRequest};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Receptor and ligand supplied for one docking run.
#[derive(Debug, Clone, PartialEq)]
pub struct DockingInputs {
    /// Host protein in PDB format.
    pub receptor: StructureDocument,
    /// Small molecule in SDF or MOL format.
    pub ligand: StructureDocument,
}

/// Number of scores and poses recovered when the two disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountMismatch {
    pub scores: usize,
    pub poses: usize,
}

impl fmt::Display for CountMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Docking reported {} score(s) but {} pose(s); ",
            self.scores, self.poses
        )?;
        if self.scores < self.poses {
            write!(f, "poses without a score use their own REMARK affinity.")
        } else {
            write!(f, "scores without a matching pose are not shown.")
        }
    }
}

/// Poses recovered from a docking output file, paired with their scores.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseExtraction {
    pub poses: Vec<Pose>,
    pub mismatch: Option<CountMismatch>,
    /// Cause of a failed conversion batch; `poses` is empty when set.
    pub conversion_failure: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DockingResult {
    pub stdout: String,
    pub scores: ScoreReport,
    pub poses: Vec<Pose>,
    pub output_path: PathBuf,
    pub mismatch: Option<CountMismatch>,
    pub conversion_failure: Option<String>,
}

/// Runs preparation, docking and pose extraction end to end.
///
/// Inputs are staged in the scratch directory under fixed names so later
/// commands can find them. A pose conversion failure is not an error: the
/// result carries no poses and records the cause instead.
#[instrument(skip_all, name = "docking_workflow")]
pub fn run<E, C>(
    inputs: &DockingInputs,
    config: &DockingConfig,
    engine: &E,
    converter: &C,
    reporter: &ProgressReporter,
) -> Result<DockingResult, EngineError>
where
    E: DockingEngine + ?Sized,
    C: FormatConverter + ?Sized,
{
    let layout = ScratchLayout::new(&config.scratch_dir);
    let _guard = layout.claim_run()?;

    // === Phase 1: Stage and prepare inputs ===
    let (receptor_pdbqt, ligand_pdbqt) = reporter.phase("Preparation", || {
        stage_inputs(inputs, &layout, converter)
    })?;

    // === Phase 2: Docking ===
    let output_path = layout.docked_output();
    let run = reporter.phase("Docking", || {
        // A stale output from an earlier run must not be mistaken for this one.
        remove_if_present(&output_path)?;
        engine.dock(&DockingRequest {
            receptor: &receptor_pdbqt,
            ligand: &ligand_pdbqt,
            output: &output_path,
        })
    })?;

    let log_path = layout.docking_log();
    std::fs::write(&log_path, &run.stdout).map_err(|e| EngineError::io(&log_path, e))?;

    // === Phase 3: Scores and poses ===
    let scores = ScoreParser::new(config.rank_match.clone()).parse_report(&run.stdout);
    for rejected in &scores.rejected {
        warn!(
            "Skipped unreadable score line {}: '{}'",
            rejected.line_number, rejected.content
        );
    }
    info!("Parsed {} score(s) from docking output.", scores.entries.len());

    let extraction = reporter.phase("Pose extraction", || {
        extract_poses(&run.output_path, &scores, converter, reporter)
    })?;

    Ok(DockingResult {
        stdout: run.stdout,
        scores,
        poses: extraction.poses,
        output_path: run.output_path,
        mismatch: extraction.mismatch,
        conversion_failure: extraction.conversion_failure,
    })
}

/// Splits a multi-model docking output, converts every pose to PDB and pairs
/// each with its score.
///
/// Fails only when the output file cannot be read.
pub fn extract_poses<C: FormatConverter + ?Sized>(
    output_path: &Path,
    scores: &ScoreReport,
    converter: &C,
    reporter: &ProgressReporter,
) -> Result<PoseExtraction, EngineError> {
    let text =
        std::fs::read_to_string(output_path).map_err(|e| EngineError::io(output_path, e))?;
    let blocks = split_models(&text);
    info!("Split {} pose(s) from {:?}.", blocks.len(), output_path);

    let mismatch = (scores.entries.len() != blocks.len()).then(|| CountMismatch {
        scores: scores.entries.len(),
        poses: blocks.len(),
    });
    if let Some(m) = mismatch {
        let message = m.to_string();
        warn!("{}", message);
        reporter.report(Progress::Warning(message));
    }

    reporter.report(Progress::TaskStart {
        total_steps: blocks.len() as u64,
    });
    let converted = convert_poses(converter, &blocks);
    reporter.report(Progress::TaskFinish);

    let (poses, conversion_failure) = match converted {
        Ok(converted) => (reconcile(&blocks, converted, scores), None),
        Err(e) => {
            let message = e.to_string();
            warn!("Pose conversion failed; no poses will be shown: {}", message);
            reporter.report(Progress::Warning(message.clone()));
            (Vec::new(), Some(message))
        }
    };

    Ok(PoseExtraction {
        poses,
        mismatch,
        conversion_failure,
    })
}

/// Attaches affinities by rank, preferring the score table over the block's
/// own remark.
fn reconcile(blocks: &[PoseBlock], converted: Vec<ConvertedPose>, scores: &ScoreReport) -> Vec<Pose> {
    blocks
        .iter()
        .zip(converted)
        .map(|(block, pose)| {
            let affinity = scores
                .affinity_for_rank(pose.rank)
                .or(block.remark_affinity);
            Pose::new(pose.rank, pose.pdb_text, affinity)
        })
        .collect()
}

fn stage_inputs<C: FormatConverter + ?Sized>(
    inputs: &DockingInputs,
    layout: &ScratchLayout,
    converter: &C,
) -> Result<(PathBuf, PathBuf), EngineError> {
    if inputs.receptor.format != StructureFormat::Pdb {
        return Err(EngineError::InvalidInput(format!(
            "Receptor must be a PDB structure, got {}",
            inputs.receptor.format
        )));
    }
    if !inputs.ligand.format.is_small_molecule() {
        return Err(EngineError::InvalidInput(format!(
            "Ligand must be an SDF or MOL file, got {}",
            inputs.ligand.format
        )));
    }

    let receptor_pdb = layout.receptor_pdb();
    let ligand_input = layout.ligand_input(inputs.ligand.format);
    std::fs::write(&receptor_pdb, &inputs.receptor.text)
        .map_err(|e| EngineError::io(&receptor_pdb, e))?;
    std::fs::write(&ligand_input, &inputs.ligand.text)
        .map_err(|e| EngineError::io(&ligand_input, e))?;

    let receptor_pdbqt = layout.receptor_pdbqt();
    let ligand_pdbqt = layout.ligand_pdbqt();
    prepare_receptor(converter, &receptor_pdb, &receptor_pdbqt)?;
    prepare_ligand(converter, &ligand_input, &ligand_pdbqt)?;
    Ok((receptor_pdbqt, ligand_pdbqt))
}

fn remove_if_present(path: &Path) -> Result<(), EngineError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(EngineError::io(path, e)),
    }
}
