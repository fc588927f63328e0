use super::babel::{ConversionRequest, FormatConverter};
use super::error::{ConversionError, EngineError};
use crate::core::models::pose::PoseBlock;
use crate::core::models::structure::StructureFormat;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// A pose block converted to the display format.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedPose {
    pub rank: usize,
    pub pdb_text: String,
}

/// Converts a single PDBQT pose block to PDB text.
///
/// The block is staged in `workdir` because the converter works on files.
/// File names carry the block's 1-based `position` as well as its rank, since
/// model serials are not guaranteed unique.
pub fn convert_pose<C: FormatConverter + ?Sized>(
    converter: &C,
    block: &PoseBlock,
    position: usize,
    workdir: &Path,
) -> Result<ConvertedPose, EngineError> {
    let input = workdir.join(format!("{}_pose_{}.pdbqt", position, block.rank));
    let output = workdir.join(format!("{}_pose_{}.pdb", position, block.rank));

    std::fs::write(&input, &block.text).map_err(|e| EngineError::io(&input, e))?;
    let request = ConversionRequest::new(
        &input,
        StructureFormat::Pdbqt,
        &output,
        StructureFormat::Pdb,
    );
    converter.convert(&request)?;

    let pdb_text = std::fs::read_to_string(&output).map_err(|e| EngineError::io(&output, e))?;
    if !pdb_text
        .lines()
        .any(|l| l.starts_with("ATOM") || l.starts_with("HETATM"))
    {
        return Err(EngineError::InvalidInput(format!(
            "conversion of pose {} produced no coordinate records",
            block.rank
        )));
    }
    Ok(ConvertedPose {
        rank: block.rank,
        pdb_text,
    })
}

/// Converts every pose block, failing closed.
///
/// Each block is attempted independently inside a temporary directory that is
/// removed on return. If any block fails, no poses are returned at all, so the
/// caller never sees a list whose positions disagree with engine ranks.
#[instrument(skip_all, name = "convert_poses", fields(poses = blocks.len()))]
pub fn convert_poses<C: FormatConverter + ?Sized>(
    converter: &C,
    blocks: &[PoseBlock],
) -> Result<Vec<ConvertedPose>, ConversionError> {
    let workdir = tempfile::Builder::new()
        .prefix("pathohost-poses-")
        .tempdir()
        .map_err(|e| ConversionError {
            rank: blocks.first().map_or(0, |b| b.rank),
            failed: blocks.len(),
            total: blocks.len(),
            source: Box::new(EngineError::io(std::env::temp_dir(), e)),
        })?;

    let mut converted = Vec::with_capacity(blocks.len());
    let mut first_failure: Option<(usize, EngineError)> = None;
    let mut failed = 0;

    for (idx, block) in blocks.iter().enumerate() {
        match convert_pose(converter, block, idx + 1, workdir.path()) {
            Ok(pose) => converted.push(pose),
            Err(e) => {
                warn!("Pose {} could not be converted: {}", block.rank, e);
                failed += 1;
                if first_failure.is_none() {
                    first_failure = Some((block.rank, e));
                }
            }
        }
    }

    if let Some((rank, source)) = first_failure {
        return Err(ConversionError {
            rank,
            failed,
            total: blocks.len(),
            source: Box::new(source),
        });
    }

    debug!("Converted {} pose(s) to PDB.", converted.len());
    Ok(converted)
}
