use serde::Serialize;
use std::fmt;

/// A binding-affinity entry as reported by the docking engine's summary table.
///
/// Entries keep the order in which the engine emitted them. Affinities are in
/// kcal/mol; more negative values indicate stronger predicted binding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreEntry {
    /// 1-based rank assigned by the engine.
    pub rank: usize,
    /// Predicted binding affinity in kcal/mol.
    pub affinity: f64,
}

impl ScoreEntry {
    pub fn new(rank: usize, affinity: f64) -> Self {
        Self { rank, affinity }
    }
}

impl fmt::Display for ScoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}  {:>8.2} kcal/mol", self.rank, self.affinity)
    }
}

/// A single split model in the docking engine's native coordinate format.
///
/// Produced by the PDBQT splitter, consumed by the pose converter.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseBlock {
    /// 1-based rank: the `MODEL` serial when present, otherwise the position in the file.
    pub rank: usize,
    /// Complete `MODEL ... ENDMDL` text, newline-terminated.
    pub text: String,
    /// Affinity read from the block's own `REMARK VINA RESULT:` line, if any.
    pub remark_affinity: Option<f64>,
}

impl PoseBlock {
    /// Lines of the block that carry atomic coordinates.
    pub fn atom_lines(&self) -> impl Iterator<Item = &str> {
        self.text
            .lines()
            .filter(|line| line.starts_with("ATOM") || line.starts_with("HETATM"))
    }
}

/// A docked pose ready for display.
///
/// Immutable once created; `structure_text` is a self-contained single-model
/// block in the display format (PDB).
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    rank: usize,
    structure_text: String,
    affinity: Option<f64>,
}

impl Pose {
    pub fn new(rank: usize, structure_text: String, affinity: Option<f64>) -> Self {
        Self {
            rank,
            structure_text,
            affinity,
        }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn structure_text(&self) -> &str {
        &self.structure_text
    }

    /// Affinity paired from the engine's score table by rank. Falls back to the
    /// block's own `REMARK VINA RESULT:` value, and is `None` only when neither
    /// source has one.
    pub fn affinity(&self) -> Option<f64> {
        self.affinity
    }

    /// Default display label for the pose, e.g. `Pose 3`.
    pub fn label(&self) -> String {
        format!("Pose {}", self.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_entry_display_is_aligned() {
        let entry = ScoreEntry::new(1, -7.2);
        assert_eq!(entry.to_string(), "   1     -7.20 kcal/mol");
    }

    #[test]
    fn pose_block_atom_lines_skips_remarks_and_markers() {
        let block = PoseBlock {
            rank: 1,
            text: "MODEL 1\nREMARK VINA RESULT: -7.2 0.0 0.0\nATOM      1  C   UNL     1\nHETATM    2  O   UNL     1\nENDMDL\n".to_string(),
            remark_affinity: Some(-7.2),
        };
        let lines: Vec<_> = block.atom_lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ATOM"));
        assert!(lines[1].starts_with("HETATM"));
    }

    #[test]
    fn pose_label_uses_rank() {
        let pose = Pose::new(3, String::new(), None);
        assert_eq!(pose.label(), "Pose 3");
        assert_eq!(pose.affinity(), None);
    }
}
