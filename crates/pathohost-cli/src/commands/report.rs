use crate::error::Result;
use pathohost::core::models::pose::{Pose, ScoreEntry};
use pathohost::workflows::dock::CountMismatch;
use pathohost::workflows::export::{ExportBundle, export_results};
use std::path::Path;

/// Prints the score table and the converted poses of a run.
pub fn print_results(scores: &[ScoreEntry], poses: &[Pose], mismatch: Option<CountMismatch>) {
    println!("{}", format_scores(scores));
    if let Some(chart) = format_affinity_chart(scores) {
        println!("{}", chart);
    }
    println!("{}", format_poses(poses));
    if let Some(m) = mismatch {
        println!("⚠ {}", m);
    }
}

pub fn export(
    dir: &Path,
    scores: &[ScoreEntry],
    poses: &[Pose],
    receptor_pdb: &str,
    docked_pdbqt: &str,
) -> Result<()> {
    let bundle = ExportBundle {
        scores,
        poses,
        receptor_pdb,
        docked_pdbqt,
    };
    let written = export_results(dir, &bundle)?;
    println!("✓ Wrote {} file(s) to {}", written.len(), dir.display());
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}

fn format_scores(scores: &[ScoreEntry]) -> String {
    if scores.is_empty() {
        return "No binding affinities were reported.".to_string();
    }
    let mut lines = vec!["Binding affinities:".to_string(), "Pose  Affinity".to_string()];
    lines.extend(scores.iter().map(ToString::to_string));
    lines.join("\n")
}

const CHART_WIDTH: usize = 30;

/// Horizontal bar per score, scaled so the strongest binder spans the full width.
fn format_affinity_chart(scores: &[ScoreEntry]) -> Option<String> {
    let strongest = scores
        .iter()
        .map(|s| s.affinity.abs())
        .fold(0.0_f64, f64::max);
    if strongest == 0.0 {
        return None;
    }
    let mut lines = vec!["Binding affinity (kcal/mol):".to_string()];
    lines.extend(scores.iter().map(|entry| {
        let len = (entry.affinity.abs() / strongest * CHART_WIDTH as f64).round() as usize;
        let len = if entry.affinity != 0.0 { len.max(1) } else { 0 };
        format!(
            "  {:>4} | {:<width$} {:>7.2}",
            entry.rank,
            "█".repeat(len),
            entry.affinity,
            width = CHART_WIDTH
        )
    }));
    Some(lines.join("\n"))
}

fn format_poses(poses: &[Pose]) -> String {
    if poses.is_empty() {
        return "No poses available.".to_string();
    }
    let mut lines = vec![format!("{} pose(s):", poses.len())];
    lines.extend(poses.iter().map(|pose| match pose.affinity() {
        Some(affinity) => format!("  {:<8} {:>8.2} kcal/mol", pose.label(), affinity),
        None => format!("  {:<8} {:>8}", pose.label(), "n/a"),
    }));
    lines.join("\n")
}
