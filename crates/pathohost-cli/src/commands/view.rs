use super::fetch::write_view;
use crate::cli::{ViewArgs, ViewCommands};
use crate::config::{AppConfig, ConfigOverrides};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use pathohost::core::io::traits::TextRecordFile;
use pathohost::core::io::vina_log::{ScoreParser, ScoreReport};
use pathohost::engine::babel::ObabelConverter;
use pathohost::engine::progress::ProgressReporter;
use pathohost::viewer::scene::Scene;
use pathohost::workflows::dock::extract_poses;
use pathohost::workflows::session::Session;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn overrides(args: &ViewArgs, base: ConfigOverrides) -> ConfigOverrides {
    match &args.command {
        ViewCommands::Pose { obabel_path, .. } => ConfigOverrides {
            obabel_path: obabel_path.clone(),
            ..base
        },
        _ => base,
    }
}

pub async fn run(args: ViewArgs, config: &AppConfig) -> Result<()> {
    let session = Session::new(config.scratch_dir());
    let layout = session.layout();

    let (scene, title) = match args.command {
        ViewCommands::Structure { path, style } => {
            let text = read_text(&path)?;
            (Scene::single(&text, style), file_title(&path))
        }
        ViewCommands::Complex { receptor, ligand } => {
            let receptor = receptor.unwrap_or_else(|| layout.receptor_pdb());
            let ligand = ligand.unwrap_or_else(|| layout.docked_output());
            let scene = Scene::complex(&read_text(&receptor)?, &read_text(&ligand)?);
            (scene, "Docked complex".to_string())
        }
        ViewCommands::Pose {
            pose,
            label,
            atom_labels,
            ..
        } => {
            let Some(receptor_pdb) = session.receptor_for_display() else {
                return Err(CliError::Argument(
                    "No receptor structure available. Run 'pathohost dock' first.".to_string(),
                ));
            };
            let index = pose.checked_sub(1).ok_or_else(|| {
                CliError::Argument("Pose numbers start at 1.".to_string())
            })?;

            let scores = saved_scores(&layout.docking_log(), config)?;
            let converter = ObabelConverter::new(&config.docking.conversion.obabel_executable);
            let progress_handler = CliProgressHandler::new();
            let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
            let output = layout.docked_output();
            let extraction = tokio::task::block_in_place(|| {
                extract_poses(&output, &scores, &converter, &reporter)
            })?;

            if extraction.poses.is_empty() {
                return Err(CliError::Argument(
                    "No poses could be extracted from the last docking run.".to_string(),
                ));
            }
            if index >= extraction.poses.len() {
                return Err(CliError::Argument(format!(
                    "Pose {} does not exist; the last run produced {} pose(s).",
                    pose,
                    extraction.poses.len()
                )));
            }

            let label = label.unwrap_or_else(|| extraction.poses[index].label());
            info!("Rendering {} on receptor.", label);
            let scene = Scene::pose_on_receptor(
                &receptor_pdb,
                &extraction.poses,
                index,
                Some(&label),
                atom_labels,
            );
            (scene, label)
        }
    };

    write_view(&args.output, &scene, &title)
}

fn saved_scores(path: &Path, config: &AppConfig) -> Result<ScoreReport> {
    if !path.is_file() {
        return Ok(ScoreReport::default());
    }
    ScoreParser::new(config.docking.rank_match.clone())
        .read_from_path(path)
        .map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
}

fn read_text(path: &PathBuf) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
        path: path.clone(),
        source: e.into(),
    })
}

fn file_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Structure".to_string())
}
