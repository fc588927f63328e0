use super::report;
use crate::cli::PosesArgs;
use crate::config::{AppConfig, ConfigOverrides};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use pathohost::core::io::traits::TextRecordFile;
use pathohost::core::io::vina_log::{ScoreParser, ScoreReport};
use pathohost::engine::babel::ObabelConverter;
use pathohost::engine::progress::ProgressReporter;
use pathohost::workflows::dock::extract_poses;
use pathohost::workflows::session::Session;
use tracing::{info, warn};

pub fn overrides(args: &PosesArgs, base: ConfigOverrides) -> ConfigOverrides {
    ConfigOverrides {
        vina_path: args.overrides.vina_path.clone(),
        obabel_path: args.overrides.obabel_path.clone(),
        rank_match: args.overrides.rank_match,
        ..base
    }
}

pub async fn run(args: PosesArgs, config: &AppConfig) -> Result<()> {
    let session = Session::new(config.scratch_dir());
    let layout = session.layout();
    let input = args.input.clone().unwrap_or_else(|| layout.docked_output());
    if !input.is_file() {
        return Err(CliError::Argument(format!(
            "No docking output at '{}'. Run 'pathohost dock' first or pass --input.",
            input.display()
        )));
    }

    let scores_log = args.scores_log.clone().unwrap_or_else(|| layout.docking_log());
    let parser = ScoreParser::new(config.docking.rank_match.clone());
    let scores = if scores_log.is_file() {
        info!("Reading scores from {:?}", scores_log);
        parser
            .read_from_path(&scores_log)
            .map_err(|e| CliError::FileParsing {
                path: scores_log.clone(),
                source: e.into(),
            })?
    } else {
        warn!(
            "No saved docking output at {:?}; affinities come from pose remarks only.",
            scores_log
        );
        ScoreReport::default()
    };

    let converter = ObabelConverter::new(&config.docking.conversion.obabel_executable);
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let extraction = tokio::task::block_in_place(|| {
        reporter.phase("Pose extraction", || {
            extract_poses(&input, &scores, &converter, &reporter)
        })
    })?;

    report::print_results(&scores.entries, &extraction.poses, extraction.mismatch);
    if let Some(cause) = &extraction.conversion_failure {
        println!("⚠ Poses could not be converted for display: {}", cause);
    }

    if let Some(dir) = &args.export {
        let receptor_pdb = session.receptor_for_display().unwrap_or_default();
        let docked_pdbqt = std::fs::read_to_string(&input)?;
        report::export(
            dir,
            &scores.entries,
            &extraction.poses,
            &receptor_pdb,
            &docked_pdbqt,
        )?;
    }
    Ok(())
}
