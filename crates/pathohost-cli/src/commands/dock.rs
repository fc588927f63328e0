use super::report;
use crate::cli::DockArgs;
use crate::config::{AppConfig, ConfigOverrides};
use crate::error::{CliError, Result};
use crate::utils::parser::parse_triple;
use crate::utils::progress::CliProgressHandler;
use pathohost::core::models::structure::{StructureDocument, StructureFormat};
use pathohost::engine::babel::ObabelConverter;
use pathohost::engine::progress::ProgressReporter;
use pathohost::engine::vina::VinaRunner;
use pathohost::remote::rcsb::RcsbClient;
use pathohost::viewer::scene::Scene;
use pathohost::workflows::session::Session;
use std::path::Path;
use tracing::info;

pub fn overrides(args: &DockArgs, base: ConfigOverrides) -> Result<ConfigOverrides> {
    let triple = |value: &Option<String>| -> Result<Option<[f64; 3]>> {
        value
            .as_deref()
            .map(parse_triple)
            .transpose()
            .map_err(|e| CliError::Argument(e.to_string()))
    };
    Ok(ConfigOverrides {
        vina_path: args.overrides.vina_path.clone(),
        obabel_path: args.overrides.obabel_path.clone(),
        rank_match: args.overrides.rank_match,
        exhaustiveness: args.exhaustiveness,
        num_modes: args.num_modes,
        center: triple(&args.center)?,
        size: triple(&args.size)?,
        ..base
    })
}

pub async fn run(args: DockArgs, config: &AppConfig) -> Result<()> {
    let mut session = Session::new(config.scratch_dir());

    match (&args.receptor.receptor, &args.receptor.pdb_id) {
        (Some(path), _) => session.load_structure(read_document(path)?),
        (None, Some(pdb_id)) => {
            let client = RcsbClient::new()?;
            if session.fetch(&client, pdb_id).await?.is_none() {
                return Err(CliError::Argument(format!(
                    "Failed to fetch structure for PDB ID '{}'.",
                    pdb_id
                )));
            }
            session.cache_current_structure()?;
        }
        (None, None) => {
            return Err(CliError::Argument(
                "Either --receptor or --pdb-id is required.".to_string(),
            ));
        }
    }
    let ligand = read_document(&args.ligand)?;

    let engine = VinaRunner::new(&config.docking.vina);
    let converter = ObabelConverter::new(&config.docking.conversion.obabel_executable);
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting docking...");
    info!("Invoking the core docking workflow...");
    let result = tokio::task::block_in_place(|| {
        session
            .dock(ligand, &config.docking, &engine, &converter, &reporter)
            .cloned()
    })?;

    report::print_results(&result.scores.entries, &result.poses, result.mismatch);
    if let Some(cause) = &result.conversion_failure {
        println!("⚠ Poses could not be converted for display: {}", cause);
    }

    let receptor_pdb = session.receptor_for_display().unwrap_or_default();
    if let Some(dir) = &args.export {
        let docked_pdbqt = std::fs::read_to_string(&result.output_path)?;
        report::export(
            dir,
            &result.scores.entries,
            &result.poses,
            &receptor_pdb,
            &docked_pdbqt,
        )?;
    }

    if let Some(view_path) = &args.view {
        if result.poses.is_empty() {
            println!("No poses available to view.");
        } else {
            let label = result.poses[0].label();
            let scene =
                Scene::pose_on_receptor(&receptor_pdb, &result.poses, 0, Some(&label), false);
            super::fetch::write_view(view_path, &scene, &label)?;
        }
    }
    Ok(())
}

fn read_document(path: &Path) -> Result<StructureDocument> {
    let document = StructureDocument::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    if document.format == StructureFormat::Pdbqt {
        return Err(CliError::Argument(format!(
            "'{}' is already PDBQT; supply the original PDB, SDF or MOL file.",
            path.display()
        )));
    }
    Ok(document)
}
