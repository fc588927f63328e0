use crate::cli::FetchArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use pathohost::remote::rcsb::RcsbClient;
use pathohost::viewer::scene::Scene;
use pathohost::workflows::session::Session;
use std::path::Path;
use tracing::info;

pub async fn run(args: FetchArgs, config: &AppConfig) -> Result<()> {
    let client = RcsbClient::new()?;
    let mut session = Session::new(config.scratch_dir());

    let Some(document) = session.fetch(&client, &args.pdb_id).await? else {
        return Err(CliError::Argument(format!(
            "Failed to fetch structure for PDB ID '{}'.",
            args.pdb_id
        )));
    };
    if args.preview > 0 {
        println!("{}\n...", document.preview(args.preview));
    }

    if let Some(path) = session.cache_current_structure()? {
        info!("Cached structure at {:?}", path);
        println!("✓ PDB structure saved to {}", path.display());
    }

    if let (Some(view_path), Some(document)) = (&args.view, session.current_structure()) {
        let scene = Scene::single(&document.text, args.style);
        write_view(view_path, &scene, &document.name)?;
    }
    Ok(())
}

/// Writes a scene as an HTML page and tells the user where it is.
pub fn write_view(path: &Path, scene: &Scene, title: &str) -> Result<()> {
    let html = scene.to_html(title)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    println!("✓ 3D view written to {}", path.display());
    Ok(())
}
