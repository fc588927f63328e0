use crate::cli::RankMatchArg;
use pathohost::engine::config::DockingConfig;
use std::path::PathBuf;

/// Fully resolved settings for one command invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub docking: DockingConfig,
    pub max_results: usize,
}

impl AppConfig {
    pub fn scratch_dir(&self) -> &std::path::Path {
        &self.docking.scratch_dir
    }
}

/// Values given as explicit command-line flags; these win over every other layer.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub scratch_dir: Option<PathBuf>,
    pub vina_path: Option<PathBuf>,
    pub obabel_path: Option<PathBuf>,
    pub exhaustiveness: Option<u32>,
    pub num_modes: Option<u32>,
    pub center: Option<[f64; 3]>,
    pub size: Option<[f64; 3]>,
    pub rank_match: Option<RankMatchArg>,
    pub max_results: Option<usize>,
}
