use crate::core::models::structure::StructureFormat;
use crate::engine::error::EngineError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use sysinfo::{Pid, ProcessRefreshKind, RefreshKind, System};
use tracing::{debug, warn};

const LOCK_FILE: &str = ".docking.lock";

/// File layout of the scratch directory shared by all commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchLayout {
    root: PathBuf,
}

impl ScratchLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_exists(&self) -> Result<(), EngineError> {
        std::fs::create_dir_all(&self.root).map_err(|e| EngineError::io(&self.root, e))
    }

    /// Where a fetched entry is cached, e.g. `data/6VXX.pdb`.
    pub fn fetched_structure(&self, pdb_id: &str) -> PathBuf {
        self.root.join(format!("{}.pdb", pdb_id))
    }

    pub fn receptor_pdb(&self) -> PathBuf {
        self.root.join("receptor.pdb")
    }

    pub fn receptor_pdbqt(&self) -> PathBuf {
        self.root.join("receptor.pdbqt")
    }

    pub fn ligand_input(&self, format: StructureFormat) -> PathBuf {
        self.root.join(format!("ligand.{}", format.extension()))
    }

    pub fn ligand_pdbqt(&self) -> PathBuf {
        self.root.join("ligand.pdbqt")
    }

    pub fn docked_output(&self) -> PathBuf {
        self.root.join("docked_output.pdbqt")
    }

    /// Standard output of the last docking run, kept so scores can be re-read.
    pub fn docking_log(&self) -> PathBuf {
        self.root.join("docking_log.txt")
    }

    /// Claims the scratch directory for one docking run.
    ///
    /// Fails with [`EngineError::RunInProgress`] while another live process
    /// holds the claim. A lock left behind by a process that no longer exists
    /// is reclaimed. The claim is released when the returned guard is dropped.
    pub fn claim_run(&self) -> Result<RunGuard, EngineError> {
        self.ensure_exists()?;
        let path = self.root.join(LOCK_FILE);
        match create_lock(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            other => return other.map_err(|e| EngineError::io(&path, e)),
        }

        match lock_owner(&path) {
            Some(pid) if !process_exists(pid) => {
                warn!(
                    "Reclaiming docking lock {:?} left by process {}, which is no longer running.",
                    path, pid
                );
                std::fs::remove_file(&path).map_err(|e| EngineError::io(&path, e))?;
                create_lock(&path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::AlreadyExists => EngineError::RunInProgress {
                        lock: path.clone(),
                    },
                    _ => EngineError::io(&path, e),
                })
            }
            _ => Err(EngineError::RunInProgress { lock: path }),
        }
    }
}

fn create_lock(path: &Path) -> std::io::Result<RunGuard> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(e) = writeln!(file, "{}", std::process::id()) {
        warn!("Failed to record owner in docking lock {:?}: {}", path, e);
    }
    debug!("Claimed docking lock {:?}", path);
    Ok(RunGuard {
        path: path.to_path_buf(),
    })
}

/// PID recorded in a lock file, if it can be read.
fn lock_owner(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn process_exists(pid: u32) -> bool {
    let system = System::new_with_specifics(
        RefreshKind::new().with_processes(ProcessRefreshKind::new()),
    );
    system.process(Pid::from_u32(pid)).is_some()
}

/// Held for the duration of one docking run.
#[derive(Debug)]
pub struct RunGuard {
    path: PathBuf,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to release docking lock {:?}: {}", self.path, e);
        }
    }
}
