//! Molecular docking using AutoDock Vina.

use super::config::{SearchBox, VinaConfig};
use super::error::EngineError;
use super::process::run_tool;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const TOOL: &str = "vina";

/// Prepared inputs and the output location for one docking run.
#[derive(Debug, Clone, PartialEq)]
pub struct DockingRequest<'a> {
    pub receptor: &'a Path,
    pub ligand: &'a Path,
    pub output: &'a Path,
}

/// Raw products of a docking run: the summary text and the multi-model pose file.
#[derive(Debug, Clone, PartialEq)]
pub struct DockingRun {
    pub stdout: String,
    pub output_path: PathBuf,
}

/// Runs a docking engine to completion.
pub trait DockingEngine {
    /// Docks `request.ligand` against `request.receptor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be launched, fails, or writes no poses.
    fn dock(&self, request: &DockingRequest<'_>) -> Result<DockingRun, EngineError>;
}

/// Wrapper for AutoDock Vina execution.
#[derive(Debug, Clone)]
pub struct VinaRunner {
    executable: PathBuf,
    exhaustiveness: u32,
    num_modes: u32,
    search_box: SearchBox,
}

impl VinaRunner {
    pub fn new(config: &VinaConfig) -> Self {
        Self {
            executable: config.executable.clone(),
            exhaustiveness: config.exhaustiveness,
            num_modes: config.num_modes,
            search_box: config.search_box,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Command-line arguments for `request`, without the executable.
    pub fn command_args(&self, request: &DockingRequest<'_>) -> Vec<OsString> {
        let center = self.search_box.center;
        let size = self.search_box.size;
        let mut args: Vec<OsString> = Vec::with_capacity(22);
        let mut push = |flag: &str, value: OsString| {
            args.push(OsString::from(flag));
            args.push(value);
        };
        push("--receptor", request.receptor.as_os_str().to_os_string());
        push("--ligand", request.ligand.as_os_str().to_os_string());
        push("--out", request.output.as_os_str().to_os_string());
        push("--center_x", center.x.to_string().into());
        push("--center_y", center.y.to_string().into());
        push("--center_z", center.z.to_string().into());
        push("--size_x", size.x.to_string().into());
        push("--size_y", size.y.to_string().into());
        push("--size_z", size.z.to_string().into());
        push("--exhaustiveness", self.exhaustiveness.to_string().into());
        push("--num_modes", self.num_modes.to_string().into());
        args
    }
}

impl DockingEngine for VinaRunner {
    #[instrument(skip_all, name = "vina_dock")]
    fn dock(&self, request: &DockingRequest<'_>) -> Result<DockingRun, EngineError> {
        info!("Running AutoDock Vina on {:?}", request.ligand);
        let output = run_tool(TOOL, &self.executable, &self.command_args(request))?;

        if !request.output.is_file() {
            return Err(EngineError::MissingOutput {
                tool: TOOL,
                path: request.output.to_path_buf(),
            });
        }

        debug!(
            "AutoDock Vina completed successfully. Output in {:?}",
            request.output
        );
        Ok(DockingRun {
            stdout: output.stdout,
            output_path: request.output.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    fn runner() -> VinaRunner {
        VinaRunner::new(&VinaConfig {
            executable: PathBuf::from("vina"),
            exhaustiveness: 8,
            num_modes: 9,
            search_box: SearchBox::new(Point3::new(1.5, -2.0, 0.0), Vector3::new(20.0, 22.5, 18.0)),
        })
    }

    #[test]
    fn command_args_follow_vina_flag_order() {
        let request = DockingRequest {
            receptor: Path::new("data/receptor.pdbqt"),
            ligand: Path::new("data/ligand.pdbqt"),
            output: Path::new("data/docked_output.pdbqt"),
        };
        let args: Vec<String> = runner()
            .command_args(&request)
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "--receptor",
                "data/receptor.pdbqt",
                "--ligand",
                "data/ligand.pdbqt",
                "--out",
                "data/docked_output.pdbqt",
                "--center_x",
                "1.5",
                "--center_y",
                "-2",
                "--center_z",
                "0",
                "--size_x",
                "20",
                "--size_y",
                "22.5",
                "--size_z",
                "18",
                "--exhaustiveness",
                "8",
                "--num_modes",
                "9",
            ]
        );
    }

    #[test]
    fn missing_vina_is_reported_as_unavailable() {
        let config = VinaConfig {
            executable: PathBuf::from("/nonexistent/vina"),
            exhaustiveness: 8,
            num_modes: 9,
            search_box: SearchBox::default(),
        };
        let request = DockingRequest {
            receptor: Path::new("r.pdbqt"),
            ligand: Path::new("l.pdbqt"),
            output: Path::new("o.pdbqt"),
        };
        assert!(matches!(
            VinaRunner::new(&config).dock(&request),
            Err(EngineError::ToolUnavailable { tool: "vina", .. })
        ));
    }
}
