use crate::core::io::vina_log::RankMatch;
use nalgebra::{Point3, Vector3};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Docking search space in Ångström.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBox {
    pub center: Point3<f64>,
    /// Full edge lengths along x, y and z.
    pub size: Vector3<f64>,
}

impl SearchBox {
    pub fn new(center: Point3<f64>, size: Vector3<f64>) -> Self {
        Self { center, size }
    }

    /// Half-extents of the box along each axis.
    pub fn half_extents(&self) -> Vector3<f64> {
        self.size / 2.0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.center.coords.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::InvalidValue {
                parameter: "center",
                reason: "coordinates must be finite".to_string(),
            });
        }
        if !self.size.iter().all(|s| s.is_finite() && *s > 0.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "size",
                reason: "edge lengths must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for SearchBox {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            size: Vector3::new(20.0, 20.0, 20.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VinaConfig {
    pub executable: PathBuf,
    pub exhaustiveness: u32,
    pub num_modes: u32,
    pub search_box: SearchBox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    pub obabel_executable: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DockingConfig {
    pub vina: VinaConfig,
    pub conversion: ConversionConfig,
    pub rank_match: RankMatch,
    /// Directory holding staged inputs, prepared PDBQT files and engine output.
    pub scratch_dir: PathBuf,
}

#[derive(Default)]
pub struct DockingConfigBuilder {
    vina_executable: Option<PathBuf>,
    obabel_executable: Option<PathBuf>,
    exhaustiveness: Option<u32>,
    num_modes: Option<u32>,
    search_box: Option<SearchBox>,
    rank_match: Option<RankMatch>,
    scratch_dir: Option<PathBuf>,
}

impl DockingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vina_executable(mut self, path: PathBuf) -> Self {
        self.vina_executable = Some(path);
        self
    }
    pub fn obabel_executable(mut self, path: PathBuf) -> Self {
        self.obabel_executable = Some(path);
        self
    }
    pub fn exhaustiveness(mut self, value: u32) -> Self {
        self.exhaustiveness = Some(value);
        self
    }
    pub fn num_modes(mut self, value: u32) -> Self {
        self.num_modes = Some(value);
        self
    }
    pub fn search_box(mut self, search_box: SearchBox) -> Self {
        self.search_box = Some(search_box);
        self
    }
    pub fn rank_match(mut self, rank_match: RankMatch) -> Self {
        self.rank_match = Some(rank_match);
        self
    }
    pub fn scratch_dir(mut self, path: PathBuf) -> Self {
        self.scratch_dir = Some(path);
        self
    }

    pub fn build(self) -> Result<DockingConfig, ConfigError> {
        let exhaustiveness = self
            .exhaustiveness
            .ok_or(ConfigError::MissingParameter("exhaustiveness"))?;
        if exhaustiveness == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "exhaustiveness",
                reason: "must be at least 1".to_string(),
            });
        }
        let num_modes = self
            .num_modes
            .ok_or(ConfigError::MissingParameter("num_modes"))?;
        if num_modes == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "num_modes",
                reason: "must be at least 1".to_string(),
            });
        }
        let search_box = self
            .search_box
            .ok_or(ConfigError::MissingParameter("search_box"))?;
        search_box.validate()?;

        let vina = VinaConfig {
            executable: non_empty_path(self.vina_executable, "vina_executable")?,
            exhaustiveness,
            num_modes,
            search_box,
        };
        let conversion = ConversionConfig {
            obabel_executable: non_empty_path(self.obabel_executable, "obabel_executable")?,
        };

        Ok(DockingConfig {
            vina,
            conversion,
            rank_match: self.rank_match.unwrap_or_default(),
            scratch_dir: non_empty_path(self.scratch_dir, "scratch_dir")?,
        })
    }
}

fn non_empty_path(path: Option<PathBuf>, name: &'static str) -> Result<PathBuf, ConfigError> {
    let path = path.ok_or(ConfigError::MissingParameter(name))?;
    if path.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            parameter: name,
            reason: "path cannot be empty".to_string(),
        });
    }
    Ok(path)
}
