use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, ConfigOverrides};
use crate::cli::RankMatchArg;
use crate::error::{CliError, Result};
use crate::utils::parser;
use nalgebra::{Point3, Vector3};
use pathohost::engine::config::{DockingConfigBuilder, SearchBox};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Loads the config file and resolves every layer into an [`AppConfig`].
pub fn load_config(
    config_path: Option<&Path>,
    set_values: &[String],
    overrides: &ConfigOverrides,
) -> Result<AppConfig> {
    let file_config = FileConfig::load(config_path)?;
    build_config(file_config, set_values, overrides)
}

/// Resolves defaults < file < `--set` values < explicit flags.
pub fn build_config(
    file_config: FileConfig,
    set_values: &[String],
    overrides: &ConfigOverrides,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = apply_set_values(file_config, set_values)?;
    debug!("Effective file configuration: {:?}", file_config);

    let docking_file = file_config.docking.take().unwrap_or_default();
    let conversion_file = file_config.conversion.take().unwrap_or_default();
    let search_file = file_config.search.take().unwrap_or_default();

    let scratch_dir = overrides
        .scratch_dir
        .clone()
        .or(file_config.scratch_dir)
        .unwrap_or_else(|| PathBuf::from(&defaults.scratch_dir));
    let vina_path = overrides
        .vina_path
        .clone()
        .or(docking_file.vina_path)
        .unwrap_or_else(|| PathBuf::from(&defaults.vina_path));
    let obabel_path = overrides
        .obabel_path
        .clone()
        .or(conversion_file.obabel_path)
        .unwrap_or_else(|| PathBuf::from(&defaults.obabel_path));

    let exhaustiveness = overrides
        .exhaustiveness
        .or(docking_file.exhaustiveness)
        .unwrap_or(defaults.exhaustiveness);
    let num_modes = overrides
        .num_modes
        .or(docking_file.num_modes)
        .unwrap_or(defaults.num_modes);
    let center = overrides
        .center
        .or(docking_file.center)
        .unwrap_or(defaults.center);
    let size = overrides.size.or(docking_file.size).unwrap_or(defaults.size);

    let rule = match overrides.rank_match {
        Some(RankMatchArg::Digits) => "digits".to_string(),
        Some(RankMatchArg::Table) => "table".to_string(),
        None => docking_file
            .rank_match
            .unwrap_or_else(|| defaults.rank_match.clone()),
    };
    let digits = docking_file
        .rank_digits
        .unwrap_or_else(|| defaults.rank_digits.clone());
    let rank_match = parser::parse_rank_match(&rule, &digits)
        .map_err(|e| CliError::Config(e.to_string()))?;

    let max_results = overrides
        .max_results
        .or(search_file.max_results)
        .unwrap_or(defaults.max_results);

    let docking = DockingConfigBuilder::new()
        .vina_executable(vina_path)
        .obabel_executable(obabel_path)
        .exhaustiveness(exhaustiveness)
        .num_modes(num_modes)
        .search_box(SearchBox::new(
            Point3::from(center),
            Vector3::from(size),
        ))
        .rank_match(rank_match)
        .scratch_dir(scratch_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        docking,
        max_results,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();
        let value_str = value_str.trim();

        match key {
            "scratch-dir" => config.scratch_dir = Some(PathBuf::from(value_str)),
            "docking.vina-path" => {
                config
                    .docking
                    .get_or_insert_with(Default::default)
                    .vina_path = Some(PathBuf::from(value_str));
            }
            "docking.exhaustiveness" => {
                config
                    .docking
                    .get_or_insert_with(Default::default)
                    .exhaustiveness = Some(parse_value(key, value_str, "integer")?);
            }
            "docking.num-modes" => {
                config
                    .docking
                    .get_or_insert_with(Default::default)
                    .num_modes = Some(parse_value(key, value_str, "integer")?);
            }
            "docking.center" => {
                config.docking.get_or_insert_with(Default::default).center =
                    Some(parse_triple(key, value_str)?);
            }
            "docking.size" => {
                config.docking.get_or_insert_with(Default::default).size =
                    Some(parse_triple(key, value_str)?);
            }
            "docking.rank-match" => {
                config
                    .docking
                    .get_or_insert_with(Default::default)
                    .rank_match = Some(value_str.to_string());
            }
            "docking.rank-digits" => {
                config
                    .docking
                    .get_or_insert_with(Default::default)
                    .rank_digits = Some(value_str.to_string());
            }
            "conversion.obabel-path" => {
                config
                    .conversion
                    .get_or_insert_with(Default::default)
                    .obabel_path = Some(PathBuf::from(value_str));
            }
            "search.max-results" => {
                config
                    .search
                    .get_or_insert_with(Default::default)
                    .max_results = Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn parse_triple(key: &str, value: &str) -> Result<[f64; 3]> {
    parser::parse_triple(value).map_err(|e| CliError::Config(format!("{}: {}", key, e)))
}
