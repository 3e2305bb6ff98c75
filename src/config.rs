use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DatasetError;
use crate::format::ManifestFormat;

pub const CONFIG_FILE_NAME: &str = "smdata.json";
const SUPPORTED_SCHEMA: u32 = 1;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    /// Response file used when a command is given none.
    #[serde(default)]
    pub response_file: Option<Utf8PathBuf>,
    /// Control file read instead of the one the response file names.
    #[serde(default)]
    pub control_file: Option<Utf8PathBuf>,
    /// Format for written response files; defaults to the format read.
    #[serde(default)]
    pub output_format: Option<ManifestFormat>,
    #[serde(default)]
    pub carry_header: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub response_file: Option<Utf8PathBuf>,
    pub control_file: Option<Utf8PathBuf>,
    pub output_format: Option<ManifestFormat>,
    pub carry_header: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            schema_version: SUPPORTED_SCHEMA,
            response_file: None,
            control_file: None,
            output_format: None,
            carry_header: true,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or `smdata.json` from the working directory, or from
    /// the user configuration directory.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, DatasetError> {
        let config_path = match path {
            Some(path) => Utf8PathBuf::from(path),
            None => Self::find_default().ok_or(DatasetError::MissingConfig)?,
        };

        let content = fs::read_to_string(config_path.as_std_path())
            .map_err(|_| DatasetError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| DatasetError::ConfigParse(err.to_string()))?;
        debug!(path = %config_path, "loaded configuration");

        let base_dir = match config_path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        Self::resolve_config(config, base_dir)
    }

    /// Validates a parsed config. Relative paths are taken relative to
    /// `base_dir`, the directory holding the config file.
    pub fn resolve_config(config: Config, base_dir: &Utf8Path) -> Result<ResolvedConfig, DatasetError> {
        let schema_version = config.schema_version.unwrap_or(SUPPORTED_SCHEMA);
        if schema_version != SUPPORTED_SCHEMA {
            return Err(DatasetError::ConfigParse(format!(
                "unsupported schema_version {schema_version}"
            )));
        }
        let anchor = |path: Utf8PathBuf| {
            if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            }
        };

        Ok(ResolvedConfig {
            schema_version,
            response_file: config.response_file.map(anchor),
            control_file: config.control_file.map(anchor),
            output_format: config.output_format,
            carry_header: config.carry_header.unwrap_or(true),
        })
    }

    fn find_default() -> Option<Utf8PathBuf> {
        let local = Utf8PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }
        let dirs = ProjectDirs::from("org", "StateMod", "smdata")?;
        let user = Utf8PathBuf::from_path_buf(dirs.config_dir().join(CONFIG_FILE_NAME)).ok()?;
        user.is_file().then_some(user)
    }
}
