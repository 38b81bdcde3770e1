use std::path::{Path, PathBuf};

use tracing::debug;

use crate::dialect::{registry_from_name, Registry};
use crate::error::SqlfmtError;
use crate::mode::Mode;
use crate::options::CommaStyle;

const CONFIG_FILE_NAME: &str = "sqlfmt.toml";

const KNOWN_KEYS: &[&str] = &[
    "distance",
    "comma_style",
    "lower_cased",
    "colorized",
    "dialects",
    "registry",
    "exclude",
];

/// Load sqlfmt configuration from a sqlfmt.toml file.
/// Searches the parent directories of `files` if no config path is given.
pub fn load_config(files: &[PathBuf], config_path: Option<&Path>) -> Result<Mode, SqlfmtError> {
    let mut mode = Mode::default();

    let config_file = match config_path {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(path) => {
            return Err(SqlfmtError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        None => find_config_file(files),
    };

    if let Some(path) = config_file {
        debug!(path = %path.display(), "loading config");
        let table = load_config_from_path(&path)?;
        apply_config(&mut mode, &table)?;
    }

    Ok(mode)
}

/// The nearest sqlfmt.toml in the parent directories of the given files.
fn find_config_file(files: &[PathBuf]) -> Option<PathBuf> {
    get_common_parents(files)
        .into_iter()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.exists())
}

/// Parent directories of the given paths, most specific first.
fn get_common_parents(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut parents = Vec::new();

    for file in files {
        let start = if file.is_dir() {
            file.clone()
        } else {
            file.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };

        let mut current = Some(start.as_path());
        while let Some(dir) = current {
            let dir_buf = dir.to_path_buf();
            if !parents.contains(&dir_buf) {
                parents.push(dir_buf);
            }
            current = dir.parent();
        }
    }

    parents
}

fn load_config_from_path(path: &Path) -> Result<toml::Table, SqlfmtError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn apply_config(mode: &mut Mode, config: &toml::Table) -> Result<(), SqlfmtError> {
    if let Some(key) = config.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        return Err(SqlfmtError::Config(format!("Unknown config option: {}", key)));
    }

    if let Some(value) = config.get("distance") {
        let distance = value
            .as_integer()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| invalid("distance", "a non-negative integer"))?;
        mode.format.distance = distance;
    }

    if let Some(value) = config.get("comma_style") {
        mode.format.comma_style = value
            .clone()
            .try_into::<CommaStyle>()
            .map_err(|_| invalid("comma_style", "\"left\" or \"right\""))?;
    }

    if let Some(value) = config.get("lower_cased") {
        mode.format.lower_cased = value
            .as_bool()
            .ok_or_else(|| invalid("lower_cased", "a boolean"))?;
    }

    if let Some(value) = config.get("colorized") {
        mode.format.colorized = value
            .as_bool()
            .ok_or_else(|| invalid("colorized", "a boolean"))?;
    }

    if let Some(value) = config.get("dialects") {
        for name in string_list(value, "dialects")? {
            mode.format.dialects.push(registry_from_name(&name)?);
        }
    }

    if let Some(value) = config.get("registry") {
        let registries: Vec<Registry> = value
            .clone()
            .try_into()
            .map_err(|e| SqlfmtError::Config(format!("Invalid registry table: {}", e)))?;
        mode.format.dialects.extend(registries);
    }

    if let Some(value) = config.get("exclude") {
        mode.exclude = string_list(value, "exclude")?;
    }

    Ok(())
}

fn string_list(value: &toml::Value, key: &str) -> Result<Vec<String>, SqlfmtError> {
    value
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|v| v.as_str().map(String::from))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| invalid(key, "an array of strings"))
}

fn invalid(key: &str, expected: &str) -> SqlfmtError {
    SqlfmtError::Config(format!("Invalid value for {}: expected {}", key, expected))
}
