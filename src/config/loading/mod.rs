mod file_creation;
mod import_chain;
mod merging;

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use file_creation::create_default_config_file;
use import_chain::ImportChain;
use toml::Value;
use tracing::debug;

use super::Config;
use crate::{PulselinkError, Result};

impl Config {
    /// Loads, merges and validates the configuration at `path`
    ///
    /// A commented template is written first if the file does not exist.
    ///
    /// # Errors
    /// See [`Config::load_with_imports`] and [`Config::validate`]
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!(path = %path.display(), "Creating configuration template");
            create_default_config_file(path)?;
        }

        let config = Self::load_with_imports(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file and everything it imports
    ///
    /// Imports are listed as `imports = ["@name"]`; a missing extension
    /// means `.toml`, and paths are relative to the importing file. Imported
    /// files are layered in order, and the importing file wins over all of
    /// them.
    ///
    /// # Errors
    /// Returns an error if a file cannot be read or parsed, an import is
    /// circular, or the merged document does not match the schema
    pub fn load_with_imports(path: &Path) -> Result<Config> {
        let canonical = path.canonicalize().map_err(|e| PulselinkError::IoError {
            path: path.to_path_buf(),
            details: format!("Failed to resolve path: {e}"),
        })?;

        let merged = load_layered(&canonical, &mut ImportChain::default())?;
        merged
            .try_into()
            .map_err(|e| PulselinkError::ConfigValidation {
                component: "config parsing".to_string(),
                details: e.to_string(),
            })
    }

    /// Every file taking part in the configuration, root first
    ///
    /// Files imported more than once are listed once.
    ///
    /// # Errors
    /// Returns error if any file cannot be read or contains invalid TOML
    pub fn config_files(path: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut seen = HashSet::new();
        collect_files(path, &mut files, &mut seen)?;
        Ok(files)
    }
}

fn load_layered(path: &Path, chain: &mut ImportChain) -> Result<Value> {
    chain.visit(path, |chain| {
        let value = read_toml(path)?;

        let mut layers = Vec::new();
        for import in import_paths(&value) {
            let resolved = resolve_import_path(path, &import)?;
            let canonical = resolved
                .canonicalize()
                .map_err(|e| PulselinkError::import(e, &resolved))?;
            layers.push(load_layered(&canonical, chain)?);
        }
        layers.push(value);

        Ok(merging::layer(layers))
    })
}

fn read_toml(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| PulselinkError::import(e, path))?;
    toml::from_str(&content).map_err(|e| PulselinkError::toml_parse(e, Some(path)))
}

fn import_paths(value: &Value) -> Vec<String> {
    value
        .get("imports")
        .and_then(Value::as_array)
        .map(|imports| {
            imports
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|import| import.strip_prefix('@'))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn resolve_import_path(base: &Path, import: &str) -> Result<PathBuf> {
    let parent = base.parent().ok_or_else(|| PulselinkError::ImportError {
        path: base.to_path_buf(),
        details: "importing file has no parent directory".to_string(),
    })?;

    let mut relative = PathBuf::from(import);
    if relative.extension().is_none() {
        relative.set_extension("toml");
    }
    Ok(parent.join(relative))
}

fn collect_files(path: &Path, files: &mut Vec<PathBuf>, seen: &mut HashSet<PathBuf>) -> Result<()> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !seen.insert(canonical.clone()) {
        return Ok(());
    }
    files.push(canonical);

    if path.exists() {
        for import in import_paths(&read_toml(path)?) {
            collect_files(&resolve_import_path(path, &import)?, files, seen)?;
        }
    }
    Ok(())
}
