//! Configuration loading for the CLI.
//!
//! A TOML file provides the base [`SpectorConfig`]; command-line flags are
//! applied on top of it.
//!
//! ```toml
//! autoload_builtin = true
//! use_hints = true
//! signature_files = ["signatures/custom.json"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use spector::SpectorConfig;

/// Source options gathered from the command line
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub signature_files: Vec<PathBuf>,
    pub builtin: bool,
    pub no_hints: bool,
}

pub fn load_file(path: &Path) -> Result<SpectorConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Build the effective configuration.
///
/// Falls back to the built-in signatures when no source is configured.
pub fn resolve(options: &CliOptions) -> Result<SpectorConfig> {
    let mut config = match &options.config_path {
        Some(path) => load_file(path)?,
        None => SpectorConfig::default(),
    };

    config
        .signature_files
        .extend(options.signature_files.iter().cloned());
    if options.builtin || config.signature_files.is_empty() {
        config.autoload_builtin = true;
    }
    if options.no_hints {
        config.use_hints = false;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolve_defaults_to_builtin() {
        let config = resolve(&CliOptions::default()).unwrap();
        assert!(config.autoload_builtin);
        assert!(config.use_hints);
    }

    #[test]
    fn test_resolve_with_signature_files() {
        let options = CliOptions {
            signature_files: vec![PathBuf::from("custom.json")],
            no_hints: true,
            ..Default::default()
        };
        let config = resolve(&options).unwrap();
        assert!(!config.autoload_builtin);
        assert!(!config.use_hints);
        assert_eq!(config.signature_files, [PathBuf::from("custom.json")]);
    }

    #[test]
    fn test_resolve_from_toml() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(
            temp_file.path(),
            "use_hints = false\nsignature_files = [\"base.json\"]\n",
        )
        .unwrap();

        let options = CliOptions {
            config_path: Some(temp_file.path().to_path_buf()),
            signature_files: vec![PathBuf::from("extra.json")],
            builtin: true,
            ..Default::default()
        };
        let config = resolve(&options).unwrap();
        assert!(config.autoload_builtin);
        assert!(!config.use_hints);
        assert_eq!(
            config.signature_files,
            [PathBuf::from("base.json"), PathBuf::from("extra.json")]
        );
    }

    #[test]
    fn test_invalid_toml() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "use_hints = \"maybe\"").unwrap();
        assert!(load_file(temp_file.path()).is_err());
    }
}
