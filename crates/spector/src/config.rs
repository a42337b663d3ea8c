use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for a [`Spector`](crate::Spector) registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectorConfig {
    /// Register the built-in signature provider on construction
    pub autoload_builtin: bool,
    /// Try signatures that matched files with the same extension first
    pub use_hints: bool,
    /// JSON definition files, one provider each
    pub signature_files: Vec<PathBuf>,
}

impl Default for SpectorConfig {
    fn default() -> Self {
        Self {
            autoload_builtin: false,
            use_hints: true,
            signature_files: Vec::new(),
        }
    }
}

impl SpectorConfig {
    /// Create a new configuration builder
    pub fn builder() -> SpectorConfigBuilder {
        SpectorConfigBuilder::default()
    }
}

/// Builder for SpectorConfig
#[derive(Debug, Clone, Default)]
pub struct SpectorConfigBuilder {
    autoload_builtin: Option<bool>,
    use_hints: Option<bool>,
    signature_files: Vec<PathBuf>,
}

impl SpectorConfigBuilder {
    /// Enable or disable the built-in signatures
    pub fn autoload_builtin(mut self, enabled: bool) -> Self {
        self.autoload_builtin = Some(enabled);
        self
    }

    /// Enable or disable the extension hint cache
    pub fn use_hints(mut self, enabled: bool) -> Self {
        self.use_hints = Some(enabled);
        self
    }

    /// Add a JSON signature definition file
    pub fn signature_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.signature_files.push(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> SpectorConfig {
        let default = SpectorConfig::default();
        SpectorConfig {
            autoload_builtin: self.autoload_builtin.unwrap_or(default.autoload_builtin),
            use_hints: self.use_hints.unwrap_or(default.use_hints),
            signature_files: self.signature_files,
        }
    }
}
