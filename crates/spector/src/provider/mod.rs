//! Signature sources.
//!
//! A provider yields an ordered list of signatures on demand. The registry
//! asks each registered provider once, when it first loads.
//!
//! - [`StaticProvider`]: signatures built in code
//! - [`JsonFileProvider`]: a JSON definition file on disk
//! - [`BuiltinProvider`]: the definitions compiled into this crate

mod builtin;
mod file;

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::signature::Signature;

pub use builtin::{BuiltinProvider, builtin_signatures};
pub use file::JsonFileProvider;

pub trait SignatureProvider: Send + Sync {
    /// Provider name, also the key it is registered under
    fn name(&self) -> &str;

    fn signatures(&self) -> Result<Vec<Signature>>;
}

/// Provider over an in-memory list
#[derive(Debug, Clone)]
pub struct StaticProvider {
    name: String,
    signatures: Vec<Signature>,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, signatures: Vec<Signature>) -> Self {
        Self {
            name: name.into(),
            signatures,
        }
    }
}

impl SignatureProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn signatures(&self) -> Result<Vec<Signature>> {
        Ok(self.signatures.clone())
    }
}

/// Parse a JSON array of signature definitions
pub fn parse_signatures(json: &str) -> Result<Vec<Signature>> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_signatures<P: AsRef<Path>>(path: P) -> Result<Vec<Signature>> {
    let content = fs::read_to_string(&path)?;
    parse_signatures(&content)
}

pub fn save_signatures<P: AsRef<Path>>(path: P, signatures: &[Signature]) -> Result<()> {
    let content = serde_json::to_string_pretty(signatures)?;
    fs::write(path, content)?;
    Ok(())
}
