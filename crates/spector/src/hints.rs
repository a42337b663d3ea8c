//! Extension-keyed cache of signatures that matched before.
//!
//! Files sharing an extension usually share a type, so signatures that
//! matched earlier files with the same extension are tried before the full
//! signature set. Entries are never evicted.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::signature::Signature;

#[derive(Debug, Default)]
pub struct HintCache {
    hints: RwLock<HashMap<String, Vec<Arc<Signature>>>>,
}

impl HintCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signatures recorded for `extension`, in the order they were recorded.
    pub fn lookup(&self, extension: Option<&str>) -> Option<Vec<Arc<Signature>>> {
        let key = normalize_extension(extension?)?;
        // Lists are only ever appended to, so a poisoned lock still guards valid data.
        let hints = self.hints.read().unwrap_or_else(PoisonError::into_inner);
        hints.get(&key).cloned()
    }

    /// Append `signature` to the list for `extension`, creating it if needed.
    ///
    /// A signature already on the list is not added twice. Absent extensions
    /// are ignored.
    pub fn record(&self, extension: Option<&str>, signature: Arc<Signature>) {
        let Some(key) = extension.and_then(normalize_extension) else {
            return;
        };

        let mut hints = self.hints.write().unwrap_or_else(PoisonError::into_inner);
        let list = hints.entry(key).or_default();
        if !list.iter().any(|existing| **existing == *signature) {
            debug!(
                "Recording {} signature as hint #{} for extension",
                signature.name(),
                list.len() + 1
            );
            list.push(signature);
        }
    }

    /// Number of extensions with at least one hint
    pub fn len(&self) -> usize {
        self.hints
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn normalize_extension(extension: &str) -> Option<String> {
    let extension = extension.trim().trim_start_matches('.');
    if extension.is_empty() {
        None
    } else {
        Some(extension.to_lowercase())
    }
}

/// Extension of a file name: the text after its last `.`, trimmed and lowercased.
///
/// Dot files such as `.bashrc` yield their name after the dot.
pub fn file_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let index = name.rfind('.')?;
    normalize_extension(&name[index + 1..])
}
