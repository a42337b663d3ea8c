use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::{SignatureProvider, load_signatures};
use crate::error::{Error, Result};
use crate::signature::Signature;

const PROVIDER_NAME: &str = "File Signature Provider";

/// Loads signatures from a JSON definition file.
///
/// The parsed list is cached after the first successful load. A failed load
/// is not cached, so the next call reads the file again.
#[derive(Debug)]
pub struct JsonFileProvider {
    name: String,
    path: PathBuf,
    cache: Mutex<Option<Vec<Signature>>>,
}

impl JsonFileProvider {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let name = format!("{}[{}]", PROVIDER_NAME, path.display());
        Self::build(name, path)
    }

    /// Create a provider with a custom name suffix
    pub fn with_name<P: Into<PathBuf>>(path: P, custom_name: &str) -> Self {
        let name = if custom_name.is_empty() {
            PROVIDER_NAME.to_string()
        } else {
            format!("{}[{}]", PROVIDER_NAME, custom_name)
        };
        Self::build(name, path.into())
    }

    fn build(name: String, path: PathBuf) -> Self {
        Self {
            name,
            path,
            cache: Mutex::new(None),
        }
    }
}

impl SignatureProvider for JsonFileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn signatures(&self) -> Result<Vec<Signature>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(signatures) = cache.as_ref() {
            return Ok(signatures.clone());
        }

        match load_signatures(&self.path) {
            Ok(signatures) => {
                debug!(
                    "Loaded {} signatures from {}",
                    signatures.len(),
                    self.path.display()
                );
                *cache = Some(signatures.clone());
                Ok(signatures)
            }
            Err(e) => Err(Error::SupplierLoad {
                provider: self.name.clone(),
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const JPEG: &str = r#"[{"name": "JPEG", "extension": "jpg", "mime": "image/jpeg",
        "blocks": [{"name": "soi", "offset": 0, "seek": "Begin", "bytes": "FFD8FF"}]}]"#;

    #[test]
    fn test_provider_names() {
        assert_eq!(
            JsonFileProvider::with_name("a.json", "images").name(),
            "File Signature Provider[images]"
        );
        assert_eq!(
            JsonFileProvider::with_name("a.json", "").name(),
            "File Signature Provider"
        );
        assert_eq!(
            JsonFileProvider::new("a.json").name(),
            "File Signature Provider[a.json]"
        );
    }

    #[test]
    fn test_loads_and_caches() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signatures.json");
        fs::write(&path, JPEG).unwrap();

        let provider = JsonFileProvider::new(&path);
        assert_eq!(provider.signatures().unwrap()[0].name(), "JPEG");

        // Served from the cache once loaded.
        fs::remove_file(&path).unwrap();
        assert_eq!(provider.signatures().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("later.json");

        let provider = JsonFileProvider::new(&path);
        let err = provider.signatures().unwrap_err();
        assert!(matches!(err, Error::SupplierLoad { .. }));

        fs::write(&path, JPEG).unwrap();
        assert_eq!(provider.signatures().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_json_is_supplier_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "[{\"name\": ").unwrap();

        let provider = JsonFileProvider::with_name(&path, "broken");
        match provider.signatures() {
            Err(Error::SupplierLoad { provider, message }) => {
                assert_eq!(provider, "File Signature Provider[broken]");
                assert!(message.starts_with("JSON error:"));
            }
            other => panic!("expected supplier error, got {:?}", other),
        }
    }
}
