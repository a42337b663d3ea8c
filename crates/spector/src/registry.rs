//! The signature registry and inspection entry point.
//!
//! A [`Spector`] is meant to be built once at startup and shared by
//! reference (or `Arc`) with everything that inspects files:
//!
//! ```ignore
//! use spector::{Spector, SpectorConfig};
//!
//! let spector = Spector::with_config(SpectorConfig::builder().autoload_builtin(true).build());
//! if let Some(info) = spector.inspect("upload.bin") {
//!     println!("{} ({})", info.mime, info.extension);
//! }
//! ```
//!
//! Providers are asked for their signatures once, on the first inspection
//! or explicit [`Spector::load`]. Providers added after that are ignored.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::{debug, error, info, warn};

use crate::config::SpectorConfig;
use crate::error::Result;
use crate::hints::{HintCache, file_extension};
use crate::matcher::SignatureMatcher;
use crate::provider::{BuiltinProvider, JsonFileProvider, SignatureProvider};
use crate::signature::{SignatureSet, TypeInfo};

pub struct Spector {
    config: SpectorConfig,
    providers: RwLock<Vec<Arc<dyn SignatureProvider>>>,
    signatures: OnceLock<SignatureSet>,
    hints: HintCache,
}

impl Spector {
    /// Create an empty registry with default configuration
    pub fn new() -> Self {
        Self::with_config(SpectorConfig::default())
    }

    /// Create a registry, registering the providers the configuration asks for
    pub fn with_config(config: SpectorConfig) -> Self {
        let mut providers: Vec<Arc<dyn SignatureProvider>> = Vec::new();
        if config.autoload_builtin {
            info!("Auto loading builtin signatures");
            providers.push(Arc::new(BuiltinProvider));
        }
        for path in &config.signature_files {
            providers.push(Arc::new(JsonFileProvider::new(path.clone())));
        }

        let spector = Self {
            config,
            providers: RwLock::new(Vec::new()),
            signatures: OnceLock::new(),
            hints: HintCache::new(),
        };
        for provider in providers {
            spector.add_shared_provider(provider);
        }
        spector
    }

    /// Create a registry over the given providers
    pub fn with_providers<I>(providers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn SignatureProvider>>,
    {
        let spector = Self::new();
        for provider in providers {
            spector.add_shared_provider(provider);
        }
        spector
    }

    pub fn config(&self) -> &SpectorConfig {
        &self.config
    }

    pub fn hints(&self) -> &HintCache {
        &self.hints
    }

    pub fn add_provider<P: SignatureProvider + 'static>(&self, provider: P) {
        self.add_shared_provider(Arc::new(provider));
    }

    /// Register a provider. A provider with the same name as an existing one
    /// replaces it in place.
    pub fn add_shared_provider(&self, provider: Arc<dyn SignatureProvider>) {
        if self.is_loaded() {
            warn!(
                "Provider {} added after signatures were loaded, it will not be used",
                provider.name()
            );
        }

        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        match providers.iter_mut().find(|p| p.name() == provider.name()) {
            Some(existing) => {
                debug!("Replacing provider {}", provider.name());
                *existing = provider;
            }
            None => providers.push(provider),
        }
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    pub fn is_loaded(&self) -> bool {
        self.signatures.get().is_some()
    }

    /// Load signatures from all providers if not done yet.
    ///
    /// Concurrent callers block until the single load completes.
    pub fn load(&self) -> &SignatureSet {
        self.signatures.get_or_init(|| self.load_providers())
    }

    /// Loaded signatures, loading them first if needed
    pub fn signatures(&self) -> &SignatureSet {
        self.load()
    }

    fn load_providers(&self) -> SignatureSet {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        info!("Loading signatures from {} providers", providers.len());

        let mut set = SignatureSet::new();
        for provider in &providers {
            info!("Loading file signatures from {}", provider.name());
            let signatures = match provider.signatures() {
                Ok(signatures) => signatures,
                Err(e) => {
                    warn!("Skipping provider {}: {}", provider.name(), e);
                    continue;
                }
            };

            let count = signatures.len();
            for signature in signatures {
                if signature.blocks().is_empty() {
                    warn!(
                        "Signature {} from {} has no data blocks and matches any file",
                        signature.name(),
                        provider.name()
                    );
                }
                let name = signature.name().to_string();
                if !set.insert(signature) {
                    debug!(
                        "Ignoring duplicate signature {} from {}",
                        name,
                        provider.name()
                    );
                }
            }
            info!("Loaded {} file signatures from {}", count, provider.name());
        }

        info!("Loaded {} file signatures in total", set.len());
        set
    }

    /// Inspect the file at `path`.
    ///
    /// Returns `None` when no signature matches or the file cannot be read.
    pub fn inspect<P: AsRef<Path>>(&self, path: P) -> Option<TypeInfo> {
        let path = path.as_ref();
        match self.try_inspect(path) {
            Ok(info) => info,
            Err(e) => {
                error!("Error during inspection of file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Like [`inspect`](Self::inspect), but returns I/O errors instead of logging them.
    pub fn try_inspect<P: AsRef<Path>>(&self, path: P) -> Result<Option<TypeInfo>> {
        let path = path.as_ref();
        let extension = file_extension(path);
        let file = File::open(path)?;
        self.try_inspect_reader(file, extension.as_deref())
    }

    /// Inspect an already open reader. `extension` selects the hints to try first.
    pub fn inspect_reader<R: Read + Seek>(
        &self,
        reader: R,
        extension: Option<&str>,
    ) -> Option<TypeInfo> {
        match self.try_inspect_reader(reader, extension) {
            Ok(info) => info,
            Err(e) => {
                error!("Error during inspection: {}", e);
                None
            }
        }
    }

    pub fn try_inspect_reader<R: Read + Seek>(
        &self,
        reader: R,
        extension: Option<&str>,
    ) -> Result<Option<TypeInfo>> {
        let signatures = self.load();
        let mut matcher = SignatureMatcher::new(reader)?;

        if self.config.use_hints {
            if let Some(hints) = self.hints.lookup(extension) {
                if let Some(signature) = matcher.find(&hints) {
                    debug!("Matched hinted signature {}", signature.name());
                    return Ok(Some(signature.type_info()));
                }
            }
        }

        let Some(signature) = matcher.find(signatures) else {
            return Ok(None);
        };

        if self.config.use_hints {
            self.hints.record(extension, Arc::clone(signature));
        }
        Ok(Some(signature.type_info()))
    }
}

impl Default for Spector {
    fn default() -> Self {
        Self::new()
    }
}
