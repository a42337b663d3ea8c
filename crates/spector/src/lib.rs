//! # spector
//!
//! File type detection by magic bytes.
//!
//! This crate provides:
//! - Byte patterns with nibble wildcards (`89504E47`, `4?`, `?D`, `??`)
//! - Data blocks positioned from the start, end or current read position
//! - Signature matching against any `Read + Seek` source
//! - An extension-keyed hint cache for repeated lookups
//! - A registry that loads signatures once from pluggable providers
//!
//! ## Example
//!
//! ```no_run
//! use spector::{Spector, SpectorConfig};
//!
//! let config = SpectorConfig::builder()
//!     .autoload_builtin(true)
//!     .signature_file("my-signatures.json")
//!     .build();
//! let spector = Spector::with_config(config);
//!
//! match spector.inspect("upload.dat") {
//!     Some(info) => println!("{} ({})", info.mime, info.extension),
//!     None => println!("unknown"),
//! }
//! ```

pub mod block;
pub mod config;
pub mod error;
pub mod hints;
pub mod matcher;
pub mod pattern;
pub mod provider;
pub mod registry;
pub mod signature;

pub use block::{DataBlock, SeekMode};
pub use config::{SpectorConfig, SpectorConfigBuilder};
pub use error::{Error, Result};
pub use hints::{HintCache, file_extension};
pub use matcher::SignatureMatcher;
pub use pattern::{ByteMatcher, BytePattern, WILDCARD, format_pattern, parse_pattern};
pub use provider::{
    BuiltinProvider, JsonFileProvider, SignatureProvider, StaticProvider, builtin_signatures,
    load_signatures, parse_signatures, save_signatures,
};
pub use registry::Spector;
pub use signature::{Signature, SignatureSet, TypeInfo};
