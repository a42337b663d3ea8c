//! Validate command implementation.
//!
//! Parses signature definition files and reports malformed patterns,
//! negative offsets and duplicate names without inspecting any file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use spector::Signature;

/// Names that appear more than once, ignoring case, each reported once
pub fn duplicate_names(signatures: &[Signature]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for signature in signatures {
        let key = signature.name().to_ascii_lowercase();
        if !seen.insert(key.clone()) && reported.insert(key) {
            duplicates.push(signature.name().to_string());
        }
    }
    duplicates
}

fn validate_file(path: &Path) -> Result<Vec<Signature>> {
    let signatures = spector::load_signatures(path)?;
    let duplicates = duplicate_names(&signatures);
    if !duplicates.is_empty() {
        bail!("duplicate signature names: {}", duplicates.join(", "));
    }
    Ok(signatures)
}

/// Run the validate command
pub fn run(files: &[PathBuf]) -> Result<()> {
    let mut failed = 0;

    for path in files {
        match validate_file(path) {
            Ok(signatures) => {
                let blocks: usize = signatures.iter().map(|s| s.blocks().len()).sum();
                println!(
                    "{}: {} ({} signatures, {} blocks)",
                    path.display(),
                    "ok".green(),
                    signatures.len(),
                    blocks
                );
            }
            Err(e) => {
                failed += 1;
                println!("{}: {}", path.display(), e.red());
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed validation", failed, files.len());
    }
    Ok(())
}
