//! Inspect command implementation.

use std::path::{Path, PathBuf};

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use spector::Spector;

/// Outcome for one inspected path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectRecord {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn inspect_path(spector: &Spector, path: &Path) -> InspectRecord {
    let mut record = InspectRecord {
        path: path.to_path_buf(),
        mime: None,
        extension: None,
        error: None,
    };

    match spector.try_inspect(path) {
        Ok(Some(info)) => {
            record.mime = Some(info.mime);
            record.extension = Some(info.extension);
        }
        Ok(None) => {}
        Err(e) => record.error = Some(e.to_string()),
    }
    record
}

/// Run the inspect command
pub fn run(spector: &Spector, paths: &[PathBuf], json: bool) -> Result<()> {
    let records: Vec<InspectRecord> = paths
        .iter()
        .map(|path| inspect_path(spector, path))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for record in &records {
        let path = record.path.display();
        match (&record.mime, &record.extension, &record.error) {
            (_, _, Some(error)) => println!("{}: {}", path, error.red()),
            (Some(mime), Some(extension), _) => {
                println!("{}: {} ({})", path, mime.green(), extension)
            }
            _ => println!("{}: {}", path, "unknown".yellow()),
        }
    }

    Ok(())
}
