//! CRC command implementation.

use crate::utils::format_crc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use winflate_core::{Crc32, MappedInput};

/// JSON serializable checksum of one file.
#[derive(Debug, Serialize, Deserialize)]
struct FileCrcJson {
    file: String,
    size: u64,
    crc32: String,
}

fn file_crc(path: &Path) -> winflate_core::Result<FileCrcJson> {
    let mapped = MappedInput::open(path)?;
    Ok(FileCrcJson {
        file: path.display().to_string(),
        size: mapped.len() as u64,
        crc32: format_crc(Crc32::compute(mapped.as_slice())),
    })
}

pub fn cmd_crc(files: &[PathBuf], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut results = Vec::with_capacity(files.len());
    for path in files {
        results.push(file_crc(path).map_err(|e| format!("{}: {}", path.display(), e))?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for entry in &results {
            println!("{}  {:>10}  {}", entry.crc32, entry.size, entry.file);
        }
    }
    Ok(())
}
