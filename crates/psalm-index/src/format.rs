//! On-disk index artifact: one JSON document, published atomically.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use psalm_core::constants::INDEX_FORMAT_VERSION;
use psalm_core::errors::{IndexError, PsalmResult};
use psalm_core::models::{corpus_checksum, Index};
use tempfile::NamedTempFile;

/// Serialize an index. Compact JSON plus a trailing newline; no timestamps, so
/// equal indexes serialize to equal bytes.
pub fn to_bytes(index: &Index) -> PsalmResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec(index)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parse and validate an artifact read from `path`.
pub fn from_slice(path: &str, bytes: &[u8]) -> Result<Index, IndexError> {
    let index: Index = serde_json::from_slice(bytes).map_err(|e| IndexError::Corrupt {
        path: path.to_string(),
        details: format!("unparseable artifact: {e}"),
    })?;
    validate(path, &index)?;
    Ok(index)
}

/// Structural checks that every loaded index must pass.
pub fn validate(path: &str, index: &Index) -> Result<(), IndexError> {
    let corrupt = |details: String| IndexError::Corrupt {
        path: path.to_string(),
        details,
    };
    let header = &index.header;

    if header.format_version != INDEX_FORMAT_VERSION {
        return Err(corrupt(format!(
            "unknown format version {} (expected {INDEX_FORMAT_VERSION})",
            header.format_version
        )));
    }
    if header.unit_count != index.records.len() {
        return Err(corrupt(format!(
            "header declares {} units but {} records are present",
            header.unit_count,
            index.records.len()
        )));
    }
    if index.records.is_empty() {
        return Err(corrupt("index has no records".to_string()));
    }
    if header.dimensionality == 0 {
        return Err(corrupt("dimensionality is zero".to_string()));
    }

    let mut seen = HashSet::with_capacity(index.records.len());
    for (position, record) in index.records.iter().enumerate() {
        if record.order != position {
            return Err(corrupt(format!(
                "record {} has order {} at position {position}",
                record.unit_id, record.order
            )));
        }
        if record.vector.len() != header.dimensionality {
            return Err(corrupt(format!(
                "record {} has {} dimensions, header declares {}",
                record.unit_id,
                record.vector.len(),
                header.dimensionality
            )));
        }
        if record.passage().is_empty() {
            return Err(corrupt(format!("record {} has blank text", record.unit_id)));
        }
        if !seen.insert(record.unit_id.as_str()) {
            return Err(corrupt(format!("duplicate unit id {}", record.unit_id)));
        }
    }

    let checksum = corpus_checksum(index.records.iter().map(|r| r.text.as_str()));
    if checksum != header.corpus_checksum {
        return Err(corrupt("record texts do not match the corpus checksum".to_string()));
    }

    Ok(())
}

/// Write to a temporary file beside `path`, sync, then rename over it.
///
/// Readers see either the previous artifact or the new one, never a partial write.
pub fn write_atomic(path: &Path, index: &Index) -> PsalmResult<()> {
    let bytes = to_bytes(index)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
