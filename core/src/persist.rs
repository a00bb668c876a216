use crate::{DocumentNameTable, Error, InvertedIndex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const MAGIC: &[u8; 4] = b"RIDX";
const FORMAT_VERSION: u32 = 1;

/// Everything the query side needs, persisted as one unit. Keeping the name
/// table in the snapshot ties the enumeration order to the index that was
/// built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub index: InvertedIndex,
    pub doc_names: DocumentNameTable,
}

/// Serialize a snapshot: 4-byte magic, little-endian format version, bincode
/// payload.
pub fn to_bytes(snapshot: &IndexSnapshot) -> Result<Vec<u8>, Error> {
    let payload = bincode::serialize(snapshot)
        .map_err(|e| Error::CorruptIndex(format!("encode failed: {e}")))?;
    let mut blob = Vec::with_capacity(8 + payload.len());
    blob.extend_from_slice(MAGIC);
    blob.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    blob.extend_from_slice(&payload);
    Ok(blob)
}

/// Decode and validate a snapshot blob. Round-trips exactly with
/// [`to_bytes`]: every term, posting order, and weight bit pattern survives.
pub fn from_bytes(blob: &[u8]) -> Result<IndexSnapshot, Error> {
    if blob.len() < 8 {
        return Err(Error::CorruptIndex("short read".into()));
    }
    if &blob[..4] != MAGIC {
        return Err(Error::CorruptIndex("bad magic".into()));
    }
    let version = u32::from_le_bytes([blob[4], blob[5], blob[6], blob[7]]);
    if version != FORMAT_VERSION {
        return Err(Error::CorruptIndex(format!("unsupported format version {version}")));
    }
    let snapshot: IndexSnapshot = bincode::deserialize(&blob[8..])
        .map_err(|e| Error::CorruptIndex(format!("decode failed: {e}")))?;
    validate(&snapshot)?;
    Ok(snapshot)
}

fn validate(snapshot: &IndexSnapshot) -> Result<(), Error> {
    let num_docs = snapshot.doc_names.len() as u64;
    for (term, list) in snapshot.index.iter() {
        for p in list {
            if u64::from(p.doc_id) >= num_docs {
                return Err(Error::CorruptIndex(format!(
                    "posting for {term:?} references document {} of {num_docs}",
                    p.doc_id
                )));
            }
            if !p.weight.is_finite() || p.weight <= 0.0 {
                return Err(Error::CorruptIndex(format!(
                    "posting for {term:?} has weight {}",
                    p.weight
                )));
            }
        }
    }
    Ok(())
}

pub fn save<P: AsRef<Path>>(path: P, snapshot: &IndexSnapshot) -> Result<(), Error> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, to_bytes(snapshot)?)?;
    Ok(())
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<IndexSnapshot, Error> {
    from_bytes(&fs::read(path)?)
}
