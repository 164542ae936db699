//! Binary snapshots of built ship graphs.
//!
//! Uses bincode, prefixed with a format version. A snapshot is a cache of an
//! already validated graph; deserializing a [`ShipGraph`] re-checks every room
//! handle, so a damaged file cannot yield a graph with dangling references.

use std::io::{Read, Write};

use crate::graph::ShipGraph;

/// Version number for snapshot format (increment when the graph changes shape)
const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur during snapshot save/load
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Write a graph snapshot.
pub fn save_snapshot<W: Write>(mut writer: W, graph: &ShipGraph) -> Result<(), SnapshotError> {
    bincode::serialize_into(&mut writer, &SNAPSHOT_VERSION)?;
    bincode::serialize_into(&mut writer, graph)?;
    Ok(())
}

/// Read a graph snapshot written by [`save_snapshot`].
pub fn load_snapshot<R: Read>(mut reader: R) -> Result<ShipGraph, SnapshotError> {
    let version: u32 = bincode::deserialize_from(&mut reader)?;
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: version,
        });
    }

    Ok(bincode::deserialize_from(&mut reader)?)
}
