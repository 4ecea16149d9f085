//! SemanticKITTI `.label` reader

use lidarvis_core::{Error, Result, SemanticLabel};
use std::path::Path;

/// Read a `.label` file and return the semantic class of every point.
///
/// Each record is a little-endian `u32`; the instance id in the upper half is
/// discarded.
pub fn read_labels<P: AsRef<Path>>(path: P) -> Result<Vec<u32>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    if bytes.len() % 4 != 0 {
        return Err(Error::InvalidData(format!(
            "{}: {} bytes is not a whole number of u32 labels",
            path.display(),
            bytes.len()
        )));
    }

    let raw: Vec<u32> = bytemuck::pod_collect_to_vec(&bytes);
    Ok(raw
        .into_iter()
        .map(|r| SemanticLabel::from_raw(r).class)
        .collect())
}
