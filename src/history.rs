//! Reconstructs asset snapshots from a key's version stream

use crate::asset::Asset;
use crate::error::Result;
use crate::store::StateStore;

/// Every historical snapshot of `key`, in the order the store produced the
/// versions (most recent first for the bundled backends). Tombstones from
/// deletes are skipped; a key that never existed yields an empty vec.
///
/// A failure mid-stream aborts the call; snapshots decoded before the
/// failure are discarded along with it.
pub fn asset_history(store: &dyn StateStore, key: &str) -> Result<Vec<Asset>> {
    let mut snapshots = Vec::new();
    for entry in store.history(key)? {
        let entry = entry?;
        match entry.value {
            Some(bytes) => snapshots.push(Asset::from_bytes(&bytes)?),
            None => continue,
        }
    }
    Ok(snapshots)
}
