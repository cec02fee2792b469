//! Asset ledger service: the CRUD and history operations
//!
//! The store context is passed explicitly to every operation; the service
//! itself holds no state between calls. Concurrency control across
//! overlapping transactions is the host store's job (optimistic, detected at
//! commit time), so the read-modify-write in [`AssetContract::update_balance`]
//! deliberately does no conflict detection of its own.

use crate::asset::Asset;
use crate::error::{LedgerError, Result};
use crate::history;
use crate::store::StateStore;
use tracing::debug;

/// The capability set exposed to external callers.
pub trait AssetContract {
    fn create_asset(&self, store: &dyn StateStore, id: &str, asset: Asset) -> Result<()>;
    fn read_asset(&self, store: &dyn StateStore, id: &str) -> Result<Asset>;
    fn update_balance(&self, store: &dyn StateStore, id: &str, new_balance: f64) -> Result<()>;
    fn get_all_assets(&self, store: &dyn StateStore) -> Result<Vec<Asset>>;
    fn asset_exists(&self, store: &dyn StateStore, id: &str) -> Result<bool>;
    fn get_history(&self, store: &dyn StateStore, id: &str) -> Result<Vec<Asset>>;
}

pub struct AssetLedger;

impl AssetContract for AssetLedger {
    /// Adds a new asset to world state. Fails if the id is already taken;
    /// nothing is written in that case.
    fn create_asset(&self, store: &dyn StateStore, id: &str, asset: Asset) -> Result<()> {
        if self.asset_exists(store, id)? {
            return Err(LedgerError::AlreadyExists(id.to_string()));
        }
        let bytes = asset.to_bytes()?;
        store.put(id, &bytes)?;
        debug!("Created asset {} for dealer {}", id, asset.dealer_id);
        Ok(())
    }

    /// Current snapshot of the asset stored under `id`.
    fn read_asset(&self, store: &dyn StateStore, id: &str) -> Result<Asset> {
        match store.get(id)? {
            Some(bytes) => Asset::from_bytes(&bytes),
            None => Err(LedgerError::NotFound(id.to_string())),
        }
    }

    /// Read-modify-write that replaces only the balance field.
    fn update_balance(&self, store: &dyn StateStore, id: &str, new_balance: f64) -> Result<()> {
        let mut asset = self.read_asset(store, id)?;
        asset.balance = new_balance;
        let bytes = asset.to_bytes()?;
        store.put(id, &bytes)?;
        debug!("Updated balance of asset {} to {}", id, new_balance);
        Ok(())
    }

    /// Every asset in world state, in the store's key order. A single
    /// undecodable value aborts the whole call.
    fn get_all_assets(&self, store: &dyn StateStore) -> Result<Vec<Asset>> {
        let mut assets = Vec::new();
        for item in store.range_scan("", "")? {
            let (_key, bytes) = item?;
            assets.push(Asset::from_bytes(&bytes)?);
        }
        Ok(assets)
    }

    fn asset_exists(&self, store: &dyn StateStore, id: &str) -> Result<bool> {
        Ok(store.get(id)?.is_some())
    }

    /// Full version history of `id`. Empty (not an error) if the key never
    /// existed.
    fn get_history(&self, store: &dyn StateStore, id: &str) -> Result<Vec<Asset>> {
        history::asset_history(store, id)
    }
}
