//! Filesystem-backed `DynastyStore`.
//!
//! One gzip-compressed JSON file per dynasty under `root`. Each dynasty
//! gets its own `Mutex`, so advancing dynasty A never blocks dynasty B
//! (spec §5: "single-writer per dynasty ... different dynasties are
//! independent"), while a write within one dynasty is fully serialized
//! and verified by reading the file back before it is reported as
//! committed (spec §7 "post-save verification").

use crate::persisted::PersistedTables;
use dynasty_core::error::{CoreError, CoreResult};
use dynasty_core::models::DynastyId;
use dynasty_core::store::{DynastyStore, DynastyTables};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

pub struct JsonDynastyStore {
    root: PathBuf,
    dynasties: RwLock<HashMap<DynastyId, Arc<Mutex<DynastyTables>>>>,
}

impl JsonDynastyStore {
    pub fn new(root: impl Into<PathBuf>) -> CoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| CoreError::persistence(format!("creating store root {}: {e}", root.display())))?;
        Ok(JsonDynastyStore { root, dynasties: RwLock::new(HashMap::new()) })
    }

    fn path_for(&self, dynasty: &DynastyId) -> PathBuf {
        self.root.join(format!("{dynasty}.json.gz"))
    }

    fn load_from_disk(&self, dynasty: &DynastyId) -> CoreResult<DynastyTables> {
        let path = self.path_for(dynasty);
        if !path.exists() {
            return Ok(DynastyTables::new());
        }
        let file = File::open(&path)
            .map_err(|e| CoreError::persistence(format!("opening {}: {e}", path.display())))?;
        let mut decoder = GzDecoder::new(file);
        let mut contents = String::new();
        decoder
            .read_to_string(&mut contents)
            .map_err(|e| CoreError::persistence(format!("decompressing {}: {e}", path.display())))?;
        let persisted: PersistedTables = serde_json::from_str(&contents)
            .map_err(|e| CoreError::persistence(format!("parsing {}: {e}", path.display())))?;
        Ok(persisted.into())
    }

    /// Write `tables` to a temp file, rename it into place, then read it
    /// back and compare the re-serialized value against what was written
    /// (spec §7). A mismatch is a `PersistenceFailure`, which callers
    /// must treat as fatal, never log-and-continue.
    fn write_to_disk(&self, dynasty: &DynastyId, tables: &DynastyTables) -> CoreResult<()> {
        let path = self.path_for(dynasty);
        let tmp_path = self.root.join(format!("{dynasty}.json.gz.tmp"));
        let persisted = PersistedTables::from(tables);
        let written = serde_json::to_value(&persisted)
            .map_err(|e| CoreError::persistence(format!("serializing dynasty {dynasty}: {e}")))?;
        let bytes = serde_json::to_vec(&persisted)
            .map_err(|e| CoreError::persistence(format!("serializing dynasty {dynasty}: {e}")))?;

        {
            let file = File::create(&tmp_path)
                .map_err(|e| CoreError::persistence(format!("creating {}: {e}", tmp_path.display())))?;
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder
                .write_all(&bytes)
                .map_err(|e| CoreError::persistence(format!("compressing {}: {e}", tmp_path.display())))?;
            encoder
                .finish()
                .map_err(|e| CoreError::persistence(format!("flushing {}: {e}", tmp_path.display())))?;
        }
        std::fs::rename(&tmp_path, &path)
            .map_err(|e| CoreError::persistence(format!("committing {}: {e}", path.display())))?;

        let readback = self.load_from_disk(dynasty)?;
        let readback_value = serde_json::to_value(PersistedTables::from(&readback))
            .map_err(|e| CoreError::persistence(format!("re-serializing readback for dynasty {dynasty}: {e}")))?;
        if readback_value != written {
            return Err(CoreError::persistence(format!(
                "dynasty {dynasty} readback did not match what was written"
            )));
        }
        debug!("persisted dynasty {dynasty} ({} bytes compressed path)", tmp_path.display());
        Ok(())
    }

    fn dynasty_handle(&self, dynasty: &DynastyId) -> CoreResult<Arc<Mutex<DynastyTables>>> {
        if let Some(handle) = self.dynasties.read().unwrap().get(dynasty) {
            return Ok(handle.clone());
        }
        let mut guard = self.dynasties.write().unwrap();
        if let Some(handle) = guard.get(dynasty) {
            return Ok(handle.clone());
        }
        let tables = self.load_from_disk(dynasty)?;
        info!("loaded dynasty {dynasty}");
        let handle = Arc::new(Mutex::new(tables));
        guard.insert(dynasty.clone(), handle.clone());
        Ok(handle)
    }
}

impl DynastyStore for JsonDynastyStore {
    fn with_transaction<T>(
        &self,
        dynasty: &DynastyId,
        f: Box<dyn FnOnce(&mut DynastyTables) -> CoreResult<T> + '_>,
    ) -> CoreResult<T> {
        let handle = self.dynasty_handle(dynasty)?;
        let mut guard = handle.lock().unwrap();
        let mut candidate = guard.clone();
        let result = f(&mut candidate)?;
        self.write_to_disk(dynasty, &candidate)?;
        *guard = candidate;
        Ok(result)
    }

    fn read<T>(&self, dynasty: &DynastyId, f: Box<dyn FnOnce(&DynastyTables) -> T + '_>) -> CoreResult<T> {
        let handle = self.dynasty_handle(dynasty)?;
        let guard = handle.lock().unwrap();
        Ok(f(&guard))
    }

    fn ensure_dynasty(&self, dynasty: &DynastyId) -> CoreResult<()> {
        self.dynasty_handle(dynasty).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynasty_core::models::Team;
    use dynasty_core::models::{Conference, Division};

    #[test]
    fn writing_then_reopening_the_store_recovers_the_same_tables() {
        let dir = tempfile::tempdir().unwrap();
        let dynasty = "dynasty-1".to_string();

        {
            let store = JsonDynastyStore::new(dir.path()).unwrap();
            store
                .with_transaction(
                    &dynasty,
                    Box::new(|tables| {
                        tables.teams.insert(1, Team::new(1, "Falcons".to_string(), Conference::Nfc, Division::South));
                        Ok(())
                    }),
                )
                .unwrap();
        }

        let reopened = JsonDynastyStore::new(dir.path()).unwrap();
        let team_name = reopened
            .read(&dynasty, Box::new(|tables| tables.teams.get(&1).map(|t| t.name.clone())))
            .unwrap();
        assert_eq!(team_name, Some("Falcons".to_string()));
    }

    #[test]
    fn a_failed_transaction_never_reaches_disk() {
        let dir = tempfile::tempdir().unwrap();
        let dynasty = "dynasty-1".to_string();
        let store = JsonDynastyStore::new(dir.path()).unwrap();

        store
            .with_transaction(&dynasty, Box::new(|tables| {
                tables.teams.insert(1, Team::new(1, "Falcons".to_string(), Conference::Nfc, Division::South));
                Ok(())
            }))
            .unwrap();

        let attempt: CoreResult<()> = store.with_transaction(
            &dynasty,
            Box::new(|tables| {
                tables.teams.insert(2, Team::new(2, "Broken".to_string(), Conference::Afc, Division::North));
                Err(CoreError::InvalidTransaction(vec!["rejected".to_string()]))
            }),
        );
        assert!(attempt.is_err());

        let team_count = store.read(&dynasty, Box::new(|tables| tables.teams.len())).unwrap();
        assert_eq!(team_count, 1);
    }

    #[test]
    fn different_dynasties_do_not_share_a_lock() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDynastyStore::new(dir.path()).unwrap();
        store.ensure_dynasty(&"alpha".to_string()).unwrap();
        store.ensure_dynasty(&"beta".to_string()).unwrap();

        store
            .with_transaction(&"alpha".to_string(), Box::new(|tables| {
                tables.teams.insert(1, Team::new(1, "Alpha Team".to_string(), Conference::Afc, Division::East));
                Ok(())
            }))
            .unwrap();

        let beta_teams = store.read(&"beta".to_string(), Box::new(|tables| tables.teams.len())).unwrap();
        assert_eq!(beta_teams, 0);
    }
}
