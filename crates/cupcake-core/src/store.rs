//! Flat-file JSON record store
//!
//! NOT FOR PRODUCTION USE. Every record lives in memory and every mutation
//! rewrites the whole backing file synchronously. This keeps the demo free of
//! a database dependency but will not scale past small data sets.
//!
//! The in-memory map is the source of truth while the process runs; the file
//! is its checkpoint. Map access and the file rewrite of a mutation happen
//! under one lock, so concurrent handlers observe whole operations only.
//!
//! If the rewrite fails the in-memory map keeps the mutation. Callers get an
//! error, but the change stays visible until the process restarts.

use parking_lot::Mutex;
use rand::Rng;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::model::{Cupcake, CupcakeBody, CupcakeId};

/// Exclusive upper bound for generated ids (2^40)
pub const ID_RANGE_END: u64 = 1 << 40;

type Records = BTreeMap<CupcakeId, Cupcake>;

/// Cupcake records hydrated from, and flushed to, a single JSON file
#[derive(Debug)]
pub struct CupcakeStore {
    path: PathBuf,
    records: Mutex<Records>,
}

impl CupcakeStore {
    /// Open the store backed by `path`.
    ///
    /// A missing, unreadable or malformed file is logged and yields an empty
    /// store; opening never fails.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = Self::load(&path);
        debug!("Loaded {} cupcakes from {:?}", records.len(), path);
        Self {
            path,
            records: Mutex::new(records),
        }
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Insert a new record and return its generated id.
    ///
    /// Ids are drawn uniformly from `[0, ID_RANGE_END)`; a draw that hits a
    /// live id is repeated.
    pub fn create(&self, body: CupcakeBody) -> Result<CupcakeId> {
        let mut records = self.records.lock();

        let mut rng = rand::thread_rng();
        let id = loop {
            let candidate = rng.gen_range(0..ID_RANGE_END);
            if !records.contains_key(&candidate) {
                break candidate;
            }
            debug!("Generated cupcake id {} is taken, drawing again", candidate);
        };

        records.insert(id, body.into_cupcake(id));
        self.persist(&records)?;
        Ok(id)
    }

    /// Look up a record; never touches the file
    pub fn get_by_id(&self, id: CupcakeId) -> Option<Cupcake> {
        self.records.lock().get(&id).cloned()
    }

    /// Replace the record stored under `id`.
    ///
    /// Returns `Ok(None)` without writing when `id` is not live. The stored
    /// record always carries `id`, whatever id `cupcake` holds.
    pub fn update_by_id(&self, id: CupcakeId, mut cupcake: Cupcake) -> Result<Option<Cupcake>> {
        let mut records = self.records.lock();
        let Some(slot) = records.get_mut(&id) else {
            return Ok(None);
        };

        cupcake.id = id;
        *slot = cupcake.clone();
        self.persist(&records)?;
        Ok(Some(cupcake))
    }

    /// Remove the record stored under `id`, returning it.
    ///
    /// Returns `Ok(None)` without writing when `id` is not live.
    pub fn delete_by_id(&self, id: CupcakeId) -> Result<Option<Cupcake>> {
        let mut records = self.records.lock();
        let Some(removed) = records.remove(&id) else {
            return Ok(None);
        };

        self.persist(&records)?;
        Ok(Some(removed))
    }

    /// All records. Ordering is unspecified.
    pub fn list_all(&self) -> Vec<Cupcake> {
        self.records.lock().values().cloned().collect()
    }

    /// Drop every record and overwrite the backing file with an empty map
    pub fn clear(&self) -> Result<()> {
        let mut records = self.records.lock();
        records.clear();
        self.persist(&records)
    }

    fn load(path: &Path) -> Records {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Error while loading cupcakes from {:?}: {}", path, e);
                return Records::new();
            }
        };

        match serde_json::from_slice(&data) {
            Ok(records) => records,
            Err(e) => {
                warn!("Error while parsing cupcakes from {:?}: {}", path, e);
                Records::new()
            }
        }
    }

    /// Rewrite the backing file: write `<path>.tmp`, then rename over `path`
    fn persist(&self, records: &Records) -> Result<()> {
        let bytes = serde_json::to_vec(records).inspect_err(|e| {
            error!("Error while encoding cupcakes: {}", e);
        })?;

        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("json");
        let tmp = self.path.with_extension(format!("{ext}.tmp"));

        std::fs::write(&tmp, &bytes)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
            .map_err(|e| {
                error!("Error while saving cupcakes to {:?}: {}", self.path, e);
                Error::persistence(&self.path, e)
            })
    }
}
