//! Persistent store for the fleet
//!
//! Each collection lives in memory as a map keyed by id and is written to
//! `<store_dir>/<collection>.json` after every mutation. All four
//! collections sit behind one `RwLock`, so a uniqueness check and the
//! insert that follows it can never interleave with another writer.

mod index;
mod repository;

pub use index::normalize_key;

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use valloc_domain::model::{Allocation, Driver, Employee, Vehicle};
use valloc_types::{Error, Result};

/// Stored collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Vehicles,
    Drivers,
    Employees,
    Allocations,
}

impl Collection {
    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Vehicles => "vehicles.json",
            Collection::Drivers => "drivers.json",
            Collection::Employees => "employees.json",
            Collection::Allocations => "allocations.json",
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub vehicles: HashMap<String, Vehicle>,
    pub drivers: HashMap<String, Driver>,
    pub employees: HashMap<String, Employee>,
    pub allocations: HashMap<String, Allocation>,
}

/// Row counts per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub vehicles: usize,
    pub drivers: usize,
    pub employees: usize,
    pub allocations: usize,
}

/// Document store shared by every request handler
#[derive(Debug)]
pub struct FleetStore {
    store_dir: Option<PathBuf>,
    tables: RwLock<Tables>,
}

impl FleetStore {
    /// Create or load a store under `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;

        let tables = Tables {
            vehicles: load_collection(&store_dir, Collection::Vehicles)?,
            drivers: load_collection(&store_dir, Collection::Drivers)?,
            employees: load_collection(&store_dir, Collection::Employees)?,
            allocations: load_collection(&store_dir, Collection::Allocations)?,
        };
        debug!(
            store_dir = %store_dir.display(),
            vehicles = tables.vehicles.len(),
            drivers = tables.drivers.len(),
            employees = tables.employees.len(),
            allocations = tables.allocations.len(),
            "store opened"
        );

        Ok(Self {
            store_dir: Some(store_dir),
            tables: RwLock::new(tables),
        })
    }

    /// A store that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            store_dir: None,
            tables: RwLock::new(Tables::default()),
        }
    }

    pub fn store_dir(&self) -> Option<&Path> {
        self.store_dir.as_deref()
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let tables = self.read()?;
        Ok(StoreStats {
            vehicles: tables.vehicles.len(),
            drivers: tables.drivers.len(),
            employees: tables.employees.len(),
            allocations: tables.allocations.len(),
        })
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| Error::Store("store lock poisoned".to_string()))
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| Error::Store("store lock poisoned".to_string()))
    }

    /// Write one collection to disk via a temporary file
    fn persist<T: Serialize>(&self, collection: Collection, rows: &HashMap<String, T>) -> Result<()> {
        let Some(dir) = &self.store_dir else {
            return Ok(());
        };
        let path = dir.join(collection.file_name());
        let tmp_path = path.with_extension("json.tmp");

        let written = write_synced(&tmp_path, rows).and_then(|()| Ok(fs::rename(&tmp_path, &path)?));
        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }

    /// Apply a single-row change and persist it, undoing the change in
    /// memory if the write fails. `next = None` removes the row.
    pub(crate) fn commit<T: Serialize + Clone>(
        &self,
        collection: Collection,
        rows: &mut HashMap<String, T>,
        id: &str,
        next: Option<T>,
    ) -> Result<Option<T>> {
        let previous = match next {
            Some(row) => rows.insert(id.to_string(), row),
            None => rows.remove(id),
        };

        if let Err(e) = self.persist(collection, rows) {
            error!(collection = collection.file_name(), id, error = %e, "failed to persist store");
            match previous.clone() {
                Some(row) => {
                    rows.insert(id.to_string(), row);
                }
                None => {
                    rows.remove(id);
                }
            }
            return Err(e);
        }

        Ok(previous)
    }
}

/// Serialize `rows` to `path` and fsync it; the buffered flush error is
/// surfaced instead of being dropped
fn write_synced<T: Serialize>(path: &Path, rows: &HashMap<String, T>) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    Ok(())
}

fn load_collection<T: DeserializeOwned>(
    store_dir: &Path,
    collection: Collection,
) -> Result<HashMap<String, T>> {
    let path = store_dir.join(collection.file_name());
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let file = File::open(&path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        Error::Store(format!(
            "failed to load {}: {}",
            path.display(),
            e
        ))
    })
}
