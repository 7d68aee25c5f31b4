//! Store openers

use std::path::PathBuf;
use std::sync::Arc;

use valloc_store::FleetStore;
use valloc_types::Result;

use crate::config::Config;

/// Open the store at the configured directory
pub fn open_store(config: &Config) -> Result<Arc<FleetStore>> {
    open_store_at(config.store_dir()?)
}

/// Open the store at a custom directory
pub fn open_store_at(store_dir: PathBuf) -> Result<Arc<FleetStore>> {
    FleetStore::open(store_dir).map(Arc::new)
}
