//! RocksDB-backed model store.

use std::path::Path;

use markov_entropy_core::{StoreConfig, SymbolContext};
use rocksdb::{Cache, ColumnFamily, IteratorMode, Options, WriteBatch, WriteOptions, DB};
use tracing::{debug, info};

use crate::backing::BackingStore;
use crate::column_families::{self, get_column_family_descriptors, CF_MARKOV};
use crate::error::{StorageError, StorageResult};

/// Persisted context store in the `markov` column family.
///
/// # Thread Safety
/// `DB` is internally synchronized. Every read goes through its own
/// snapshot, so concurrent search workers see a consistent view even if a
/// learner is writing to the same database.
pub struct RocksDbMarkovStore {
    db: DB,
    /// Shared block cache (kept alive for DB lifetime).
    #[allow(dead_code)]
    cache: Cache,
    path: String,
    order: usize,
    enable_wal: bool,
}

impl RocksDbMarkovStore {
    /// Open or create the store described by `config` for keys of length `order`.
    ///
    /// # Errors
    /// - `StorageError::OpenFailed` if RocksDB cannot open the path
    pub fn open(config: &StoreConfig, order: usize) -> StorageResult<Self> {
        Self::open_at(&config.path, config, order)
    }

    /// Open at an explicit path, taking tuning options from `config`.
    pub fn open_at<P: AsRef<Path>>(
        path: P,
        config: &StoreConfig,
        order: usize,
    ) -> StorageResult<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let cache = Cache::new_lru_cache(config.block_cache_size);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(config.create_if_missing);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_open_files(config.max_open_files);

        let cf_descriptors = get_column_family_descriptors(&cache);
        let db = DB::open_cf_descriptors(&db_opts, &path_str, cf_descriptors).map_err(|e| {
            StorageError::OpenFailed {
                path: path_str.clone(),
                message: e.to_string(),
            }
        })?;

        info!(path = %path_str, order, "Opened markov store");

        Ok(Self {
            db,
            cache,
            path: path_str,
            order,
            enable_wal: config.enable_wal,
        })
    }

    fn cf(&self) -> StorageResult<&ColumnFamily> {
        self.db
            .cf_handle(CF_MARKOV)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound {
                name: CF_MARKOV.to_string(),
            })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Context length this store was opened for.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Verify every column family is present.
    pub fn health_check(&self) -> StorageResult<()> {
        for name in column_families::ALL {
            self.db
                .cf_handle(name)
                .ok_or_else(|| StorageError::ColumnFamilyNotFound {
                    name: name.to_string(),
                })?;
        }
        Ok(())
    }

    /// Every stored key in byte order.
    ///
    /// # Errors
    /// - `StorageError::InvalidKey` if a key length differs from the configured order
    pub fn keys(&self) -> StorageResult<Vec<SymbolContext>> {
        let cf = self.cf()?;
        let mut keys = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, _) = item.map_err(|e| StorageError::ReadFailed(e.to_string()))?;
            if key.len() != self.order {
                return Err(StorageError::InvalidKey {
                    expected: self.order,
                    actual: key.len(),
                });
            }
            keys.push(SymbolContext::from_slice(&key)?);
        }
        Ok(keys)
    }
}

impl BackingStore for RocksDbMarkovStore {
    fn get(&self, key: &SymbolContext) -> StorageResult<Option<Vec<u8>>> {
        let cf = self.cf()?;
        let snapshot = self.db.snapshot();
        snapshot
            .get_cf(cf, key.as_bytes())
            .map_err(|e| StorageError::ReadFailed(e.to_string()))
    }

    fn put_batch(&self, entries: Vec<(SymbolContext, Vec<u8>)>) -> StorageResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let cf = self.cf()?;
        let count = entries.len();
        let mut batch = WriteBatch::default();
        for (key, blob) in &entries {
            if key.order() != self.order {
                return Err(StorageError::InvalidKey {
                    expected: self.order,
                    actual: key.order(),
                });
            }
            batch.put_cf(cf, key.as_bytes(), blob);
        }
        let mut write_opts = WriteOptions::default();
        write_opts.disable_wal(!self.enable_wal);
        self.db
            .write_opt(batch, &write_opts)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        debug!(count, "Wrote context batch");
        Ok(())
    }

    fn len(&self) -> StorageResult<usize> {
        let cf = self.cf()?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            item.map_err(|e| StorageError::ReadFailed(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }

    fn flush(&self) -> StorageResult<()> {
        let cf = self.cf()?;
        self.db
            .flush_cf(cf)
            .map_err(|e| StorageError::FlushFailed(e.to_string()))
    }
}
