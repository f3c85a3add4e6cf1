use crate::error::{Error, Result};
use crate::settings::IndexSettings;
use crate::store::{encode_key, store_options};
use rocksdb::{WriteBatch, DB};
use std::collections::HashMap;

/// Page id passed to `store_page` to request a fresh allocation.
pub const NEW_PAGE: u64 = u64::MAX;

/// What the spatial tree needs from its backing storage: byte blobs
/// addressed by page id.
pub trait PageStore {
    fn load_page(&mut self, id: u64) -> Result<Vec<u8>>;
    fn store_page(&mut self, id: u64, data: &[u8]) -> Result<u64>;
    fn delete_page(&mut self, id: u64) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

struct CacheEntry {
    data: Vec<u8>,
    use_index: u64,
    dirty: bool,
}

/// Write-behind page cache over the sorted store. Tree construction
/// hammers a small working set of pages with small random accesses;
/// keeping them in memory and writing evictees in batches keeps the
/// store compact and the disk mostly idle.
pub struct CachedPageStore {
    db: DB,
    entries: HashMap<u64, CacheEntry>,
    batch: WriteBatch,
    current_use_index: u64,
    next_page: u64,
    capacity: usize,
    any_dirty: bool,
}

impl CachedPageStore {
    pub fn open(path: &str, settings: &IndexSettings) -> Result<CachedPageStore> {
        let opts = store_options(settings.way_write_buffer_size, settings.bloom_bits_per_key);
        let db = DB::open(&opts, path)?;

        // resume page allocation past whatever an earlier run stored
        let mut next_page = 0;
        {
            let mut it = db.raw_iterator();
            it.seek_to_last();
            if it.valid() {
                if let Some(k) = it.key() {
                    next_page = crate::store::decode_key(k) + 1;
                }
            }
        }

        Ok(CachedPageStore {
            db,
            entries: HashMap::new(),
            batch: WriteBatch::default(),
            current_use_index: 0,
            next_page,
            capacity: settings.page_cache_size,
            any_dirty: false,
        })
    }

    pub fn cached_len(&self) -> usize {
        self.entries.len()
    }

    pub fn cached_use_index(&self, id: u64) -> Option<u64> {
        self.entries.get(&id).map(|e| e.use_index)
    }

    fn bump(&mut self) -> u64 {
        self.current_use_index += 1;
        self.current_use_index
    }

    /// Drops every entry with `use_index` at or below `threshold`,
    /// batching dirty ones into the store first.
    fn evict_upto(&mut self, threshold: u64) -> Result<()> {
        let victims: Vec<u64> = self
            .entries
            .iter()
            .filter(|(_, e)| e.use_index <= threshold)
            .map(|(id, _)| *id)
            .collect();
        for id in victims {
            if let Some(e) = self.entries.remove(&id) {
                if e.dirty {
                    self.batch.put(encode_key(id), &e.data);
                }
            }
        }
        if !self.batch.is_empty() {
            let batch = std::mem::replace(&mut self.batch, WriteBatch::default());
            self.db.write(batch)?;
        }
        Ok(())
    }

    /// Keeps the most recently used half when the map overflows: the
    /// median use index is the cut.
    fn evict_lru_half(&mut self) -> Result<()> {
        let mut uses: Vec<u64> = self.entries.values().map(|e| e.use_index).collect();
        uses.sort();
        let threshold = uses[uses.len() / 2];
        self.evict_upto(threshold)
    }

    fn insert_entry(&mut self, id: u64, data: Vec<u8>, dirty: bool) -> Result<()> {
        let use_index = self.bump();
        self.entries.insert(
            id,
            CacheEntry {
                data,
                use_index,
                dirty,
            },
        );
        if self.entries.len() > self.capacity {
            self.evict_lru_half()?;
        }
        Ok(())
    }
}

impl PageStore for CachedPageStore {
    fn load_page(&mut self, id: u64) -> Result<Vec<u8>> {
        if let Some(e) = self.entries.get_mut(&id) {
            self.current_use_index += 1;
            e.use_index = self.current_use_index;
            return Ok(e.data.clone());
        }
        match self.db.get(encode_key(id))? {
            Some(data) => {
                self.insert_entry(id, data.clone(), false)?;
                Ok(data)
            }
            None => Err(Error::InvalidPage(id)),
        }
    }

    fn store_page(&mut self, id: u64, data: &[u8]) -> Result<u64> {
        self.any_dirty = true;
        let id = if id == NEW_PAGE {
            let id = self.next_page;
            self.next_page += 1;
            id
        } else {
            if id >= self.next_page {
                self.next_page = id + 1;
            }
            id
        };
        if let Some(e) = self.entries.get_mut(&id) {
            e.data.clear();
            e.data.extend(data);
            e.dirty = true;
            self.current_use_index += 1;
            e.use_index = self.current_use_index;
        } else {
            self.insert_entry(id, data.to_vec(), true)?;
        }
        Ok(id)
    }

    fn delete_page(&mut self, id: u64) -> Result<()> {
        self.entries.remove(&id);
        self.batch.delete(encode_key(id));
        self.any_dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.evict_upto(u64::MAX)?;
        if self.any_dirty {
            self.db.compact_range(None::<&[u8]>, None::<&[u8]>);
        }
        Ok(())
    }
}
