use crate::elements::NodeValue;
use crate::error::Result;
use crate::settings::IndexSettings;
use crate::store::{decode_key, encode_key, store_options};
use rocksdb::{DBRawIterator, WriteBatch, DB};
use std::path::Path;

/// How far the ordered reader walks the iterator step by step before
/// giving up and reseeking. Way nodes are usually numerically close to
/// each other, so a handful of single steps beats a seek.
const SCAN_LIMIT: i64 = 5;

/// Sorted node id → NodeValue store, bulk written during the node phase
/// and read back with an ordered-scan reader while ways are assembled.
pub struct NodeStore {
    db: DB,
    batch: WriteBatch,
}

impl NodeStore {
    pub fn open(path: &str, settings: &IndexSettings) -> Result<NodeStore> {
        let opts = store_options(
            settings.node_write_buffer_size,
            settings.bloom_bits_per_key,
        );
        let db = DB::open(&opts, path)?;
        Ok(NodeStore {
            db,
            batch: WriteBatch::default(),
        })
    }

    pub fn exists(path: &str) -> bool {
        Path::new(path).join("CURRENT").is_file()
    }

    pub fn insert(&mut self, id: i64, value: &NodeValue) {
        self.batch.put(encode_key(id as u64), value.to_bytes());
    }

    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    pub fn flush(&mut self) -> Result<()> {
        if !self.batch.is_empty() {
            let batch = std::mem::replace(&mut self.batch, WriteBatch::default());
            self.db.write(batch)?;
        }
        Ok(())
    }

    /// Full-range compaction; the way phase depends on sorted reads at
    /// near-memory speed.
    pub fn compact(&self) {
        self.db.compact_range(None::<&[u8]>, None::<&[u8]>);
    }

    pub fn get(&self, id: i64) -> Result<Option<NodeValue>> {
        match self.db.get(encode_key(id as u64))? {
            Some(v) => Ok(NodeValue::from_bytes(&v)),
            None => Ok(None),
        }
    }

    pub fn reader(&self) -> NodeReader {
        NodeReader {
            it: self.db.raw_iterator(),
            positioned: false,
        }
    }

    /// All stored ids in store order.
    pub fn keys(&self) -> Vec<u64> {
        let mut it = self.db.raw_iterator();
        it.seek_to_first();
        let mut res = Vec::new();
        while it.valid() {
            if let Some(k) = it.key() {
                res.push(decode_key(k));
            }
            it.next();
        }
        res
    }
}

/// Long-lived forward scanner over the node store. Lookups arrive in
/// way-reference order, which tracks store order closely; the reader
/// steps the iterator for nearby ids and reseeks only when the distance
/// exceeds SCAN_LIMIT in either direction.
pub struct NodeReader<'a> {
    it: DBRawIterator<'a>,
    positioned: bool,
}

impl<'a> NodeReader<'a> {
    pub fn find(&mut self, id: i64) -> Result<Option<NodeValue>> {
        let key = encode_key(id as u64);
        if !self.positioned {
            self.positioned = true;
            self.it.seek(key);
            return self.take_if_match(id);
        }
        loop {
            if !self.it.valid() {
                self.it.seek(key);
                return self.take_if_match(id);
            }
            let here = match self.it.key() {
                Some(k) => decode_key(k) as i64,
                None => return Ok(None),
            };
            let delta = id - here;
            if delta == 0 {
                return self.take_current();
            } else if delta > 0 && delta <= SCAN_LIMIT {
                self.it.next();
                if let Some(k) = self.it.key() {
                    if decode_key(k) as i64 > id {
                        // walked over the spot where the id would be
                        return Ok(None);
                    }
                }
            } else if delta > SCAN_LIMIT {
                self.it.seek(key);
                return self.take_if_match(id);
            } else if delta >= -SCAN_LIMIT {
                self.it.prev();
                if !self.it.valid() {
                    self.it.seek(key);
                    return self.take_if_match(id);
                }
                if let Some(k) = self.it.key() {
                    if (decode_key(k) as i64) < id {
                        return Ok(None);
                    }
                }
            } else {
                self.it.seek(key);
                return self.take_if_match(id);
            }
        }
    }

    fn take_if_match(&mut self, id: i64) -> Result<Option<NodeValue>> {
        if self.it.valid() {
            if let Some(k) = self.it.key() {
                if decode_key(k) as i64 == id {
                    return self.take_current();
                }
            }
        }
        Ok(None)
    }

    fn take_current(&mut self) -> Result<Option<NodeValue>> {
        let v = self.it.value().and_then(NodeValue::from_bytes);
        self.it.next();
        Ok(v)
    }
}
