use serde::{Deserialize, Serialize};

use std::fs::File;
use std::io::{BufReader, Error, ErrorKind, Result};

/// Store and pipeline tunables. The defaults match the sizes the
/// pipeline was profiled with on planet extracts; an override file is
/// mostly useful for tests and small machines.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IndexSettings {
    pub node_write_buffer_size: usize,
    pub way_write_buffer_size: usize,
    pub bloom_bits_per_key: f64,
    pub page_cache_size: usize,
    pub node_flush_interval: u64,
    pub node_progress_interval: u64,
    pub way_progress_interval: u64,
}

impl IndexSettings {
    pub fn default() -> IndexSettings {
        IndexSettings {
            node_write_buffer_size: 100 * 1024 * 1024,
            way_write_buffer_size: 10 * 1024 * 1024,
            bloom_bits_per_key: 32.0,
            page_cache_size: 10000,
            node_flush_interval: 524288,
            node_progress_interval: 524288,
            way_progress_interval: 32768,
        }
    }

    pub fn from_file(infn: &str) -> Result<IndexSettings> {
        let f = File::open(infn)?;
        let mut fbuf = BufReader::new(f);
        match serde_json::from_reader(&mut fbuf) {
            Ok(s) => Ok(s),
            Err(e) => Err(Error::new(ErrorKind::Other, format!("{:?}", e))),
        }
    }
}
