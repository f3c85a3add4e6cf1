mod node_store;
mod page_store;

pub use crate::store::node_store::{NodeReader, NodeStore};
pub use crate::store::page_store::{CachedPageStore, PageStore, NEW_PAGE};

use rocksdb::{BlockBasedOptions, Options};
use std::cmp::Ordering;

/// Keys in both stores are 64-bit ids in little-endian bytes, ordered
/// numerically rather than lexicographically.
pub fn encode_key(id: u64) -> [u8; 8] {
    id.to_le_bytes()
}

pub fn decode_key(key: &[u8]) -> u64 {
    let mut b = [0u8; 8];
    let n = usize::min(key.len(), 8);
    b[..n].copy_from_slice(&key[..n]);
    u64::from_le_bytes(b)
}

fn compare_u64_keys(a: &[u8], b: &[u8]) -> Ordering {
    decode_key(a).cmp(&decode_key(b))
}

pub(crate) fn store_options(write_buffer_size: usize, bloom_bits_per_key: f64) -> Options {
    let mut opts = Options::default();
    opts.create_if_missing(true);
    opts.set_write_buffer_size(write_buffer_size);
    opts.set_comparator("u64_key", Box::new(compare_u64_keys));

    let mut block = BlockBasedOptions::default();
    block.set_bloom_filter(bloom_bits_per_key, false);
    opts.set_block_based_table_factory(&block);
    opts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for id in [0u64, 1, 255, 256, 1 << 40, u64::MAX] {
            assert_eq!(decode_key(&encode_key(id)), id);
        }
    }

    #[test]
    fn test_numeric_ordering() {
        // lexicographic order over little-endian bytes would invert
        // these; the comparator must not
        assert_eq!(
            compare_u64_keys(&encode_key(255), &encode_key(256)),
            Ordering::Less
        );
        assert_eq!(
            compare_u64_keys(&encode_key(1 << 32), &encode_key(2)),
            Ordering::Greater
        );
    }
}
