use crate::error::{Error, Result};
use crate::message;
use crate::o5mformat::buffered_read::BufferedRead;
use crate::o5mformat::string_ring::{StringPairRing, MAX_INTERN_LENGTH};
use crate::o5mformat::varint::{read_svarint, read_uvarint};
use crate::utils::timestamp_string;
use std::io::{Read, Seek, SeekFrom};

pub const DS_NODE: u8 = 0x10;
pub const DS_WAY: u8 = 0x11;
pub const DS_REL: u8 = 0x12;
pub const DS_BBOX: u8 = 0xdb;
pub const DS_TIMESTAMP: u8 = 0xdc;
pub const DS_HEADER: u8 = 0xe0;
pub const DS_SYNC: u8 = 0xee;
pub const DS_JUMP: u8 = 0xef;
pub const DS_END: u8 = 0xfe;
pub const DS_RESET: u8 = 0xff;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetType {
    Node,
    Way,
    Relation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    Node,
    Way,
    Relation,
}

/// One decoded node, way or relation header. Tags, way nodes and member
/// references are pulled afterwards through the gated sub-iterators on
/// the reader.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub dataset_type: DatasetType,
    pub id: i64,
    pub version: u32,
    /// Entity carries no body beyond its metadata (a delete in a change
    /// file); coordinates and sub-iterators are not available.
    pub is_empty: bool,
    pub lon: i32,
    pub lat: i32,
    /// Absolute input offset of the dataset body and its announced
    /// length, kept for diagnostics.
    pub body_pos: u64,
    pub body_len: u64,
}

impl Dataset {
    fn new(dataset_type: DatasetType, body_pos: u64, body_len: u64) -> Dataset {
        Dataset {
            dataset_type,
            id: 0,
            version: 0,
            is_empty: false,
            lon: 0,
            lat: 0,
            body_pos,
            body_len,
        }
    }
}

/// Which sub-iterator the current dataset permits. At most one window is
/// open at a time; `Nds` and `Refs` hand over to `Tags` when their inner
/// block is exhausted.
enum Iterating {
    None,
    Tags,
    Nds { end: u64 },
    Refs { end: u64 },
}

/// All running delta accumulators plus the extent of the dataset being
/// walked. Cleared by the in-stream reset marker.
struct DecoderState {
    node_id: i64,
    way_id: i64,
    rel_id: i64,
    lon: i32,
    lat: i32,
    way_node_id: i64,
    node_ref_id: i64,
    way_ref_id: i64,
    rel_ref_id: i64,
    current: u64,
    length: u64,
    iterating: Iterating,
}

impl DecoderState {
    fn new() -> DecoderState {
        DecoderState {
            node_id: 0,
            way_id: 0,
            rel_id: 0,
            lon: 0,
            lat: 0,
            way_node_id: 0,
            node_ref_id: 0,
            way_ref_id: 0,
            rel_ref_id: 0,
            current: 0,
            length: 0,
            iterating: Iterating::None,
        }
    }
}

/// Where the string pair produced by the last reference site lives:
/// in a ring slot, or in the scratch buffer for literals too long to
/// intern. Either way the bytes stay valid until the next reference
/// site is decoded.
enum PairLoc {
    Slot(usize),
    Scratch,
}

pub struct O5mReader<R: Read + Seek> {
    file: BufferedRead<R>,
    ring: StringPairRing,
    state: DecoderState,
    scratch: Vec<u8>,
    pair: PairLoc,
}

impl<R: Read + Seek> O5mReader<R> {
    pub fn open(src: R) -> Result<O5mReader<R>> {
        let mut file = BufferedRead::new(src)?;
        match file.read_byte()? {
            None => return Err(Error::UnexpectedEof),
            Some(DS_RESET) => {}
            Some(_) => return Err(Error::WrongStart),
        }
        Ok(O5mReader {
            file,
            ring: StringPairRing::new(),
            state: DecoderState::new(),
            scratch: Vec::with_capacity(1024),
            pair: PairLoc::Scratch,
        })
    }

    pub fn position(&self) -> u64 {
        self.file.tell()
    }

    fn reset_state(&mut self) {
        self.state = DecoderState::new();
        self.ring.reset();
    }

    fn no_more_data(&self) -> bool {
        self.file.tell() >= self.state.current + self.state.length
    }

    /// Advances to the next node, way or relation, draining whatever the
    /// caller left unconsumed of the previous dataset. Returns `None` at
    /// the end-of-file marker.
    pub fn next_dataset(&mut self) -> Result<Option<Dataset>> {
        loop {
            if self.state.length != 0 {
                // tags must be walked, not seeked over: their literals
                // feed the string table that later references count on
                if matches!(self.state.iterating, Iterating::Tags) {
                    while self.next_tag()?.is_some() {}
                }
                let target = self.state.current + self.state.length;
                let here = self.file.tell();
                self.file.seek(SeekFrom::Current(target as i64 - here as i64))?;
                self.state.length = 0;
                self.state.iterating = Iterating::None;
            }

            let t = match self.file.read_byte()? {
                Some(t) => t,
                None => return Err(Error::UnexpectedEof),
            };

            match t {
                DS_END => return Ok(None),
                DS_RESET => {
                    self.reset_state();
                }
                0xf0 => {}
                DS_NODE | DS_WAY | DS_REL => {
                    self.state.length = read_uvarint(&mut self.file)?;
                    self.state.current = self.file.tell();
                    let ds = match t {
                        DS_NODE => self.read_node()?,
                        DS_WAY => self.read_way()?,
                        _ => self.read_relation()?,
                    };
                    return Ok(Some(ds));
                }
                DS_TIMESTAMP => {
                    self.state.length = read_uvarint(&mut self.file)?;
                    self.state.current = self.file.tell();
                    let ts = read_svarint(&mut self.file)?;
                    message!("file timestamp {}", timestamp_string(ts));
                }
                _ => {
                    // bbox, header, sync, jump: note the extent and let
                    // the loop top skip the body
                    self.state.length = read_uvarint(&mut self.file)?;
                    self.state.current = self.file.tell();
                }
            }
        }
    }

    /// Returns true when the dataset body was exhausted by the version
    /// block, i.e. the entity is empty.
    fn read_version(&mut self, ds: &mut Dataset) -> Result<bool> {
        let v = read_uvarint(&mut self.file)?;
        ds.version = v as u32;
        if v != 0 {
            let _timestamp = read_uvarint(&mut self.file)?;
            let _changeset = read_svarint(&mut self.file)?;
            if self.no_more_data() {
                return Ok(true);
            }
            // uid and user name
            self.read_string_pair(false)?;
        }
        Ok(self.no_more_data())
    }

    fn read_node(&mut self) -> Result<Dataset> {
        let delta = read_svarint(&mut self.file)?;
        self.state.iterating = Iterating::Tags;
        self.state.node_id += delta;

        let mut ds = Dataset::new(DatasetType::Node, self.state.current, self.state.length);
        ds.id = self.state.node_id;

        if self.read_version(&mut ds)? {
            ds.is_empty = true;
            return Ok(ds);
        }

        let lon = read_svarint(&mut self.file)?;
        self.state.lon = self.state.lon.wrapping_add(lon as i32);
        let lat = read_svarint(&mut self.file)?;
        self.state.lat = self.state.lat.wrapping_add(lat as i32);

        ds.lon = self.state.lon;
        ds.lat = self.state.lat;
        Ok(ds)
    }

    fn read_way(&mut self) -> Result<Dataset> {
        let delta = read_svarint(&mut self.file)?;
        self.state.way_id += delta;

        let mut ds = Dataset::new(DatasetType::Way, self.state.current, self.state.length);
        ds.id = self.state.way_id;

        if self.read_version(&mut ds)? {
            ds.is_empty = true;
            self.state.iterating = Iterating::None;
            return Ok(ds);
        }

        let nd_len = read_uvarint(&mut self.file)?;
        self.state.iterating = Iterating::Nds {
            end: self.file.tell() + nd_len,
        };
        Ok(ds)
    }

    fn read_relation(&mut self) -> Result<Dataset> {
        let delta = read_svarint(&mut self.file)?;
        self.state.rel_id += delta;

        let mut ds = Dataset::new(DatasetType::Relation, self.state.current, self.state.length);
        ds.id = self.state.rel_id;

        if self.read_version(&mut ds)? {
            ds.is_empty = true;
            self.state.iterating = Iterating::None;
            return Ok(ds);
        }

        let rf_len = read_uvarint(&mut self.file)?;
        self.state.iterating = Iterating::Refs {
            end: self.file.tell() + rf_len,
        };
        Ok(ds)
    }

    /// Next (key, value) tag of the current dataset; `None` once the
    /// dataset body is exhausted. Pending way-node or member windows are
    /// drained first. Borrows stay valid until the next reader call.
    pub fn next_tag(&mut self) -> Result<Option<(&str, &str)>> {
        if matches!(self.state.iterating, Iterating::Nds { .. }) {
            while self.next_way_node()?.is_some() {}
        }
        if matches!(self.state.iterating, Iterating::Refs { .. }) {
            while self.next_member()?.is_some() {}
        }
        if !matches!(self.state.iterating, Iterating::Tags) {
            return Err(Error::IllegalSubIteration("tags"));
        }
        if self.no_more_data() {
            self.state.iterating = Iterating::None;
            return Ok(None);
        }

        self.read_string_pair(false)?;
        let bytes = self.pair_bytes();
        let k_end = match bytes.iter().position(|&b| b == 0) {
            Some(p) => p,
            None => return Err(Error::UnexpectedEof),
        };
        let rest = &bytes[k_end + 1..];
        let v_end = match rest.iter().position(|&b| b == 0) {
            Some(p) => p,
            None => return Err(Error::UnexpectedEof),
        };
        Ok(Some((
            std::str::from_utf8(&bytes[..k_end])?,
            std::str::from_utf8(&rest[..v_end])?,
        )))
    }

    /// Next node id referenced by the current way; `None` at the end of
    /// the reference block, after which tags become available.
    pub fn next_way_node(&mut self) -> Result<Option<i64>> {
        let end = match self.state.iterating {
            Iterating::Nds { end } => end,
            _ => return Err(Error::IllegalSubIteration("way node")),
        };
        if self.file.tell() >= end {
            self.state.iterating = Iterating::Tags;
            return Ok(None);
        }
        let delta = read_svarint(&mut self.file)?;
        self.state.way_node_id += delta;
        Ok(Some(self.state.way_node_id))
    }

    /// Next member of the current relation; `None` at the end of the
    /// member block, after which tags become available.
    pub fn next_member(&mut self) -> Result<Option<(i64, MemberType, &str)>> {
        let end = match self.state.iterating {
            Iterating::Refs { end } => end,
            _ => return Err(Error::IllegalSubIteration("member")),
        };
        if self.file.tell() >= end {
            self.state.iterating = Iterating::Tags;
            return Ok(None);
        }
        let delta = read_svarint(&mut self.file)?;
        self.read_string_pair(true)?;

        let first = match self.pair_bytes().first() {
            Some(b) => *b,
            None => return Err(Error::UnexpectedEof),
        };
        let (member_type, id) = match first {
            b'0' => {
                self.state.node_ref_id += delta;
                (MemberType::Node, self.state.node_ref_id)
            }
            b'1' => {
                self.state.way_ref_id += delta;
                (MemberType::Way, self.state.way_ref_id)
            }
            b'2' => {
                self.state.rel_ref_id += delta;
                (MemberType::Relation, self.state.rel_ref_id)
            }
            other => return Err(Error::BadMemberType(other)),
        };

        let bytes = self.pair_bytes();
        let role_end = match bytes[1..].iter().position(|&b| b == 0) {
            Some(p) => p + 1,
            None => return Err(Error::UnexpectedEof),
        };
        let role = std::str::from_utf8(&bytes[1..role_end])?;
        Ok(Some((id, member_type, role)))
    }

    /// Decodes a string-pair reference site: either a back-reference
    /// into the ring, or one (`single`) or two NUL-terminated literals
    /// which are interned when short enough.
    fn read_string_pair(&mut self, single: bool) -> Result<()> {
        let key = read_uvarint(&mut self.file)?;
        if key != 0 {
            self.pair = PairLoc::Slot(self.ring.slot_index(key));
            return Ok(());
        }

        self.scratch.clear();
        let nstrings = if single { 1 } else { 2 };
        for _ in 0..nstrings {
            loop {
                let b = match self.file.read_byte()? {
                    Some(b) => b,
                    None => return Err(Error::UnexpectedEof),
                };
                self.scratch.push(b);
                if b == 0 {
                    break;
                }
            }
        }

        if self.scratch.len() <= MAX_INTERN_LENGTH {
            let slot = self.ring.intern(&self.scratch);
            self.pair = PairLoc::Slot(slot);
        } else {
            self.pair = PairLoc::Scratch;
        }
        Ok(())
    }

    fn pair_bytes(&self) -> &[u8] {
        match self.pair {
            PairLoc::Slot(i) => self.ring.slot(i),
            PairLoc::Scratch => &self.scratch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::o5mformat::varint::{pack_svarint, pack_uvarint};
    use std::io::Cursor;

    struct Builder {
        data: Vec<u8>,
    }

    impl Builder {
        fn new() -> Builder {
            Builder {
                data: vec![DS_RESET],
            }
        }

        fn dataset(mut self, dtype: u8, body: &[u8]) -> Builder {
            self.data.push(dtype);
            pack_uvarint(&mut self.data, body.len() as u64);
            self.data.extend(body);
            self
        }

        fn raw(mut self, byte: u8) -> Builder {
            self.data.push(byte);
            self
        }

        fn end(mut self) -> Vec<u8> {
            self.data.push(DS_END);
            self.data
        }
    }

    fn node_body(id_delta: i64, lon_delta: i64, lat_delta: i64, tags: &[&[u8]]) -> Vec<u8> {
        let mut b = Vec::new();
        pack_svarint(&mut b, id_delta);
        pack_uvarint(&mut b, 0); // no version info
        pack_svarint(&mut b, lon_delta);
        pack_svarint(&mut b, lat_delta);
        for t in tags {
            b.extend(*t);
        }
        b
    }

    fn literal_pair(key: &str, val: &str) -> Vec<u8> {
        let mut b = Vec::new();
        pack_uvarint(&mut b, 0);
        b.extend(key.as_bytes());
        b.push(0);
        b.extend(val.as_bytes());
        b.push(0);
        b
    }

    fn reference_pair(back: u64) -> Vec<u8> {
        let mut b = Vec::new();
        pack_uvarint(&mut b, back);
        b
    }

    fn way_body(id_delta: i64, nd_deltas: &[i64], tags: &[&[u8]]) -> Vec<u8> {
        let mut b = Vec::new();
        pack_svarint(&mut b, id_delta);
        pack_uvarint(&mut b, 0);
        let mut nds = Vec::new();
        for d in nd_deltas {
            pack_svarint(&mut nds, *d);
        }
        pack_uvarint(&mut b, nds.len() as u64);
        b.extend(nds);
        for t in tags {
            b.extend(*t);
        }
        b
    }

    fn open(data: Vec<u8>) -> O5mReader<Cursor<Vec<u8>>> {
        O5mReader::open(Cursor::new(data)).unwrap()
    }

    #[test]
    fn test_wrong_start() {
        assert!(matches!(
            O5mReader::open(Cursor::new(vec![0x10])),
            Err(Error::WrongStart)
        ));
        assert!(matches!(
            O5mReader::open(Cursor::new(vec![])),
            Err(Error::UnexpectedEof)
        ));
    }

    #[test]
    fn test_empty_file() {
        let mut rd = open(Builder::new().end());
        assert!(rd.next_dataset().unwrap().is_none());
    }

    #[test]
    fn test_single_node() {
        let data = Builder::new()
            .dataset(DS_NODE, &node_body(5001, 523705392, 48075603, &[]))
            .end();
        let mut rd = open(data);
        let ds = rd.next_dataset().unwrap().unwrap();
        assert_eq!(ds.dataset_type, DatasetType::Node);
        assert_eq!(ds.id, 5001);
        assert_eq!(ds.lon, 523705392);
        assert_eq!(ds.lat, 48075603);
        assert!(!ds.is_empty);
        assert!(rd.next_tag().unwrap().is_none());
        assert!(rd.next_dataset().unwrap().is_none());
    }

    #[test]
    fn test_delta_accumulation() {
        let data = Builder::new()
            .dataset(DS_NODE, &node_body(100, 10, -10, &[]))
            .dataset(DS_NODE, &node_body(50, -3, 5, &[]))
            .end();
        let mut rd = open(data);
        let a = rd.next_dataset().unwrap().unwrap();
        assert_eq!((a.id, a.lon, a.lat), (100, 10, -10));
        let b = rd.next_dataset().unwrap().unwrap();
        assert_eq!((b.id, b.lon, b.lat), (150, 7, -5));
    }

    #[test]
    fn test_reset_clears_deltas() {
        let data = Builder::new()
            .dataset(DS_NODE, &node_body(100, 10, 10, &[]))
            .raw(DS_RESET)
            .dataset(DS_NODE, &node_body(100, 10, 10, &[]))
            .end();
        let mut rd = open(data);
        let a = rd.next_dataset().unwrap().unwrap();
        let b = rd.next_dataset().unwrap().unwrap();
        assert_eq!(a.id, 100);
        assert_eq!(b.id, 100);
        assert_eq!(b.lon, 10);
    }

    #[test]
    fn test_node_tags_and_back_references() {
        let p1 = literal_pair("amenity", "cafe");
        let p2 = literal_pair("name", "corner");
        let data = Builder::new()
            .dataset(DS_NODE, &node_body(1, 0, 0, &[&p1, &p2]))
            .dataset(DS_NODE, &node_body(1, 0, 0, &[&reference_pair(2)]))
            .end();
        let mut rd = open(data);

        rd.next_dataset().unwrap().unwrap();
        assert_eq!(rd.next_tag().unwrap(), Some(("amenity", "cafe")));
        assert_eq!(rd.next_tag().unwrap(), Some(("name", "corner")));
        assert_eq!(rd.next_tag().unwrap(), None);

        rd.next_dataset().unwrap().unwrap();
        // back two entries is the pair before the most recent one
        assert_eq!(rd.next_tag().unwrap(), Some(("amenity", "cafe")));
        assert_eq!(rd.next_tag().unwrap(), None);
    }

    #[test]
    fn test_long_pair_not_interned() {
        let long_val = "x".repeat(300);
        let p_long = literal_pair("big", &long_val);
        let p_short = literal_pair("small", "v");
        let data = Builder::new()
            .dataset(DS_NODE, &node_body(1, 0, 0, &[&p_short, &p_long]))
            .dataset(DS_NODE, &node_body(1, 0, 0, &[&reference_pair(1)]))
            .end();
        let mut rd = open(data);

        rd.next_dataset().unwrap().unwrap();
        assert_eq!(rd.next_tag().unwrap(), Some(("small", "v")));
        let t = rd.next_tag().unwrap().unwrap();
        assert_eq!(t.0, "big");
        assert_eq!(t.1.len(), 300);
        assert!(rd.next_tag().unwrap().is_none());

        rd.next_dataset().unwrap().unwrap();
        // the oversized pair did not advance the table, so back one is
        // still the short pair
        assert_eq!(rd.next_tag().unwrap(), Some(("small", "v")));
    }

    #[test]
    fn test_way_nodes_then_tags() {
        let p = literal_pair("highway", "residential");
        let data = Builder::new()
            .dataset(DS_WAY, &way_body(7, &[10, 1, 1], &[&p]))
            .end();
        let mut rd = open(data);
        let ds = rd.next_dataset().unwrap().unwrap();
        assert_eq!(ds.dataset_type, DatasetType::Way);
        assert_eq!(ds.id, 7);

        assert_eq!(rd.next_way_node().unwrap(), Some(10));
        assert_eq!(rd.next_way_node().unwrap(), Some(11));
        assert_eq!(rd.next_way_node().unwrap(), Some(12));
        assert_eq!(rd.next_way_node().unwrap(), None);

        assert_eq!(rd.next_tag().unwrap(), Some(("highway", "residential")));
        assert_eq!(rd.next_tag().unwrap(), None);
    }

    #[test]
    fn test_tags_drain_pending_way_nodes() {
        let p = literal_pair("highway", "service");
        let data = Builder::new()
            .dataset(DS_WAY, &way_body(7, &[10, 1, 1], &[&p]))
            .end();
        let mut rd = open(data);
        rd.next_dataset().unwrap().unwrap();
        // skipping straight to tags silently walks the node refs
        assert_eq!(rd.next_tag().unwrap(), Some(("highway", "service")));
    }

    #[test]
    fn test_relation_members() {
        let mut body = Vec::new();
        pack_svarint(&mut body, 9); // relation id
        pack_uvarint(&mut body, 0); // version
        let mut refs = Vec::new();
        pack_svarint(&mut refs, 4);
        pack_uvarint(&mut refs, 0);
        refs.extend(b"0outer\0");
        pack_svarint(&mut refs, 2);
        pack_uvarint(&mut refs, 0);
        refs.extend(b"1inner\0");
        pack_uvarint(&mut body, refs.len() as u64);
        body.extend(refs);

        let data = Builder::new().dataset(DS_REL, &body).end();
        let mut rd = open(data);
        let ds = rd.next_dataset().unwrap().unwrap();
        assert_eq!(ds.dataset_type, DatasetType::Relation);
        assert_eq!(ds.id, 9);

        let (id, t, role) = rd.next_member().unwrap().unwrap();
        assert_eq!((id, t, role), (4, MemberType::Node, "outer"));
        let (id, t, role) = rd.next_member().unwrap().unwrap();
        assert_eq!((id, t, role), (2, MemberType::Way, "inner"));
        assert!(rd.next_member().unwrap().is_none());
        assert!(rd.next_tag().unwrap().is_none());
    }

    #[test]
    fn test_member_deltas_per_type() {
        let mut body = Vec::new();
        pack_svarint(&mut body, 1);
        pack_uvarint(&mut body, 0);
        let mut refs = Vec::new();
        for (delta, tb) in [(10i64, b'0'), (5, b'1'), (3, b'0'), (2, b'1')] {
            pack_svarint(&mut refs, delta);
            pack_uvarint(&mut refs, 0);
            refs.push(tb);
            refs.push(0);
        }
        pack_uvarint(&mut body, refs.len() as u64);
        body.extend(refs);

        let data = Builder::new().dataset(DS_REL, &body).end();
        let mut rd = open(data);
        rd.next_dataset().unwrap().unwrap();
        let ids: Vec<(i64, MemberType)> = std::iter::from_fn(|| {
            rd.next_member().unwrap().map(|(i, t, _)| (i, t))
        })
        .collect();
        assert_eq!(
            ids,
            vec![
                (10, MemberType::Node),
                (5, MemberType::Way),
                (13, MemberType::Node),
                (7, MemberType::Way),
            ]
        );
    }

    #[test]
    fn test_illegal_sub_iteration() {
        let data = Builder::new()
            .dataset(DS_NODE, &node_body(1, 0, 0, &[]))
            .end();
        let mut rd = open(data);
        rd.next_dataset().unwrap().unwrap();
        assert!(matches!(
            rd.next_way_node(),
            Err(Error::IllegalSubIteration(_))
        ));
        assert!(matches!(
            rd.next_member(),
            Err(Error::IllegalSubIteration(_))
        ));
    }

    #[test]
    fn test_empty_node_from_version_block() {
        let mut body = Vec::new();
        pack_svarint(&mut body, 12);
        pack_uvarint(&mut body, 3); // version
        pack_uvarint(&mut body, 1000); // timestamp
        pack_svarint(&mut body, 42); // changeset
        let data = Builder::new().dataset(DS_NODE, &body).end();
        let mut rd = open(data);
        let ds = rd.next_dataset().unwrap().unwrap();
        assert_eq!(ds.id, 12);
        assert_eq!(ds.version, 3);
        assert!(ds.is_empty);
        assert!(rd.next_dataset().unwrap().is_none());
    }

    #[test]
    fn test_unconsumed_datasets_are_skipped() {
        let p = literal_pair("k", "v");
        let data = Builder::new()
            .dataset(DS_NODE, &node_body(1, 5, 5, &[&p]))
            .dataset(DS_WAY, &way_body(3, &[1, 1], &[]))
            .dataset(DS_NODE, &node_body(1, 1, 1, &[]))
            .end();
        let mut rd = open(data);
        // consume nothing from any of them
        assert_eq!(rd.next_dataset().unwrap().unwrap().id, 1);
        assert_eq!(rd.next_dataset().unwrap().unwrap().id, 3);
        let n = rd.next_dataset().unwrap().unwrap();
        assert_eq!(n.id, 2);
        assert_eq!(n.lon, 6);
        assert!(rd.next_dataset().unwrap().is_none());
    }

    #[test]
    fn test_other_dataset_types_skipped() {
        let data = Builder::new()
            .dataset(DS_BBOX, &[1, 2, 3, 4])
            .dataset(DS_HEADER, b"#!o5m2")
            .dataset(DS_NODE, &node_body(8, 0, 0, &[]))
            .end();
        let mut rd = open(data);
        let ds = rd.next_dataset().unwrap().unwrap();
        assert_eq!(ds.id, 8);
    }

    #[test]
    fn test_truncated_dataset() {
        let mut data = Builder::new().end();
        data.pop(); // drop the end marker: bare reset then EOF
        let mut rd = open(data);
        assert!(matches!(rd.next_dataset(), Err(Error::UnexpectedEof)));
    }
}
