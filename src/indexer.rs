use crate::elements::{NodeValue, Tag, WayRecord};
use crate::error::Result;
use crate::logging::ProgressBytes;
use crate::o5mformat::{Dataset, DatasetType, O5mReader};
use crate::rtree::{RTree, Region, Visitor};
use crate::settings::IndexSettings;
use crate::store::{CachedPageStore, NodeReader, NodeStore, PageStore};
use crate::utils::{coordinate_as_float, ThreadTimer};
use crate::{message, progress_bytes};
use std::fmt;
use std::fs::File;
use std::io::{Read, Seek};

#[derive(Debug)]
pub struct IndexStats {
    pub nodes_read: u64,
    pub ways_read: u64,
    pub relations_read: u64,
    pub broken_ways: u64,
    pub empty_ways: u64,
    pub vertices_matched: u64,
    pub vertices_missing: u64,
    pub tree_entries: u64,
}

impl IndexStats {
    pub fn new() -> IndexStats {
        IndexStats {
            nodes_read: 0,
            ways_read: 0,
            relations_read: 0,
            broken_ways: 0,
            empty_ways: 0,
            vertices_matched: 0,
            vertices_missing: 0,
            tree_entries: 0,
        }
    }
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes:     {:12}\nways:      {:12} [{} indexed, {} broken, {} empty]\nrelations: {:12}\nvertices:  {:12} [{} missing]",
            self.nodes_read,
            self.ways_read,
            self.tree_entries,
            self.broken_ways,
            self.empty_ways,
            self.relations_read,
            self.vertices_matched,
            self.vertices_missing
        )
    }
}

fn way_region(w: &WayRecord) -> Region {
    let s = w.size_dimension();
    Region::new(
        [
            coordinate_as_float(w.bbox.min_lon),
            coordinate_as_float(w.bbox.min_lat),
            s,
        ],
        [
            coordinate_as_float(w.bbox.max_lon),
            coordinate_as_float(w.bbox.max_lat),
            s,
        ],
    )
}

/// Streams an o5m extract into the node store and the way tree. The
/// node phase is skipped when a node store from an earlier run is
/// already in place.
pub fn index_file(
    o5m_path: &str,
    node_store_path: &str,
    way_store_path: &str,
    settings: &IndexSettings,
) -> Result<IndexStats> {
    let mut stats = IndexStats::new();

    let have_nodes = NodeStore::exists(node_store_path);
    if have_nodes {
        message!("node store {} already present, reusing", node_store_path);
    }
    let mut node_store = NodeStore::open(node_store_path, settings)?;

    let flen = std::fs::metadata(o5m_path)?.len();
    let f = File::open(o5m_path)?;
    let mut reader = O5mReader::open(f)?;

    let pb = progress_bytes!(&format!("index {}", o5m_path), flen);
    let tm = ThreadTimer::new();

    let pending = load_nodes(
        &mut reader,
        &mut node_store,
        have_nodes,
        settings,
        &mut stats,
        &*pb,
    )?;

    node_store.flush()?;
    if !have_nodes {
        node_store.compact();
    }
    message!(
        "node phase done: {} nodes in, {:.1}s cpu",
        stats.nodes_read,
        tm.since()
    );

    let mut page_store = CachedPageStore::open(way_store_path, settings)?;
    {
        let mut tree = RTree::open_or_create(&mut page_store)?;
        let node_reader = node_store.reader();
        index_ways(
            &mut reader,
            node_reader,
            &mut tree,
            pending,
            settings,
            &mut stats,
            &*pb,
        )?;
        tree.flush()?;
    }
    page_store.flush()?;
    pb.progress_bytes(reader.position());
    pb.finish();
    message!(
        "way phase done: {} ways in, {:.1}s cpu total",
        stats.ways_read,
        tm.since()
    );
    Ok(stats)
}

/// Node phase: write every located node until the first way or relation
/// shows up, flushing the batch on a fixed cadence. Returns the dataset
/// that ended the phase.
fn load_nodes<R: Read + Seek>(
    reader: &mut O5mReader<R>,
    store: &mut NodeStore,
    skip_writes: bool,
    settings: &IndexSettings,
    stats: &mut IndexStats,
    pb: &dyn ProgressBytes,
) -> Result<Option<Dataset>> {
    let mut datasets = 0u64;
    while let Some(ds) = reader.next_dataset()? {
        if ds.dataset_type != DatasetType::Node {
            return Ok(Some(ds));
        }
        stats.nodes_read += 1;
        datasets += 1;
        if !skip_writes && !ds.is_empty {
            store.insert(
                ds.id,
                &NodeValue::new(ds.lon, ds.lat, ds.body_pos, ds.body_len),
            );
        }
        if datasets % settings.node_flush_interval == 0 {
            store.flush()?;
        }
        if stats.nodes_read % settings.node_progress_interval == 0 {
            pb.progress_bytes(reader.position());
        }
    }
    Ok(None)
}

/// Way phase: join each way against the node store, serialize and
/// insert. Relations are walked but discarded; their member roles and
/// tags still pass through the string table, which later back
/// references depend on.
fn index_ways<R: Read + Seek, S: PageStore>(
    reader: &mut O5mReader<R>,
    mut node_reader: NodeReader,
    tree: &mut RTree<S>,
    first: Option<Dataset>,
    settings: &IndexSettings,
    stats: &mut IndexStats,
    pb: &dyn ProgressBytes,
) -> Result<()> {
    let mut pending = first;
    loop {
        let ds = match pending.take() {
            Some(d) => d,
            None => match reader.next_dataset()? {
                Some(d) => d,
                None => break,
            },
        };
        match ds.dataset_type {
            DatasetType::Node => {
                stats.nodes_read += 1;
            }
            DatasetType::Way => {
                stats.ways_read += 1;
                if !ds.is_empty {
                    index_one_way(reader, &mut node_reader, tree, &ds, stats)?;
                }
                if stats.ways_read % settings.way_progress_interval == 0 {
                    pb.progress_bytes(reader.position());
                }
            }
            DatasetType::Relation => {
                stats.relations_read += 1;
                if !ds.is_empty {
                    while reader.next_member()?.is_some() {}
                    while reader.next_tag()?.is_some() {}
                }
            }
        }
    }
    Ok(())
}

fn index_one_way<R: Read + Seek, S: PageStore>(
    reader: &mut O5mReader<R>,
    node_reader: &mut NodeReader,
    tree: &mut RTree<S>,
    ds: &Dataset,
    stats: &mut IndexStats,
) -> Result<()> {
    let mut refs = Vec::new();
    while let Some(nd) = reader.next_way_node()? {
        refs.push(nd);
    }
    let mut way = WayRecord::new(ds.id);
    while let Some((k, v)) = reader.next_tag()? {
        way.tags.push(Tag::new(k.to_string(), v.to_string()));
    }

    let mut missing = 0u64;
    for r in &refs {
        match node_reader.find(*r)? {
            Some(nv) => {
                way.bbox.expand(nv.lon, nv.lat);
                way.vertices.push((nv.lon, nv.lat));
            }
            None => missing += 1,
        }
    }
    stats.vertices_matched += way.vertices.len() as u64;
    stats.vertices_missing += missing;
    if missing > 0 {
        stats.broken_ways += 1;
        message!(
            "broken way {}: {} of {} nodes missing",
            ds.id,
            missing,
            refs.len()
        );
    }
    if way.vertices.is_empty() {
        // nothing located, so no box to index it under
        stats.empty_ways += 1;
        return Ok(());
    }

    let region = way_region(&way);
    let data = way.to_bytes();
    tree.insert(region, way.id, &data)?;
    stats.tree_entries += 1;
    Ok(())
}

/// Collects way ids out of a tree query, optionally keeping only ways
/// carrying a given tag key.
pub struct WayIdCollector {
    filter: Option<String>,
    pub ids: Vec<i64>,
}

impl WayIdCollector {
    pub fn new(filter: Option<String>) -> WayIdCollector {
        WayIdCollector {
            filter,
            ids: Vec::new(),
        }
    }
}

impl Visitor for WayIdCollector {
    fn visit(&mut self, _region: &Region, _id: i64, data: &[u8]) {
        let w = WayRecord::from_bytes(data.to_vec());
        match &self.filter {
            None => self.ids.push(w.id),
            Some(key) => {
                if w.tags.iter().any(|t| &t.key == key) {
                    self.ids.push(w.id);
                }
            }
        }
    }
}

/// Range query over a finished way store: ways whose box intersects the
/// window and whose size dimension is at least `min_size` degrees.
pub fn query_ways(
    way_store_path: &str,
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
    min_size: f64,
    tag_key: Option<&str>,
    settings: &IndexSettings,
) -> Result<Vec<i64>> {
    let mut page_store = CachedPageStore::open(way_store_path, settings)?;
    let mut tree = RTree::open_or_create(&mut page_store)?;
    let region = Region::new([min_lon, min_lat, min_size], [max_lon, max_lat, f64::MAX]);
    let mut visitor = WayIdCollector::new(tag_key.map(String::from));
    tree.query(&region, &mut visitor)?;
    let mut ids = visitor.ids;
    ids.sort();
    Ok(ids)
}
