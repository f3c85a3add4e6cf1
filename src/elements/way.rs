use crate::archive::{Archive, ArchiveItem};
use crate::elements::bbox::Bbox;
use crate::elements::tags::Tag;

impl ArchiveItem for Tag {
    fn archive(&mut self, ar: &mut Archive) {
        ar.string_field(&mut self.key);
        ar.string_field(&mut self.val);
    }
}

/// Serialized payload stored in the spatial tree for each way: the id,
/// the bounding box over the matched nodes, the matched vertices in
/// reference order, and the tags. Vertices whose node was absent from
/// the node store are compacted out.
#[derive(Debug, Clone, PartialEq)]
pub struct WayRecord {
    pub id: i64,
    pub bbox: Bbox,
    pub vertices: Vec<(i32, i32)>,
    pub tags: Vec<Tag>,
}

impl WayRecord {
    pub fn new(id: i64) -> WayRecord {
        WayRecord {
            id,
            bbox: Bbox::empty(),
            vertices: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// The extent below which the way stops mattering, in degrees: the
    /// smaller of the box's two sides.
    pub fn size_dimension(&self) -> f64 {
        f64::min(self.bbox.width(), self.bbox.height())
    }

    fn archive(&mut self, ar: &mut Archive) {
        ar.i64_field(&mut self.id);
        ar.i32_field(&mut self.bbox.min_lon);
        ar.i32_field(&mut self.bbox.min_lat);
        ar.i32_field(&mut self.bbox.max_lon);
        ar.i32_field(&mut self.bbox.max_lat);
        ar.point_list_field(&mut self.vertices);
        ar.item_list_field(&mut self.tags);
    }

    pub fn to_bytes(&mut self) -> Vec<u8> {
        let mut ar = Archive::for_writing();
        self.archive(&mut ar);
        ar.into_bytes()
    }

    pub fn from_bytes(data: Vec<u8>) -> WayRecord {
        let mut ar = Archive::for_reading(data);
        let mut w = WayRecord::new(0);
        w.archive(&mut ar);
        w
    }
}
