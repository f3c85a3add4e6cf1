mod bbox;
mod node;
mod tags;
mod way;

pub use crate::elements::bbox::Bbox;
pub use crate::elements::node::{NodeValue, NODE_VALUE_SIZE};
pub use crate::elements::tags::Tag;
pub use crate::elements::way::WayRecord;
