mod buffered_read;
mod reader;
mod string_ring;
mod varint;

pub use crate::o5mformat::buffered_read::{BufferedRead, BUFFERED_READ_SIZE};
pub use crate::o5mformat::reader::{
    Dataset, DatasetType, MemberType, O5mReader, DS_BBOX, DS_END, DS_HEADER, DS_JUMP, DS_NODE,
    DS_REL, DS_RESET, DS_SYNC, DS_TIMESTAMP, DS_WAY,
};
pub use crate::o5mformat::string_ring::{
    StringPairRing, MAX_INTERN_LENGTH, STR_PAIR_STRING_SIZE, STR_PAIR_TABLE_SIZE,
};
pub use crate::o5mformat::varint::{
    pack_svarint, pack_uvarint, read_svarint, read_uvarint, un_zig_zag, zig_zag,
};
