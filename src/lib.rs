
pub mod archive;
pub mod defaultlogger;
pub mod elements;
pub mod error;
pub mod indexer;
pub mod logging;
pub mod o5mformat;
pub mod rtree;
pub mod settings;
pub mod store;
pub mod stringutils;
pub mod utils;
