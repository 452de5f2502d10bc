pub mod defs;

pub use defs::Entry;
