pub mod document;
pub mod collection;
pub mod snapshot;
