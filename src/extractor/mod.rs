pub mod snapshot;

pub use snapshot::extract_snapshot;
