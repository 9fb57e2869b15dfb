//! File and console collaborators around the probe engine

pub mod reporter;
pub mod snapshot;
pub mod targets;

pub use reporter::ConsoleReporter;
pub use snapshot::{read_snapshot, write_snapshot};
pub use targets::{load_targets, parse_targets};
