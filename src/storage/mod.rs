pub mod payload_log;
pub mod snapshot;

pub use payload_log::PayloadLog;
pub use snapshot::write_snapshot;
