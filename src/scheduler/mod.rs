pub mod collector;
pub mod host;
pub mod job;
pub mod queue;
pub mod snapshot;
pub mod table;
