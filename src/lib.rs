pub mod aggregate;
pub mod classify;
pub mod config;
pub mod dedup;
pub mod error;
pub mod format;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod remote;
pub mod report;
pub mod scheduler;

pub use error::{Error, Result};
