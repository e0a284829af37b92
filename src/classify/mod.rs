//! Pure classification of parsed cluster state. Nothing here performs I/O.

pub mod load;
pub mod reservation;
pub mod symbol;
pub mod warning;

pub use load::classify_load;
pub use reservation::classify_reservation;
pub use symbol::Symbol;
pub use warning::{CpuWarning, MemoryWarning, cpu_warnings, memory_warnings};
