//! Re-export public algorithms.

pub mod acmr;
pub mod fifo;
pub mod optimize;

pub use acmr::{CacheStats, evaluate};
pub use optimize::{OptimizationReport, OptimizerConfig, optimize_faces, optimize_with_report};
