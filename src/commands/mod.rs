//! Command implementations

pub mod audit;
pub mod evaluate;
pub mod simple;
pub mod watch;

pub use audit::{AuditStatistics, print_audit_statistics, run_audit};
pub use evaluate::{EvaluateResult, evaluate_pair};
pub use simple::run_simple;
pub use watch::run_watch;
