//! Benchmark execution: trial timing, result collection, orchestration

pub mod orchestrator;
pub mod result_set;
pub mod trial;

pub use orchestrator::Orchestrator;
pub use result_set::ResultSet;
pub use trial::TrialRunner;
