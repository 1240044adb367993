pub mod analyzer;
pub mod estimator;

pub use analyzer::ChangeAnalyzer;
