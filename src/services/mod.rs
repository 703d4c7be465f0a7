pub mod momentum;
pub mod scanner;
pub mod scoring;
pub mod tracker;

pub use scanner::{CandidateScanner, ScannerConfig};
pub use tracker::{TokenSnapshot, TokenTracker, TrackerConfig};
