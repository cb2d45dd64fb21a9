pub mod abbrev;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod platform;
pub mod progress;
pub mod prune;
pub mod relation;
pub mod report;
pub mod stats;
pub mod walker;

pub use config::AppConfig;
pub use engine::{DedupEngine, RunOutcome};
pub use error::Error;
pub use gate::{ConfirmationGate, RemovalKind, Verdict};
pub use progress::{ProgressReporter, SilentReporter, WalkMode};
pub use stats::{DirStats, RunStats};
