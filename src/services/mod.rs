//! Business logic services.

pub mod accounts;
pub mod analysis;
pub mod lifecycle;

pub use accounts::AccountService;
pub use analysis::{AnalysisFailure, AnalysisOutcome, AnalysisService, HttpAnalysisClient};
pub use lifecycle::TestResultLifecycle;
