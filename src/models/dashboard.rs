//! Dashboard statistics.

use serde::Serialize;
use utoipa::ToSchema;

/// Aggregate counters shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_samples: u64,
    /// PENDING + IN_PROGRESS test results
    pub pending_tests: u64,
    pub completed_tests: u64,
    pub failed_tests: u64,
    /// Percentage of finished analyses that completed, one decimal place
    pub success_rate: f64,
}

impl DashboardStats {
    pub fn new(
        total_samples: u64,
        pending_tests: u64,
        completed_tests: u64,
        failed_tests: u64,
    ) -> Self {
        let finished = completed_tests + failed_tests;
        let success_rate = if finished == 0 {
            0.0
        } else {
            ((completed_tests as f64 / finished as f64) * 1000.0).round() / 10.0
        };

        Self {
            total_samples,
            pending_tests,
            completed_tests,
            failed_tests,
            success_rate,
        }
    }
}
