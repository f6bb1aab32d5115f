//! Lifecycle E2E test suite.
//!
//! Drives the full API against an in-memory SQLite database and an
//! in-process mock analysis service.
//!
//! Run with: cargo test --test lifecycle_e2e

mod mock_analysis_service;

mod test_authz;
mod test_queries;
mod test_retry;
mod test_submit;
mod test_update;
