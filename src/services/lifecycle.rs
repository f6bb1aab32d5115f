//! Test result lifecycle.
//!
//! A test result moves through:
//!
//! ```text
//! submit ──► PENDING ──┐
//!                      ├─ analysis ok ──► COMPLETED
//! update ──► IN_PROGRESS ┤
//!                      └─ analysis failed ► FAILED
//! retry (any status) ──┘
//! ```
//!
//! Each operation performs at most two writes separated by one analysis call.
//! An analysis failure is never an error for the caller: the record is marked
//! FAILED and can be retried later with the stored raw data.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::db::test_results::NewTestResult;
use crate::entity::test_result;
use crate::error::{AppError, AppResult};
use crate::models::test_result::require_json_object;
use crate::models::{
    TestResult, TestResultDetail, TestResultMutationResponse, TestStatus, TestType,
};
use crate::services::analysis::{AnalysisOutcome, AnalysisService};

/// Which operation triggered an analysis attempt; selects the response message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Submit,
    Update,
    Retry,
}

impl Trigger {
    fn message(&self, completed: bool) -> &'static str {
        match (self, completed) {
            (Self::Submit, true) => "Test result created and analyzed successfully",
            (Self::Submit, false) => "Test result created but AI analysis failed",
            (Self::Update, true) => "Test result updated and analyzed successfully",
            (Self::Update, false) => "Test result updated but AI analysis failed",
            (Self::Retry, true) => "Test result analyzed successfully",
            (Self::Retry, false) => "AI analysis failed",
        }
    }
}

/// Owns test result state transitions and the call into the analysis service.
#[derive(Clone)]
pub struct TestResultLifecycle {
    pool: DbPool,
    analysis: Arc<dyn AnalysisService>,
}

impl TestResultLifecycle {
    pub fn new(pool: DbPool, analysis: Arc<dyn AnalysisService>) -> Self {
        Self { pool, analysis }
    }

    /// The analysis backend, for health reporting.
    pub fn analysis(&self) -> &Arc<dyn AnalysisService> {
        &self.analysis
    }

    /// Create a PENDING record for an existing sample and analyze it.
    pub async fn submit(
        &self,
        sample_id: Uuid,
        test_type: TestType,
        raw_data: JsonValue,
    ) -> AppResult<TestResultMutationResponse> {
        require_json_object(&raw_data, "raw_data")?;

        if self.pool.get_sample_by_id(sample_id).await?.is_none() {
            return Err(AppError::InvalidInput(format!(
                "Sample {} does not exist",
                sample_id
            )));
        }

        let record = self
            .pool
            .insert_test_result(NewTestResult {
                sample_id,
                test_type,
                raw_data,
            })
            .await?;

        info!(
            test_result_id = %record.id,
            sample_id = %sample_id,
            test_type = %test_type,
            "Test result created"
        );

        self.run_analysis(record, Trigger::Submit).await
    }

    /// Replace raw data, move to IN_PROGRESS and re-analyze.
    ///
    /// The test type is never changed.
    pub async fn update_raw_data(
        &self,
        id: Uuid,
        raw_data: JsonValue,
    ) -> AppResult<TestResultMutationResponse> {
        require_json_object(&raw_data, "raw_data")?;

        let record = self
            .pool
            .update_test_result_raw_data(id, raw_data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test result {}", id)))?;

        info!(test_result_id = %id, "Test result raw data updated");

        self.run_analysis(record, Trigger::Update).await
    }

    /// Re-run analysis on the stored raw data without modifying it.
    pub async fn retry_analysis(&self, id: Uuid) -> AppResult<TestResultMutationResponse> {
        let record = self
            .pool
            .get_test_result_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test result {}", id)))?;

        info!(
            test_result_id = %id,
            previous_status = %record.status,
            "Retrying analysis"
        );

        self.run_analysis(record, Trigger::Retry).await
    }

    /// Fetch one record.
    pub async fn get(&self, id: Uuid) -> AppResult<TestResult> {
        let record = self
            .pool
            .get_test_result_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test result {}", id)))?;

        TestResult::try_from(record)
    }

    /// Fetch one record together with its sample.
    pub async fn get_detail(&self, id: Uuid) -> AppResult<TestResultDetail> {
        let test_result = self.get(id).await?;
        let sample = self.pool.get_sample_summary(test_result.sample_id).await?;

        Ok(TestResultDetail {
            test_result,
            sample,
        })
    }

    /// List records newest first, optionally for one sample.
    pub async fn list(&self, sample_id: Option<Uuid>) -> AppResult<Vec<TestResult>> {
        self.list_limited(sample_id, None).await
    }

    /// The `limit` newest records across all samples.
    pub async fn recent(&self, limit: u64) -> AppResult<Vec<TestResult>> {
        self.list_limited(None, Some(limit)).await
    }

    async fn list_limited(
        &self,
        sample_id: Option<Uuid>,
        limit: Option<u64>,
    ) -> AppResult<Vec<TestResult>> {
        self.pool
            .list_test_results(sample_id, limit)
            .await?
            .into_iter()
            .map(TestResult::try_from)
            .collect()
    }

    /// Remove a record. The owning sample is untouched.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.pool.delete_test_result(id).await? {
            return Err(AppError::NotFound(format!("Test result {}", id)));
        }

        info!(test_result_id = %id, "Test result deleted");
        Ok(())
    }

    /// One analysis attempt followed by the terminal write.
    async fn run_analysis(
        &self,
        record: test_result::Model,
        trigger: Trigger,
    ) -> AppResult<TestResultMutationResponse> {
        let current = TestResult::try_from(record)?;

        let outcome = self
            .analysis
            .analyze(current.test_type, &current.raw_data)
            .await;

        let (status, ai_analysis) = match outcome {
            AnalysisOutcome::Completed(document) => (TestStatus::Completed, Some(document)),
            AnalysisOutcome::Failed(failure) => {
                warn!(
                    test_result_id = %current.id,
                    test_type = %current.test_type,
                    "AI analysis failed: {}",
                    failure
                );
                (TestStatus::Failed, None)
            }
        };

        let stored = self
            .pool
            .record_analysis_outcome(current.id, status, ai_analysis)
            .await?;
        let test_result = TestResult::try_from(stored)?;

        let analysis_completed = status == TestStatus::Completed;
        info!(
            test_result_id = %test_result.id,
            status = %test_result.status,
            "Test result analysis finished"
        );

        Ok(TestResultMutationResponse {
            message: trigger.message(analysis_completed).to_string(),
            analysis_completed,
            test_result,
        })
    }
}
