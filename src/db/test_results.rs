//! Database queries for test results.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::entity::test_result::{self, ActiveModel as TestResultActiveModel, Entity as TestResult};
use crate::error::{AppError, AppResult};
use crate::models::test_result::{TestStatus, TestType};

use super::DbPool;

/// Represents a test result to be inserted.
pub struct NewTestResult {
    pub sample_id: Uuid,
    pub test_type: TestType,
    pub raw_data: JsonValue,
}

/// Number of test results per status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub failed: u64,
}

impl DbPool {
    /// Insert a new test result in PENDING status.
    pub async fn insert_test_result(&self, new: NewTestResult) -> AppResult<test_result::Model> {
        let now = Utc::now();

        let model = TestResultActiveModel {
            id: Set(Uuid::now_v7()),
            sample_id: Set(new.sample_id),
            test_type: Set(new.test_type.as_str().to_string()),
            raw_data: Set(new.raw_data),
            ai_analysis: Set(None),
            status: Set(TestStatus::Pending.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test result: {}", e)))
    }

    /// Get a single test result by ID.
    pub async fn get_test_result_by_id(&self, id: Uuid) -> AppResult<Option<test_result::Model>> {
        TestResult::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test result: {}", e)))
    }

    /// List test results, newest first, optionally for one sample.
    pub async fn list_test_results(
        &self,
        sample_id: Option<Uuid>,
        limit: Option<u64>,
    ) -> AppResult<Vec<test_result::Model>> {
        let mut select = TestResult::find();

        if let Some(sample_id) = sample_id {
            select = select.filter(test_result::Column::SampleId.eq(sample_id));
        }

        // UUIDv7 ids break ties between equal timestamps
        select = select
            .order_by_desc(test_result::Column::CreatedAt)
            .order_by_desc(test_result::Column::Id);

        if let Some(limit) = limit {
            select = select.limit(limit);
        }

        select
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test results: {}", e)))
    }

    /// Replace raw data and move the record to IN_PROGRESS.
    ///
    /// Clears any previous analysis. Returns None if the record does not exist.
    pub async fn update_test_result_raw_data(
        &self,
        id: Uuid,
        raw_data: JsonValue,
    ) -> AppResult<Option<test_result::Model>> {
        let Some(existing) = self.get_test_result_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: TestResultActiveModel = existing.into();
        active.raw_data = Set(raw_data);
        active.ai_analysis = Set(None);
        active.status = Set(TestStatus::InProgress.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let updated = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test result: {}", e)))?;

        Ok(Some(updated))
    }

    /// Record the outcome of an analysis attempt.
    ///
    /// `ai_analysis` is written together with the status so the two never
    /// disagree: a payload is only stored alongside COMPLETED.
    pub async fn record_analysis_outcome(
        &self,
        id: Uuid,
        status: TestStatus,
        ai_analysis: Option<JsonValue>,
    ) -> AppResult<test_result::Model> {
        let existing = self
            .get_test_result_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test result {}", id)))?;

        let ai_analysis = match status {
            TestStatus::Completed => ai_analysis,
            _ => None,
        };

        let mut active: TestResultActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        active.ai_analysis = Set(ai_analysis);
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to record analysis outcome: {}", e)))
    }

    /// Delete a test result. Returns false if it did not exist.
    pub async fn delete_test_result(&self, id: Uuid) -> AppResult<bool> {
        let result = TestResult::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test result: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// Count test results in each status.
    pub async fn count_test_results_by_status(&self) -> AppResult<StatusCounts> {
        let mut counts = StatusCounts::default();

        for status in [
            TestStatus::Pending,
            TestStatus::InProgress,
            TestStatus::Completed,
            TestStatus::Failed,
        ] {
            let n = TestResult::find()
                .filter(test_result::Column::Status.eq(status.as_str()))
                .count(self.connection())
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to count test results: {}", e))
                })?;

            match status {
                TestStatus::Pending => counts.pending = n,
                TestStatus::InProgress => counts.in_progress = n,
                TestStatus::Completed => counts.completed = n,
                TestStatus::Failed => counts.failed = n,
            }
        }

        Ok(counts)
    }
}
