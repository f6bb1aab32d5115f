//! Database queries for the sample registry.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::sample::{self, ActiveModel as SampleActiveModel, Entity as Sample};
use crate::entity::test_result::{self, Entity as TestResult};
use crate::entity::user::{self, Entity as User};
use crate::error::{AppError, AppResult};
use crate::models::sample::{SampleResponse, SampleStatus, SampleSummary};
use crate::models::user::UserSummary;

use super::{DbPool, insert_error};

/// Represents a sample to be inserted.
pub struct NewSample {
    pub barcode: String,
    pub patient_name: String,
    pub patient_id: String,
    pub created_by: Uuid,
}

impl DbPool {
    /// Insert a new sample in REGISTERED status.
    pub async fn insert_sample(&self, new: NewSample) -> AppResult<sample::Model> {
        let now = Utc::now();

        let barcode = new.barcode.clone();
        let model = SampleActiveModel {
            id: Set(Uuid::now_v7()),
            barcode: Set(new.barcode),
            patient_name: Set(new.patient_name),
            patient_id: Set(new.patient_id),
            status: Set(SampleStatus::Registered.as_str().to_string()),
            created_by: Set(new.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(self.connection()).await.map_err(|e| {
            insert_error(
                e,
                || format!("Sample with barcode {} already exists", barcode),
                "Failed to insert sample",
            )
        })
    }

    /// Get a single sample by ID.
    pub async fn get_sample_by_id(&self, id: Uuid) -> AppResult<Option<sample::Model>> {
        Sample::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get sample: {}", e)))
    }

    /// Get a sample by barcode.
    pub async fn get_sample_by_barcode(&self, barcode: &str) -> AppResult<Option<sample::Model>> {
        Sample::find()
            .filter(sample::Column::Barcode.eq(barcode))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get sample by barcode: {}", e)))
    }

    /// List samples, newest first.
    pub async fn list_samples(&self, limit: Option<u64>) -> AppResult<Vec<sample::Model>> {
        let mut select = Sample::find()
            .order_by_desc(sample::Column::CreatedAt)
            .order_by_desc(sample::Column::Id);

        if let Some(limit) = limit {
            select = select.limit(limit);
        }

        select
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list samples: {}", e)))
    }

    /// Set the status of a sample. Returns None if it does not exist.
    pub async fn update_sample_status(
        &self,
        id: Uuid,
        status: SampleStatus,
    ) -> AppResult<Option<sample::Model>> {
        let Some(existing) = self.get_sample_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: SampleActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let updated = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update sample status: {}", e)))?;

        Ok(Some(updated))
    }

    /// Delete a sample (test results cascade). Returns false if it did not exist.
    pub async fn delete_sample(&self, id: Uuid) -> AppResult<bool> {
        let result = Sample::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete sample: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// Count all samples.
    pub async fn count_samples(&self) -> AppResult<u64> {
        Sample::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count samples: {}", e)))
    }

    /// Attach creators and test results to a batch of samples.
    ///
    /// Runs one query for users and one for test results regardless of batch size.
    pub async fn load_sample_responses(
        &self,
        samples: Vec<sample::Model>,
    ) -> AppResult<Vec<SampleResponse>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let sample_ids: Vec<Uuid> = samples.iter().map(|s| s.id).collect();
        let creator_ids: Vec<Uuid> = samples
            .iter()
            .map(|s| s.created_by)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        let creators: HashMap<Uuid, UserSummary> = User::find()
            .filter(user::Column::Id.is_in(creator_ids))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch sample creators: {}", e)))?
            .into_iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        let results = TestResult::find()
            .filter(test_result::Column::SampleId.is_in(sample_ids))
            .order_by_desc(test_result::Column::CreatedAt)
            .order_by_desc(test_result::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch test results: {}", e)))?;

        let mut results_by_sample: HashMap<Uuid, Vec<crate::models::TestResult>> = HashMap::new();
        for result in results {
            let sample_id = result.sample_id;
            results_by_sample
                .entry(sample_id)
                .or_default()
                .push(crate::models::TestResult::try_from(result)?);
        }

        samples
            .into_iter()
            .map(|s| {
                let created_by = creators.get(&s.created_by).cloned();
                let test_results = results_by_sample.remove(&s.id).unwrap_or_default();
                Ok(SampleResponse {
                    sample: SampleSummary::from_model(s, created_by)?,
                    test_results,
                })
            })
            .collect()
    }

    /// Load the summary view (sample + creator) of a single sample.
    pub async fn get_sample_summary(&self, id: Uuid) -> AppResult<Option<SampleSummary>> {
        let Some(sample) = self.get_sample_by_id(id).await? else {
            return Ok(None);
        };

        let creator = User::find_by_id(sample.created_by)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch sample creator: {}", e)))?
            .map(UserSummary::from);

        SampleSummary::from_model(sample, creator).map(Some)
    }
}
