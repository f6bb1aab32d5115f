//! Test result entity: one analysis cycle over a sample's raw data.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sample_id: Uuid,
    /// BLOOD_COUNT, BIOCHEMISTRY, URINALYSIS or MICROBIOLOGY
    pub test_type: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub raw_data: JsonValue,
    /// Present only while status is COMPLETED
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub ai_analysis: Option<JsonValue>,
    /// PENDING, IN_PROGRESS, COMPLETED or FAILED
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sample::Entity",
        from = "Column::SampleId",
        to = "super::sample::Column::Id",
        on_delete = "Cascade"
    )]
    Sample,
}

impl Related<super::sample::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sample.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
