use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Batch entity, the root unit of traceability.
///
/// `code` is the value printed on the physical QR label and is unique per batch.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Scanned identifier
    #[sea_orm(unique)]
    pub code: String,

    pub product_id: i32,
    pub farm_id: i32,

    pub harvest_date: NaiveDate,

    /// Quality grade assigned at harvest
    pub grade: Option<String>,

    /// Seed lot the batch was grown from
    pub seed_batch: Option<String>,

    pub created_by: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::farm::Entity",
        from = "Column::FarmId",
        to = "super::farm::Column::Id"
    )]
    Farm,
    #[sea_orm(has_many = "super::processing::Entity")]
    Processing,
    #[sea_orm(has_many = "super::storage_assignment::Entity")]
    StorageAssignments,
    #[sea_orm(has_many = "super::shipment_batch::Entity")]
    ShipmentMemberships,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::farm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farm.def()
    }
}

impl Related<super::processing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Processing.def()
    }
}

impl Related<super::storage_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StorageAssignments.def()
    }
}

impl Related<super::shipment_batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShipmentMemberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
