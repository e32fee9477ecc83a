use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shipment entity. Every shipment is handled by exactly one distributor.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shipments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Vendor id of the distributor
    pub distributor_id: i32,
    /// Free-form status, e.g. "in_transit", "delivered"
    pub status: String,
    pub destination: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::distributor::Entity",
        from = "Column::DistributorId",
        to = "super::distributor::Column::VendorId"
    )]
    Distributor,
    #[sea_orm(has_many = "super::transport_leg::Entity")]
    TransportLegs,
    #[sea_orm(has_many = "super::shipment_batch::Entity")]
    Batches,
}

impl Related<super::distributor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Distributor.def()
    }
}

impl Related<super::transport_leg::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransportLegs.def()
    }
}

impl Related<super::shipment_batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
