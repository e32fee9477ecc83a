use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Carrier company, a vendor specialisation keyed by the vendor id.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carrier_companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub vendor_id: i32,
    pub license_number: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id"
    )]
    Vendor,
    #[sea_orm(has_many = "super::transport_leg::Entity")]
    TransportLegs,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::transport_leg::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransportLegs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
