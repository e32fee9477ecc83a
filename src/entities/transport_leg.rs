use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One carrier-operated leg of a shipment.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transport_legs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub shipment_id: i32,
    /// Vendor id of the carrier company
    pub carrier_company_id: i32,
    pub driver_name: Option<String>,
    /// Cold-chain temperature profile, e.g. "2-8°C"
    pub temperature_profile: Option<String>,
    pub route_description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shipment::Entity",
        from = "Column::ShipmentId",
        to = "super::shipment::Column::Id"
    )]
    Shipment,
    #[sea_orm(
        belongs_to = "super::carrier_company::Entity",
        from = "Column::CarrierCompanyId",
        to = "super::carrier_company::Column::VendorId"
    )]
    CarrierCompany,
}

impl Related<super::shipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipment.def()
    }
}

impl Related<super::carrier_company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarrierCompany.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
