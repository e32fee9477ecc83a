use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vendor entity. Distributors and carrier companies share its id.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub contact_info: Option<String>,
    pub address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vendor_retail::Entity")]
    RetailFormats,
}

impl Related<super::vendor_retail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RetailFormats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
