use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warehouses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    /// Storage condition, e.g. "cold 2-4°C"
    pub store_condition: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::storage_assignment::Entity")]
    StorageAssignments,
}

impl Related<super::storage_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StorageAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
