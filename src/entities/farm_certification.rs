use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Certification label held by a farm (e.g. "VietGAP"). Unique per farm.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "farm_certifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub farm_id: i32,
    pub certification: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farm::Entity",
        from = "Column::FarmId",
        to = "super::farm::Column::Id"
    )]
    Farm,
}

impl Related<super::farm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farm.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
