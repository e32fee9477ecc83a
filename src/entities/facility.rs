use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Processing facility
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facilities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    /// Food-safety operating license
    pub license_number: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::processing::Entity")]
    Processing,
}

impl Related<super::processing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Processing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
