use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier master record.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vendor_name: String,
    pub gst_number: String,
    pub mobile_no: String,
    pub address: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::item::Entity")]
    Item,
    #[sea_orm(has_many = "super::inward::Entity")]
    Inward,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<super::inward::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inward.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
