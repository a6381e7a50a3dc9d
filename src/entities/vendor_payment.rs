use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment made to a vendor against an inward purchase bill.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub inward_id: Uuid,
    pub amount_paid: Decimal,
    pub paid_date: Date,
    pub remarks: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inward::Entity",
        from = "Column::InwardId",
        to = "super::inward::Column::Id"
    )]
    Inward,
}

impl Related<super::inward::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inward.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
