use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Outward sales bill header issued to a party. `is_paid` flips once
/// cumulative receipts cover the bill total.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub party_id: Uuid,
    pub bill_no: String,
    pub gst_type_id: i32,
    pub bill_date: Date,
    pub is_paid: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::party::Entity",
        from = "Column::PartyId",
        to = "super::party::Column::Id"
    )]
    Party,
    #[sea_orm(has_many = "super::bill_item::Entity")]
    BillItem,
    #[sea_orm(has_many = "super::bill_payment::Entity")]
    BillPayment,
}

impl Related<super::party::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Party.def()
    }
}

impl Related<super::bill_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillItem.def()
    }
}

impl Related<super::bill_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillPayment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
