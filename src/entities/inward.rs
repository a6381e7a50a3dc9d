use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase bill header. Line items live in `inward_item`, payments against
/// the bill in `vendor_payment`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inwards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub bill_no: String,
    pub challan_no: String,
    pub note: Option<String>,
    pub inward_date: Date,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id"
    )]
    Vendor,
    #[sea_orm(has_many = "super::inward_item::Entity")]
    InwardItem,
    #[sea_orm(has_many = "super::vendor_payment::Entity")]
    VendorPayment,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::inward_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InwardItem.def()
    }
}

impl Related<super::vendor_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorPayment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
