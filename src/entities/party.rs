use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer master record. GST/PAN/Aadhaar formats are enforced at the
/// request layer, not here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub party_name: String,
    pub mobile_no: String,
    pub gst_number: String,
    pub pan_number: String,
    pub aadhar_number: String,
    pub state_id: i32,
    pub city_id: i32,
    pub address: String,
    pub document_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bill::Entity")]
    Bill,
}

impl Related<super::bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bill.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
