use crate::entities::{inward, item, vendor};
use crate::errors::ServiceError;
use crate::handlers::common::ListQuery;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateVendorInput {
    pub vendor_name: String,
    pub gst_number: String,
    pub mobile_no: String,
    pub address: String,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct UpdateVendorInput {
    pub vendor_name: String,
    pub gst_number: String,
    pub mobile_no: String,
    pub address: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDto {
    #[serde(rename = "vendorID")]
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub gst_number: String,
    pub mobile_no: String,
    pub address: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<Utc>,
}

/// Entry used to populate vendor selectors on dependent forms.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorOption {
    #[serde(rename = "vendorID")]
    pub vendor_id: Uuid,
    pub vendor_name: String,
}

impl From<vendor::Model> for VendorDto {
    fn from(model: vendor::Model) -> Self {
        Self {
            vendor_id: model.id,
            vendor_name: model.vendor_name,
            gst_number: model.gst_number,
            mobile_no: model.mobile_no,
            address: model.address,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone)]
pub struct VendorService {
    db: Arc<DatabaseConnection>,
}

impl VendorService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(vendor_name = %input.vendor_name))]
    pub async fn create_vendor(&self, input: CreateVendorInput) -> Result<Uuid, ServiceError> {
        let id = Uuid::new_v4();
        let model = vendor::ActiveModel {
            id: Set(id),
            vendor_name: Set(input.vendor_name),
            gst_number: Set(input.gst_number),
            mobile_no: Set(input.mobile_no),
            address: Set(input.address),
            is_active: Set(input.is_active),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        model.insert(&*self.db).await?;
        info!(vendor_id = %id, "vendor created");
        Ok(id)
    }

    #[instrument(skip(self, input))]
    pub async fn update_vendor(
        &self,
        id: Uuid,
        input: UpdateVendorInput,
    ) -> Result<(), ServiceError> {
        let existing = vendor::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", id)))?;

        let mut model: vendor::ActiveModel = existing.into();
        model.vendor_name = Set(input.vendor_name);
        model.gst_number = Set(input.gst_number);
        model.mobile_no = Set(input.mobile_no);
        model.address = Set(input.address);
        model.is_active = Set(input.is_active);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&*self.db).await?;
        info!(vendor_id = %id, "vendor updated");
        Ok(())
    }

    /// Paginated listing with an optional case-insensitive search over name,
    /// GST number and mobile number.
    pub async fn list_vendors(
        &self,
        query: &ListQuery,
    ) -> Result<(Vec<VendorDto>, u64), ServiceError> {
        let mut finder = vendor::Entity::find();
        if !query.search_filter.trim().is_empty() {
            let needle = query.search_filter.trim();
            finder = finder.filter(
                Condition::any()
                    .add(vendor::Column::VendorName.contains(needle))
                    .add(vendor::Column::GstNumber.contains(needle))
                    .add(vendor::Column::MobileNo.contains(needle)),
            );
        }

        let total_count = finder.clone().count(&*self.db).await?;
        let rows = finder
            .order_by_asc(vendor::Column::VendorName)
            .offset(query.offset())
            .limit(query.limit())
            .all(&*self.db)
            .await?;

        Ok((rows.into_iter().map(VendorDto::from).collect(), total_count))
    }

    /// All active vendors, for dropdowns on the item and inward forms.
    pub async fn vendor_options(&self) -> Result<Vec<VendorOption>, ServiceError> {
        let rows = vendor::Entity::find()
            .filter(vendor::Column::IsActive.eq(true))
            .order_by_asc(vendor::Column::VendorName)
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|model| VendorOption {
                vendor_id: model.id,
                vendor_name: model.vendor_name,
            })
            .collect())
    }

    pub async fn get_vendor(&self, id: Uuid) -> Result<VendorDto, ServiceError> {
        let model = vendor::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", id)))?;
        Ok(model.into())
    }

    /// Deletes a vendor. Refused while items or inward bills still reference
    /// it, so dependent records never dangle.
    #[instrument(skip(self))]
    pub async fn delete_vendor(&self, id: Uuid) -> Result<(), ServiceError> {
        let item_refs = item::Entity::find()
            .filter(item::Column::VendorId.eq(id))
            .count(&*self.db)
            .await?;
        let inward_refs = inward::Entity::find()
            .filter(inward::Column::VendorId.eq(id))
            .count(&*self.db)
            .await?;
        if item_refs > 0 || inward_refs > 0 {
            return Err(ServiceError::Conflict(
                "Vendor has items or inward bills and cannot be deleted".to_string(),
            ));
        }

        let result = vendor::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Vendor {} not found", id)));
        }
        info!(vendor_id = %id, "vendor deleted");
        Ok(())
    }
}
