use crate::entities::{bill_item, inward_item, item, vendor};
use crate::errors::ServiceError;
use crate::handlers::common::ListQuery;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateItemInput {
    pub design_no: String,
    pub item_name: String,
    pub vendor_id: Uuid,
    pub item_photo: Option<String>,
    pub manufacturing_cost: Decimal,
    pub selling_price: Decimal,
    pub is_active: bool,
}

pub type UpdateItemInput = CreateItemInput;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    #[serde(rename = "itemID")]
    pub item_id: Uuid,
    pub design_no: String,
    pub item_name: String,
    #[serde(rename = "vendorID")]
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub item_photo: Option<String>,
    pub manufacturing_cost: Decimal,
    pub selling_price: Decimal,
    pub is_active: bool,
    pub created_at: chrono::DateTime<Utc>,
}

/// Dropdown entry for the inward/bill forms, carrying the two prices the
/// form prefills.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOption {
    #[serde(rename = "itemID")]
    pub item_id: Uuid,
    pub design_no: String,
    pub item_name: String,
    pub manufacturing_cost: Decimal,
    pub selling_price: Decimal,
}

#[derive(Clone)]
pub struct ItemService {
    db: Arc<DatabaseConnection>,
}

impl ItemService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn ensure_vendor_exists(&self, vendor_id: Uuid) -> Result<(), ServiceError> {
        vendor::Entity::find_by_id(vendor_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::InvalidInput(format!("Unknown vendor {}", vendor_id)))?;
        Ok(())
    }

    #[instrument(skip(self, input), fields(design_no = %input.design_no))]
    pub async fn create_item(&self, input: CreateItemInput) -> Result<Uuid, ServiceError> {
        self.ensure_vendor_exists(input.vendor_id).await?;

        let id = Uuid::new_v4();
        let model = item::ActiveModel {
            id: Set(id),
            design_no: Set(input.design_no),
            item_name: Set(input.item_name),
            vendor_id: Set(input.vendor_id),
            item_photo: Set(input.item_photo),
            manufacturing_cost: Set(input.manufacturing_cost),
            selling_price: Set(input.selling_price),
            is_active: Set(input.is_active),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        model.insert(&*self.db).await?;
        info!(item_id = %id, "item created");
        Ok(id)
    }

    #[instrument(skip(self, input))]
    pub async fn update_item(&self, id: Uuid, input: UpdateItemInput) -> Result<(), ServiceError> {
        self.ensure_vendor_exists(input.vendor_id).await?;

        let existing = item::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", id)))?;

        let mut model: item::ActiveModel = existing.into();
        model.design_no = Set(input.design_no);
        model.item_name = Set(input.item_name);
        model.vendor_id = Set(input.vendor_id);
        model.item_photo = Set(input.item_photo);
        model.manufacturing_cost = Set(input.manufacturing_cost);
        model.selling_price = Set(input.selling_price);
        model.is_active = Set(input.is_active);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&*self.db).await?;
        info!(item_id = %id, "item updated");
        Ok(())
    }

    /// Paginated listing joined with the owning vendor's name. Search covers
    /// design number and item name.
    pub async fn list_items(&self, query: &ListQuery) -> Result<(Vec<ItemDto>, u64), ServiceError> {
        let mut finder = item::Entity::find();
        if !query.search_filter.trim().is_empty() {
            let needle = query.search_filter.trim();
            finder = finder.filter(
                Condition::any()
                    .add(item::Column::DesignNo.contains(needle))
                    .add(item::Column::ItemName.contains(needle)),
            );
        }

        let total_count = finder.clone().count(&*self.db).await?;
        let rows = finder
            .find_also_related(vendor::Entity)
            .order_by_asc(item::Column::DesignNo)
            .offset(query.offset())
            .limit(query.limit())
            .all(&*self.db)
            .await?;

        let dtos = rows
            .into_iter()
            .map(|(model, vendor)| ItemDto {
                item_id: model.id,
                design_no: model.design_no,
                item_name: model.item_name,
                vendor_id: model.vendor_id,
                vendor_name: vendor.map(|v| v.vendor_name).unwrap_or_default(),
                item_photo: model.item_photo,
                manufacturing_cost: model.manufacturing_cost,
                selling_price: model.selling_price,
                is_active: model.is_active,
                created_at: model.created_at,
            })
            .collect();
        Ok((dtos, total_count))
    }

    /// Active items for a vendor, used when composing an inward bill.
    pub async fn items_for_vendor(
        &self,
        vendor_id: Uuid,
    ) -> Result<Vec<ItemOption>, ServiceError> {
        let rows = item::Entity::find()
            .filter(item::Column::VendorId.eq(vendor_id))
            .filter(item::Column::IsActive.eq(true))
            .order_by_asc(item::Column::DesignNo)
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|model| ItemOption {
                item_id: model.id,
                design_no: model.design_no,
                item_name: model.item_name,
                manufacturing_cost: model.manufacturing_cost,
                selling_price: model.selling_price,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: Uuid) -> Result<(), ServiceError> {
        let inward_refs = inward_item::Entity::find()
            .filter(inward_item::Column::ItemId.eq(id))
            .count(&*self.db)
            .await?;
        let bill_refs = bill_item::Entity::find()
            .filter(bill_item::Column::ItemId.eq(id))
            .count(&*self.db)
            .await?;
        if inward_refs > 0 || bill_refs > 0 {
            return Err(ServiceError::Conflict(
                "Item appears on inward or outward bills and cannot be deleted".to_string(),
            ));
        }

        let result = item::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Item {} not found", id)));
        }
        info!(item_id = %id, "item deleted");
        Ok(())
    }
}
