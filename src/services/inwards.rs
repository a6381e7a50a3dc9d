use crate::entities::{inward, inward_item, item, vendor, vendor_payment};
use crate::errors::ServiceError;
use crate::handlers::common::ListQuery;
use crate::services::{line_items_total, LineItemInput};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Payment recorded together with the inward bill itself.
#[derive(Debug, Clone)]
pub struct OpeningPaymentInput {
    pub amount_paid: Decimal,
    pub paid_date: NaiveDate,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateInwardInput {
    pub vendor_id: Uuid,
    pub bill_no: String,
    pub challan_no: String,
    pub note: Option<String>,
    pub inward_date: NaiveDate,
    pub items: Vec<LineItemInput>,
    pub opening_payment: Option<OpeningPaymentInput>,
}

#[derive(Debug, Clone)]
pub struct UpdateInwardInput {
    pub vendor_id: Uuid,
    pub bill_no: String,
    pub challan_no: String,
    pub note: Option<String>,
    pub inward_date: NaiveDate,
    pub items: Vec<LineItemInput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InwardItemDto {
    #[serde(rename = "itemID")]
    pub item_id: Uuid,
    pub design_no: String,
    pub item_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub amount: Decimal,
}

/// A payment already recorded against the inward bill.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InwardPaymentDto {
    #[serde(rename = "paymentID")]
    pub payment_id: Uuid,
    pub amount_paid: Decimal,
    pub paid_date: NaiveDate,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InwardDto {
    #[serde(rename = "inwardID")]
    pub inward_id: Uuid,
    #[serde(rename = "vendorID")]
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub bill_no: String,
    pub challan_no: String,
    pub note: Option<String>,
    pub inward_date: NaiveDate,
    pub total_quantity: i64,
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub due_amount: Decimal,
    pub items: Vec<InwardItemDto>,
    pub payments: Vec<InwardPaymentDto>,
}

/// Entry for the vendor-payment form's bill selector. Carries the running
/// due amount so the form can cap the payment being entered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InwardOption {
    #[serde(rename = "inwardID")]
    pub inward_id: Uuid,
    pub bill_no: String,
    pub challan_no: String,
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub due_amount: Decimal,
}

#[derive(Clone)]
pub struct InwardService {
    db: Arc<DatabaseConnection>,
}

impl InwardService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn ensure_references_exist(
        &self,
        vendor_id: Uuid,
        items: &[LineItemInput],
    ) -> Result<(), ServiceError> {
        if items.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Inward bill requires at least one item".to_string(),
            ));
        }
        vendor::Entity::find_by_id(vendor_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::InvalidInput(format!("Unknown vendor {}", vendor_id)))?;

        let wanted: Vec<Uuid> = items.iter().map(|line| line.item_id).collect();
        let found = item::Entity::find()
            .filter(item::Column::Id.is_in(wanted.clone()))
            .count(&*self.db)
            .await?;
        let distinct: std::collections::HashSet<Uuid> = wanted.into_iter().collect();
        if found < distinct.len() as u64 {
            return Err(ServiceError::InvalidInput(
                "Inward bill references an unknown item".to_string(),
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(bill_no = %input.bill_no))]
    pub async fn create_inward(&self, input: CreateInwardInput) -> Result<Uuid, ServiceError> {
        self.ensure_references_exist(input.vendor_id, &input.items)
            .await?;

        let total = line_items_total(&input.items);
        if let Some(payment) = &input.opening_payment {
            if payment.amount_paid > total {
                return Err(ServiceError::InvalidInput(
                    "Opening payment exceeds the bill total".to_string(),
                ));
            }
        }

        let id = Uuid::new_v4();
        let txn = self.db.begin().await?;

        let header = inward::ActiveModel {
            id: Set(id),
            vendor_id: Set(input.vendor_id),
            bill_no: Set(input.bill_no),
            challan_no: Set(input.challan_no),
            note: Set(input.note),
            inward_date: Set(input.inward_date),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        header.insert(&txn).await?;

        let lines: Vec<inward_item::ActiveModel> = input
            .items
            .iter()
            .map(|line| inward_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                inward_id: Set(id),
                item_id: Set(line.item_id),
                quantity: Set(line.quantity),
                price: Set(line.price),
            })
            .collect();
        inward_item::Entity::insert_many(lines).exec(&txn).await?;

        if let Some(payment) = input.opening_payment {
            let record = vendor_payment::ActiveModel {
                id: Set(Uuid::new_v4()),
                inward_id: Set(id),
                amount_paid: Set(payment.amount_paid),
                paid_date: Set(payment.paid_date),
                remarks: Set(payment.remarks),
                created_at: Set(Utc::now()),
            };
            record.insert(&txn).await?;
        }

        txn.commit().await?;
        info!(inward_id = %id, total = %total, "inward bill created");
        Ok(id)
    }

    /// Replaces the header and the full line-item set. Payments already
    /// recorded against the bill are kept.
    #[instrument(skip(self, input))]
    pub async fn update_inward(&self, id: Uuid, input: UpdateInwardInput) -> Result<(), ServiceError> {
        self.ensure_references_exist(input.vendor_id, &input.items)
            .await?;

        let existing = inward::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inward bill {} not found", id)))?;

        // The new total may not drop below what was already paid out,
        // otherwise the due amount would go negative with no way back.
        let paid: Decimal = vendor_payment::Entity::find()
            .filter(vendor_payment::Column::InwardId.eq(id))
            .all(&*self.db)
            .await?
            .iter()
            .map(|row| row.amount_paid)
            .sum();
        if line_items_total(&input.items) < paid {
            return Err(ServiceError::InvalidInput(
                "Bill total cannot be less than the payments already recorded".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let mut header: inward::ActiveModel = existing.into();
        header.vendor_id = Set(input.vendor_id);
        header.bill_no = Set(input.bill_no);
        header.challan_no = Set(input.challan_no);
        header.note = Set(input.note);
        header.inward_date = Set(input.inward_date);
        header.updated_at = Set(Some(Utc::now()));
        header.update(&txn).await?;

        inward_item::Entity::delete_many()
            .filter(inward_item::Column::InwardId.eq(id))
            .exec(&txn)
            .await?;
        let lines: Vec<inward_item::ActiveModel> = input
            .items
            .iter()
            .map(|line| inward_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                inward_id: Set(id),
                item_id: Set(line.item_id),
                quantity: Set(line.quantity),
                price: Set(line.price),
            })
            .collect();
        inward_item::Entity::insert_many(lines).exec(&txn).await?;

        txn.commit().await?;
        info!(inward_id = %id, "inward bill updated");
        Ok(())
    }

    async fn payments_by_inward(
        &self,
        inward_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<InwardPaymentDto>>, ServiceError> {
        let rows = vendor_payment::Entity::find()
            .filter(vendor_payment::Column::InwardId.is_in(inward_ids.to_vec()))
            .all(&*self.db)
            .await?;
        let mut payments: HashMap<Uuid, Vec<InwardPaymentDto>> = HashMap::new();
        for row in rows {
            payments.entry(row.inward_id).or_default().push(InwardPaymentDto {
                payment_id: row.id,
                amount_paid: row.amount_paid,
                paid_date: row.paid_date,
                remarks: row.remarks,
            });
        }
        Ok(payments)
    }

    async fn lines_by_inward(
        &self,
        inward_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<InwardItemDto>>, ServiceError> {
        let rows = inward_item::Entity::find()
            .filter(inward_item::Column::InwardId.is_in(inward_ids.to_vec()))
            .find_also_related(item::Entity)
            .all(&*self.db)
            .await?;
        let mut lines: HashMap<Uuid, Vec<InwardItemDto>> = HashMap::new();
        for (line, item) in rows {
            let (design_no, item_name) = item
                .map(|i| (i.design_no, i.item_name))
                .unwrap_or_default();
            lines.entry(line.inward_id).or_default().push(InwardItemDto {
                item_id: line.item_id,
                design_no,
                item_name,
                quantity: line.quantity,
                price: line.price,
                amount: Decimal::from(line.quantity) * line.price,
            });
        }
        Ok(lines)
    }

    fn assemble_dto(
        model: inward::Model,
        vendor_name: String,
        items: Vec<InwardItemDto>,
        payments: Vec<InwardPaymentDto>,
    ) -> InwardDto {
        let total_quantity: i64 = items.iter().map(|line| i64::from(line.quantity)).sum();
        let total_amount: Decimal = items.iter().map(|line| line.amount).sum();
        let amount_paid: Decimal = payments.iter().map(|p| p.amount_paid).sum();
        InwardDto {
            inward_id: model.id,
            vendor_id: model.vendor_id,
            vendor_name,
            bill_no: model.bill_no,
            challan_no: model.challan_no,
            note: model.note,
            inward_date: model.inward_date,
            total_quantity,
            total_amount,
            amount_paid,
            due_amount: total_amount - amount_paid,
            items,
            payments,
        }
    }

    pub async fn list_inwards(
        &self,
        query: &ListQuery,
    ) -> Result<(Vec<InwardDto>, u64), ServiceError> {
        let mut finder = inward::Entity::find();
        if !query.search_filter.trim().is_empty() {
            let needle = query.search_filter.trim();
            finder = finder.filter(
                Condition::any()
                    .add(inward::Column::BillNo.contains(needle))
                    .add(inward::Column::ChallanNo.contains(needle)),
            );
        }

        let total_count = finder.clone().count(&*self.db).await?;
        let rows = finder
            .find_also_related(vendor::Entity)
            .order_by_desc(inward::Column::InwardDate)
            .offset(query.offset())
            .limit(query.limit())
            .all(&*self.db)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|(model, _)| model.id).collect();
        let mut lines = self.lines_by_inward(&ids).await?;
        let mut paid = self.payments_by_inward(&ids).await?;

        let dtos = rows
            .into_iter()
            .map(|(model, vendor)| {
                let id = model.id;
                Self::assemble_dto(
                    model,
                    vendor.map(|v| v.vendor_name).unwrap_or_default(),
                    lines.remove(&id).unwrap_or_default(),
                    paid.remove(&id).unwrap_or_default(),
                )
            })
            .collect();
        Ok((dtos, total_count))
    }

    pub async fn get_inward(&self, id: Uuid) -> Result<InwardDto, ServiceError> {
        let (model, vendor) = inward::Entity::find_by_id(id)
            .find_also_related(vendor::Entity)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inward bill {} not found", id)))?;

        let mut lines = self.lines_by_inward(&[id]).await?;
        let mut paid = self.payments_by_inward(&[id]).await?;
        Ok(Self::assemble_dto(
            model,
            vendor.map(|v| v.vendor_name).unwrap_or_default(),
            lines.remove(&id).unwrap_or_default(),
            paid.remove(&id).unwrap_or_default(),
        ))
    }

    /// Bills for one vendor with running paid/due figures, for the payment
    /// form selector. Fully settled bills are skipped.
    pub async fn inward_options(&self, vendor_id: Uuid) -> Result<Vec<InwardOption>, ServiceError> {
        let rows = inward::Entity::find()
            .filter(inward::Column::VendorId.eq(vendor_id))
            .order_by_desc(inward::Column::InwardDate)
            .all(&*self.db)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|model| model.id).collect();
        let lines = self.lines_by_inward(&ids).await?;
        let paid = self.payments_by_inward(&ids).await?;

        let options = rows
            .into_iter()
            .filter_map(|model| {
                let total: Decimal = lines
                    .get(&model.id)
                    .map(|items| items.iter().map(|line| line.amount).sum())
                    .unwrap_or(Decimal::ZERO);
                let amount_paid: Decimal = paid
                    .get(&model.id)
                    .map(|rows| rows.iter().map(|p| p.amount_paid).sum())
                    .unwrap_or(Decimal::ZERO);
                let due_amount = total - amount_paid;
                if due_amount <= Decimal::ZERO {
                    return None;
                }
                Some(InwardOption {
                    inward_id: model.id,
                    bill_no: model.bill_no,
                    challan_no: model.challan_no,
                    total_amount: total,
                    amount_paid,
                    due_amount,
                })
            })
            .collect();
        Ok(options)
    }

    /// Deletes the bill together with its line items and payments.
    #[instrument(skip(self))]
    pub async fn delete_inward(&self, id: Uuid) -> Result<(), ServiceError> {
        inward::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inward bill {} not found", id)))?;

        let txn = self.db.begin().await?;
        vendor_payment::Entity::delete_many()
            .filter(vendor_payment::Column::InwardId.eq(id))
            .exec(&txn)
            .await?;
        inward_item::Entity::delete_many()
            .filter(inward_item::Column::InwardId.eq(id))
            .exec(&txn)
            .await?;
        inward::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        info!(inward_id = %id, "inward bill deleted");
        Ok(())
    }
}
