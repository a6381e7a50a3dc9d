use crate::entities::{
    bill, bill_item, bill_payment, inward, inward_item, item, vendor, vendor_payment,
};
use crate::errors::ServiceError;
use crate::handlers::common::ListQuery;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateBillPaymentInput {
    pub bill_id: Uuid,
    pub party_id: Uuid,
    pub amount_received: Decimal,
    pub received_date: NaiveDate,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateVendorPaymentInput {
    pub inward_id: Uuid,
    pub amount_paid: Decimal,
    pub paid_date: NaiveDate,
    pub remarks: Option<String>,
}

/// Line detail of the inward bill a payment belongs to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInwardLine {
    pub design_no: String,
    pub item_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorPaymentDto {
    #[serde(rename = "paymentID")]
    pub payment_id: Uuid,
    #[serde(rename = "inwardID")]
    pub inward_id: Uuid,
    #[serde(rename = "vendorID")]
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub bill_no: String,
    pub challan_no: String,
    pub amount_paid: Decimal,
    pub paid_date: NaiveDate,
    pub remarks: Option<String>,
    pub total_purchase_amount: Decimal,
    pub due_amount: Decimal,
    pub items: Vec<PaymentInwardLine>,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Clone)]
pub struct PaymentService {
    db: Arc<DatabaseConnection>,
}

impl PaymentService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn bill_total(&self, bill_id: Uuid) -> Result<Decimal, ServiceError> {
        let lines = bill_item::Entity::find()
            .filter(bill_item::Column::BillId.eq(bill_id))
            .all(&*self.db)
            .await?;
        Ok(lines
            .iter()
            .map(|line| Decimal::from(line.quantity) * line.price)
            .sum())
    }

    async fn inward_total(&self, inward_id: Uuid) -> Result<Decimal, ServiceError> {
        let lines = inward_item::Entity::find()
            .filter(inward_item::Column::InwardId.eq(inward_id))
            .all(&*self.db)
            .await?;
        Ok(lines
            .iter()
            .map(|line| Decimal::from(line.quantity) * line.price)
            .sum())
    }

    /// Records a receipt against an outward bill and marks the bill paid once
    /// receipts cover its total.
    #[instrument(skip(self, input), fields(bill_id = %input.bill_id))]
    pub async fn add_bill_payment(
        &self,
        input: CreateBillPaymentInput,
    ) -> Result<Uuid, ServiceError> {
        let target = bill::Entity::find_by_id(input.bill_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bill {} not found", input.bill_id)))?;
        if target.party_id != input.party_id {
            return Err(ServiceError::InvalidInput(
                "Receipt party does not match the bill's party".to_string(),
            ));
        }

        let total = self.bill_total(input.bill_id).await?;
        let received: Decimal = bill_payment::Entity::find()
            .filter(bill_payment::Column::BillId.eq(input.bill_id))
            .all(&*self.db)
            .await?
            .iter()
            .map(|row| row.amount_received)
            .sum();
        let due = total - received;
        if input.amount_received > due {
            return Err(ServiceError::InvalidInput(format!(
                "Receipt of {} exceeds the due amount of {}",
                input.amount_received, due
            )));
        }

        let id = Uuid::new_v4();
        let txn = self.db.begin().await?;

        let record = bill_payment::ActiveModel {
            id: Set(id),
            bill_id: Set(input.bill_id),
            party_id: Set(input.party_id),
            amount_received: Set(input.amount_received),
            received_date: Set(input.received_date),
            remarks: Set(input.remarks),
            created_at: Set(Utc::now()),
        };
        record.insert(&txn).await?;

        if received + input.amount_received >= total {
            let mut header: bill::ActiveModel = target.into();
            header.is_paid = Set(true);
            header.updated_at = Set(Some(Utc::now()));
            header.update(&txn).await?;
        }

        txn.commit().await?;
        info!(payment_id = %id, "bill payment recorded");
        Ok(id)
    }

    /// Records a payment against a vendor's inward bill.
    #[instrument(skip(self, input), fields(inward_id = %input.inward_id))]
    pub async fn add_vendor_payment(
        &self,
        input: CreateVendorPaymentInput,
    ) -> Result<Uuid, ServiceError> {
        inward::Entity::find_by_id(input.inward_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inward bill {} not found", input.inward_id))
            })?;

        let total = self.inward_total(input.inward_id).await?;
        let paid: Decimal = vendor_payment::Entity::find()
            .filter(vendor_payment::Column::InwardId.eq(input.inward_id))
            .all(&*self.db)
            .await?
            .iter()
            .map(|row| row.amount_paid)
            .sum();
        let due = total - paid;
        if input.amount_paid > due {
            return Err(ServiceError::InvalidInput(format!(
                "Payment of {} exceeds the due amount of {}",
                input.amount_paid, due
            )));
        }

        let id = Uuid::new_v4();
        let record = vendor_payment::ActiveModel {
            id: Set(id),
            inward_id: Set(input.inward_id),
            amount_paid: Set(input.amount_paid),
            paid_date: Set(input.paid_date),
            remarks: Set(input.remarks),
            created_at: Set(Utc::now()),
        };
        record.insert(&*self.db).await?;
        info!(payment_id = %id, "vendor payment recorded");
        Ok(id)
    }

    /// Paginated vendor payment history with vendor and bill context. Search
    /// covers the inward bill number.
    pub async fn list_vendor_payments(
        &self,
        query: &ListQuery,
    ) -> Result<(Vec<VendorPaymentDto>, u64), ServiceError> {
        let mut finder = vendor_payment::Entity::find();
        if !query.search_filter.trim().is_empty() {
            let needle = query.search_filter.trim();
            let matching: Vec<Uuid> = inward::Entity::find()
                .filter(inward::Column::BillNo.contains(needle))
                .all(&*self.db)
                .await?
                .into_iter()
                .map(|model| model.id)
                .collect();
            finder = finder.filter(vendor_payment::Column::InwardId.is_in(matching));
        }

        let total_count = finder.clone().count(&*self.db).await?;
        let rows = finder
            .order_by_desc(vendor_payment::Column::PaidDate)
            .offset(query.offset())
            .limit(query.limit())
            .all(&*self.db)
            .await?;

        let inward_ids: Vec<Uuid> = rows.iter().map(|row| row.inward_id).collect();
        let inwards: HashMap<Uuid, inward::Model> = inward::Entity::find()
            .filter(inward::Column::Id.is_in(inward_ids.clone()))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();
        let vendor_ids: Vec<Uuid> = inwards.values().map(|model| model.vendor_id).collect();
        let vendors: HashMap<Uuid, String> = vendor::Entity::find()
            .filter(vendor::Column::Id.is_in(vendor_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.vendor_name))
            .collect();

        let mut lines: HashMap<Uuid, Vec<PaymentInwardLine>> = HashMap::new();
        for (line, catalog) in inward_item::Entity::find()
            .filter(inward_item::Column::InwardId.is_in(inward_ids.clone()))
            .find_also_related(item::Entity)
            .all(&*self.db)
            .await?
        {
            let (design_no, item_name) = catalog
                .map(|i| (i.design_no, i.item_name))
                .unwrap_or_default();
            lines.entry(line.inward_id).or_default().push(PaymentInwardLine {
                design_no,
                item_name,
                quantity: line.quantity,
                price: line.price,
            });
        }
        let mut paid_totals: HashMap<Uuid, Decimal> = HashMap::new();
        for payment in vendor_payment::Entity::find()
            .filter(vendor_payment::Column::InwardId.is_in(inward_ids))
            .all(&*self.db)
            .await?
        {
            *paid_totals
                .entry(payment.inward_id)
                .or_insert(Decimal::ZERO) += payment.amount_paid;
        }

        let dtos = rows
            .into_iter()
            .map(|row| {
                let parent = inwards.get(&row.inward_id);
                let vendor_id = parent.map(|i| i.vendor_id).unwrap_or(Uuid::nil());
                let items = lines.get(&row.inward_id).cloned().unwrap_or_default();
                let total_purchase_amount: Decimal = items
                    .iter()
                    .map(|line| Decimal::from(line.quantity) * line.price)
                    .sum();
                let paid = paid_totals
                    .get(&row.inward_id)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                VendorPaymentDto {
                    payment_id: row.id,
                    inward_id: row.inward_id,
                    vendor_id,
                    vendor_name: vendors.get(&vendor_id).cloned().unwrap_or_default(),
                    bill_no: parent.map(|i| i.bill_no.clone()).unwrap_or_default(),
                    challan_no: parent.map(|i| i.challan_no.clone()).unwrap_or_default(),
                    amount_paid: row.amount_paid,
                    paid_date: row.paid_date,
                    remarks: row.remarks,
                    total_purchase_amount,
                    due_amount: total_purchase_amount - paid,
                    items,
                    created_at: row.created_at,
                }
            })
            .collect();
        Ok((dtos, total_count))
    }

    #[instrument(skip(self))]
    pub async fn delete_vendor_payment(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = vendor_payment::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Vendor payment {} not found",
                id
            )));
        }
        info!(payment_id = %id, "vendor payment deleted");
        Ok(())
    }
}
