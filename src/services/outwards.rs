use crate::entities::{bill, bill_item, bill_payment, item, party};
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

#[derive(Debug, Clone)]
pub struct CreateBillInput {
    pub party_id: Uuid,
    pub bill_no: String,
    pub gst_type_id: i32,
    pub bill_date: NaiveDate,
    pub is_paid: bool,
    pub items: Vec<LineItemInput>,
}

pub type UpdateBillInput = CreateBillInput;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItemDto {
    #[serde(rename = "itemID")]
    pub item_id: Uuid,
    pub design_no: String,
    pub item_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDto {
    #[serde(rename = "billID")]
    pub bill_id: Uuid,
    #[serde(rename = "partyID")]
    pub party_id: Uuid,
    pub party_name: String,
    pub bill_no: String,
    #[serde(rename = "gstTypeID")]
    pub gst_type_id: i32,
    pub bill_date: NaiveDate,
    pub total_quantity: i64,
    pub total_amount: Decimal,
    pub amount_received: Decimal,
    pub due_amount: Decimal,
    pub is_paid: bool,
    pub items: Vec<BillItemDto>,
}

#[derive(Clone)]
pub struct OutwardService {
    db: Arc<DatabaseConnection>,
}

impl OutwardService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn ensure_references_exist(
        &self,
        party_id: Uuid,
        items: &[LineItemInput],
    ) -> Result<(), ServiceError> {
        if items.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Bill requires at least one item".to_string(),
            ));
        }
        party::Entity::find_by_id(party_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::InvalidInput(format!("Unknown party {}", party_id)))?;

        let wanted: Vec<Uuid> = items.iter().map(|line| line.item_id).collect();
        let found = item::Entity::find()
            .filter(item::Column::Id.is_in(wanted.clone()))
            .count(&*self.db)
            .await?;
        let distinct: std::collections::HashSet<Uuid> = wanted.into_iter().collect();
        if found < distinct.len() as u64 {
            return Err(ServiceError::InvalidInput(
                "Bill references an unknown item".to_string(),
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(bill_no = %input.bill_no))]
    pub async fn create_bill(&self, input: CreateBillInput) -> Result<Uuid, ServiceError> {
        self.ensure_references_exist(input.party_id, &input.items)
            .await?;

        let total = line_items_total(&input.items);
        let id = Uuid::new_v4();
        let txn = self.db.begin().await?;

        let header = bill::ActiveModel {
            id: Set(id),
            party_id: Set(input.party_id),
            bill_no: Set(input.bill_no),
            gst_type_id: Set(input.gst_type_id),
            bill_date: Set(input.bill_date),
            is_paid: Set(input.is_paid),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        header.insert(&txn).await?;

        let lines: Vec<bill_item::ActiveModel> = input
            .items
            .iter()
            .map(|line| bill_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                bill_id: Set(id),
                item_id: Set(line.item_id),
                quantity: Set(line.quantity),
                price: Set(line.price),
            })
            .collect();
        bill_item::Entity::insert_many(lines).exec(&txn).await?;

        txn.commit().await?;
        info!(bill_id = %id, total = %total, "bill created");
        Ok(id)
    }

    /// Replaces the header and line items, then re-derives the paid flag
    /// against receipts already on record.
    #[instrument(skip(self, input))]
    pub async fn update_bill(&self, id: Uuid, input: UpdateBillInput) -> Result<(), ServiceError> {
        self.ensure_references_exist(input.party_id, &input.items)
            .await?;

        let existing = bill::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bill {} not found", id)))?;

        let total = line_items_total(&input.items);
        let received = self
            .received_by_bill(&[id])
            .await?
            .get(&id)
            .copied()
            .unwrap_or(Decimal::ZERO);
        // The new total may not drop below receipts already on record,
        // otherwise the due amount would go negative with no way back.
        if total < received {
            return Err(ServiceError::InvalidInput(
                "Bill total cannot be less than the receipts already recorded".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let mut header: bill::ActiveModel = existing.into();
        header.party_id = Set(input.party_id);
        header.bill_no = Set(input.bill_no);
        header.gst_type_id = Set(input.gst_type_id);
        header.bill_date = Set(input.bill_date);
        header.is_paid = Set(received >= total);
        header.updated_at = Set(Some(Utc::now()));
        header.update(&txn).await?;

        bill_item::Entity::delete_many()
            .filter(bill_item::Column::BillId.eq(id))
            .exec(&txn)
            .await?;
        let lines: Vec<bill_item::ActiveModel> = input
            .items
            .iter()
            .map(|line| bill_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                bill_id: Set(id),
                item_id: Set(line.item_id),
                quantity: Set(line.quantity),
                price: Set(line.price),
            })
            .collect();
        bill_item::Entity::insert_many(lines).exec(&txn).await?;

        txn.commit().await?;
        info!(bill_id = %id, "bill updated");
        Ok(())
    }

    pub(crate) async fn received_by_bill(
        &self,
        bill_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Decimal>, ServiceError> {
        let rows = bill_payment::Entity::find()
            .filter(bill_payment::Column::BillId.is_in(bill_ids.to_vec()))
            .all(&*self.db)
            .await?;
        let mut received: HashMap<Uuid, Decimal> = HashMap::new();
        for row in rows {
            *received.entry(row.bill_id).or_insert(Decimal::ZERO) += row.amount_received;
        }
        Ok(received)
    }

    async fn lines_by_bill(
        &self,
        bill_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<BillItemDto>>, ServiceError> {
        let rows = bill_item::Entity::find()
            .filter(bill_item::Column::BillId.is_in(bill_ids.to_vec()))
            .find_also_related(item::Entity)
            .all(&*self.db)
            .await?;
        let mut lines: HashMap<Uuid, Vec<BillItemDto>> = HashMap::new();
        for (line, item) in rows {
            let (design_no, item_name) = item
                .map(|i| (i.design_no, i.item_name))
                .unwrap_or_default();
            lines.entry(line.bill_id).or_default().push(BillItemDto {
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
        model: bill::Model,
        party_name: String,
        items: Vec<BillItemDto>,
        amount_received: Decimal,
    ) -> BillDto {
        let total_quantity: i64 = items.iter().map(|line| i64::from(line.quantity)).sum();
        let total_amount: Decimal = items.iter().map(|line| line.amount).sum();
        BillDto {
            bill_id: model.id,
            party_id: model.party_id,
            party_name,
            bill_no: model.bill_no,
            gst_type_id: model.gst_type_id,
            bill_date: model.bill_date,
            total_quantity,
            total_amount,
            amount_received,
            due_amount: total_amount - amount_received,
            is_paid: model.is_paid,
            items,
        }
    }

    pub async fn list_bills(&self, query: &ListQuery) -> Result<(Vec<BillDto>, u64), ServiceError> {
        let mut finder = bill::Entity::find();
        if !query.search_filter.trim().is_empty() {
            let needle = query.search_filter.trim();
            finder = finder.filter(Condition::any().add(bill::Column::BillNo.contains(needle)));
        }

        let total_count = finder.clone().count(&*self.db).await?;
        let rows = finder
            .find_also_related(party::Entity)
            .order_by_desc(bill::Column::BillDate)
            .offset(query.offset())
            .limit(query.limit())
            .all(&*self.db)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|(model, _)| model.id).collect();
        let mut lines = self.lines_by_bill(&ids).await?;
        let received = self.received_by_bill(&ids).await?;

        let dtos = rows
            .into_iter()
            .map(|(model, party)| {
                let id = model.id;
                Self::assemble_dto(
                    model,
                    party.map(|p| p.party_name).unwrap_or_default(),
                    lines.remove(&id).unwrap_or_default(),
                    received.get(&id).copied().unwrap_or(Decimal::ZERO),
                )
            })
            .collect();
        Ok((dtos, total_count))
    }

    pub async fn get_bill(&self, id: Uuid) -> Result<BillDto, ServiceError> {
        let (model, party) = bill::Entity::find_by_id(id)
            .find_also_related(party::Entity)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bill {} not found", id)))?;

        let mut lines = self.lines_by_bill(&[id]).await?;
        let received = self.received_by_bill(&[id]).await?;
        Ok(Self::assemble_dto(
            model,
            party.map(|p| p.party_name).unwrap_or_default(),
            lines.remove(&id).unwrap_or_default(),
            received.get(&id).copied().unwrap_or(Decimal::ZERO),
        ))
    }

    /// Unsettled bills for one party, for the receipt form selector.
    pub async fn open_bills_for_party(&self, party_id: Uuid) -> Result<Vec<BillDto>, ServiceError> {
        let rows = bill::Entity::find()
            .filter(bill::Column::PartyId.eq(party_id))
            .filter(bill::Column::IsPaid.eq(false))
            .find_also_related(party::Entity)
            .order_by_desc(bill::Column::BillDate)
            .all(&*self.db)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|(model, _)| model.id).collect();
        let mut lines = self.lines_by_bill(&ids).await?;
        let received = self.received_by_bill(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|(model, party)| {
                let id = model.id;
                Self::assemble_dto(
                    model,
                    party.map(|p| p.party_name).unwrap_or_default(),
                    lines.remove(&id).unwrap_or_default(),
                    received.get(&id).copied().unwrap_or(Decimal::ZERO),
                )
            })
            .collect())
    }

    /// Deletes the bill together with its line items and receipts.
    #[instrument(skip(self))]
    pub async fn delete_bill(&self, id: Uuid) -> Result<(), ServiceError> {
        bill::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bill {} not found", id)))?;

        let txn = self.db.begin().await?;
        bill_payment::Entity::delete_many()
            .filter(bill_payment::Column::BillId.eq(id))
            .exec(&txn)
            .await?;
        bill_item::Entity::delete_many()
            .filter(bill_item::Column::BillId.eq(id))
            .exec(&txn)
            .await?;
        bill::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        info!(bill_id = %id, "bill deleted");
        Ok(())
    }
}
