use crate::entities::{
    bill, bill_item, bill_payment, inward, inward_item, item, party, vendor, vendor_payment,
};
use crate::errors::ServiceError;
use crate::handlers::common::ListQuery;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Select};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Optional reporting window. An open bound leaves that side unconstrained.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl DateRange {
    /// Today only. The dashboard falls back to this when no window is given.
    pub fn today() -> Self {
        let today = Utc::now().date_naive();
        Self {
            from_date: Some(today),
            to_date: Some(today),
        }
    }

    pub fn is_open(&self) -> bool {
        self.from_date.is_none() && self.to_date.is_none()
    }
}

fn apply_range<E: EntityTrait>(
    mut finder: Select<E>,
    column: impl ColumnTrait,
    range: DateRange,
) -> Select<E> {
    if let Some(from) = range.from_date {
        finder = finder.filter(column.gte(from));
    }
    if let Some(to) = range.to_date {
        finder = finder.filter(column.lte(to));
    }
    finder
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartySalesRow {
    #[serde(rename = "partyID")]
    pub party_id: Uuid,
    pub party_name: String,
    pub mobile_no: String,
    pub bill_count: u64,
    pub total_quantity: i64,
    pub total_sales: Decimal,
    pub amount_received: Decimal,
    pub due_amount: Decimal,
    pub last_payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorInwardItemRow {
    pub design_no: String,
    pub item_name: String,
    pub quantity: i64,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorInwardRow {
    #[serde(rename = "vendorID")]
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub inward_count: u64,
    pub total_quantity: i64,
    pub total_purchase: Decimal,
    pub amount_paid: Decimal,
    pub due_amount: Decimal,
    pub items: Vec<VendorInwardItemRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRow {
    #[serde(rename = "itemID")]
    pub item_id: Uuid,
    pub design_no: String,
    pub item_name: String,
    pub vendor_name: String,
    pub inward_quantity: i64,
    pub outward_quantity: i64,
    pub stock_quantity: i64,
    pub manufacturing_cost: Decimal,
    pub stock_value: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBillRow {
    pub bill_no: String,
    pub party_name: String,
    pub bill_date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentInwardRow {
    pub bill_no: String,
    pub vendor_name: String,
    pub inward_date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub bill_count: u64,
    pub inward_count: u64,
    pub party_count: u64,
    pub total_sales: Decimal,
    pub total_purchase: Decimal,
    pub bill_payment_count: u64,
    pub amount_received: Decimal,
    pub vendor_payment_count: u64,
    pub amount_paid: Decimal,
    pub total_stock_value: Decimal,
    pub recent_bills: Vec<RecentBillRow>,
    pub recent_inwards: Vec<RecentInwardRow>,
}

#[derive(Clone)]
pub struct ReportService {
    db: Arc<DatabaseConnection>,
}

impl ReportService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Sales aggregated per party over the window. The paged slice is cut
    /// after aggregation so totals stay whole-window figures.
    pub async fn party_sales_report(
        &self,
        query: &ListQuery,
        range: DateRange,
    ) -> Result<(Vec<PartySalesRow>, u64), ServiceError> {
        let bills = apply_range(bill::Entity::find(), bill::Column::BillDate, range)
            .all(&*self.db)
            .await?;
        let bill_ids: Vec<Uuid> = bills.iter().map(|b| b.id).collect();

        let mut quantity_by_bill: HashMap<Uuid, i64> = HashMap::new();
        let mut sales_by_bill: HashMap<Uuid, Decimal> = HashMap::new();
        for line in bill_item::Entity::find()
            .filter(bill_item::Column::BillId.is_in(bill_ids.clone()))
            .all(&*self.db)
            .await?
        {
            *quantity_by_bill.entry(line.bill_id).or_insert(0) += i64::from(line.quantity);
            *sales_by_bill.entry(line.bill_id).or_insert(Decimal::ZERO) +=
                Decimal::from(line.quantity) * line.price;
        }
        let mut received_by_bill: HashMap<Uuid, Decimal> = HashMap::new();
        let mut last_payment_by_bill: HashMap<Uuid, NaiveDate> = HashMap::new();
        for payment in bill_payment::Entity::find()
            .filter(bill_payment::Column::BillId.is_in(bill_ids))
            .all(&*self.db)
            .await?
        {
            *received_by_bill
                .entry(payment.bill_id)
                .or_insert(Decimal::ZERO) += payment.amount_received;
            last_payment_by_bill
                .entry(payment.bill_id)
                .and_modify(|date| *date = (*date).max(payment.received_date))
                .or_insert(payment.received_date);
        }

        let parties: HashMap<Uuid, party::Model> = party::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        let mut rows: HashMap<Uuid, PartySalesRow> = HashMap::new();
        for bill in bills {
            let Some(owner) = parties.get(&bill.party_id) else {
                continue;
            };
            let entry = rows.entry(bill.party_id).or_insert_with(|| PartySalesRow {
                party_id: owner.id,
                party_name: owner.party_name.clone(),
                mobile_no: owner.mobile_no.clone(),
                bill_count: 0,
                total_quantity: 0,
                total_sales: Decimal::ZERO,
                amount_received: Decimal::ZERO,
                due_amount: Decimal::ZERO,
                last_payment_date: None,
            });
            entry.bill_count += 1;
            entry.total_quantity += quantity_by_bill.get(&bill.id).copied().unwrap_or(0);
            entry.total_sales += sales_by_bill.get(&bill.id).copied().unwrap_or(Decimal::ZERO);
            entry.amount_received += received_by_bill
                .get(&bill.id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            if let Some(date) = last_payment_by_bill.get(&bill.id) {
                entry.last_payment_date = Some(match entry.last_payment_date {
                    Some(existing) => existing.max(*date),
                    None => *date,
                });
            }
        }

        let mut report: Vec<PartySalesRow> = rows
            .into_values()
            .map(|mut row| {
                row.due_amount = row.total_sales - row.amount_received;
                row
            })
            .filter(|row| {
                let needle = query.search_filter.trim().to_lowercase();
                needle.is_empty() || row.party_name.to_lowercase().contains(&needle)
            })
            .collect();
        report.sort_by(|a, b| b.total_sales.cmp(&a.total_sales));

        let total_count = report.len() as u64;
        let page = Self::slice_page(report, query);
        Ok((page, total_count))
    }

    /// Purchases aggregated per vendor over the window, with a per-item
    /// breakdown under each vendor.
    pub async fn vendor_inward_report(
        &self,
        query: &ListQuery,
        range: DateRange,
    ) -> Result<(Vec<VendorInwardRow>, u64), ServiceError> {
        let inwards = apply_range(inward::Entity::find(), inward::Column::InwardDate, range)
            .all(&*self.db)
            .await?;
        let inward_ids: Vec<Uuid> = inwards.iter().map(|i| i.id).collect();

        let lines = inward_item::Entity::find()
            .filter(inward_item::Column::InwardId.is_in(inward_ids.clone()))
            .find_also_related(item::Entity)
            .all(&*self.db)
            .await?;
        let mut paid_by_inward: HashMap<Uuid, Decimal> = HashMap::new();
        for payment in vendor_payment::Entity::find()
            .filter(vendor_payment::Column::InwardId.is_in(inward_ids))
            .all(&*self.db)
            .await?
        {
            *paid_by_inward
                .entry(payment.inward_id)
                .or_insert(Decimal::ZERO) += payment.amount_paid;
        }

        let vendors: HashMap<Uuid, String> = vendor::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.vendor_name))
            .collect();
        let vendor_by_inward: HashMap<Uuid, Uuid> = inwards
            .iter()
            .map(|model| (model.id, model.vendor_id))
            .collect();

        let mut rows: HashMap<Uuid, VendorInwardRow> = HashMap::new();
        for model in &inwards {
            let entry = rows.entry(model.vendor_id).or_insert_with(|| VendorInwardRow {
                vendor_id: model.vendor_id,
                vendor_name: vendors
                    .get(&model.vendor_id)
                    .cloned()
                    .unwrap_or_default(),
                inward_count: 0,
                total_quantity: 0,
                total_purchase: Decimal::ZERO,
                amount_paid: Decimal::ZERO,
                due_amount: Decimal::ZERO,
                items: Vec::new(),
            });
            entry.inward_count += 1;
            entry.amount_paid += paid_by_inward
                .get(&model.id)
                .copied()
                .unwrap_or(Decimal::ZERO);
        }

        // per-vendor item breakdown, merged by design number
        for (line, catalog) in lines {
            let Some(vendor_id) = vendor_by_inward.get(&line.inward_id) else {
                continue;
            };
            let Some(entry) = rows.get_mut(vendor_id) else {
                continue;
            };
            let amount = Decimal::from(line.quantity) * line.price;
            entry.total_quantity += i64::from(line.quantity);
            entry.total_purchase += amount;

            let (design_no, item_name) = catalog
                .map(|i| (i.design_no, i.item_name))
                .unwrap_or_default();
            if let Some(existing) = entry
                .items
                .iter_mut()
                .find(|row| row.design_no == design_no)
            {
                existing.quantity += i64::from(line.quantity);
                existing.amount += amount;
            } else {
                entry.items.push(VendorInwardItemRow {
                    design_no,
                    item_name,
                    quantity: i64::from(line.quantity),
                    amount,
                });
            }
        }

        let mut report: Vec<VendorInwardRow> = rows
            .into_values()
            .map(|mut row| {
                row.due_amount = row.total_purchase - row.amount_paid;
                row.items.sort_by(|a, b| a.design_no.cmp(&b.design_no));
                row
            })
            .filter(|row| {
                let needle = query.search_filter.trim().to_lowercase();
                needle.is_empty() || row.vendor_name.to_lowercase().contains(&needle)
            })
            .collect();
        report.sort_by(|a, b| b.total_purchase.cmp(&a.total_purchase));

        let total_count = report.len() as u64;
        let page = Self::slice_page(report, query);
        Ok((page, total_count))
    }

    /// On-hand stock per item: inward quantity minus billed quantity, valued
    /// at manufacturing cost.
    pub async fn stock_report(
        &self,
        query: &ListQuery,
    ) -> Result<(Vec<StockRow>, u64), ServiceError> {
        let catalog = item::Entity::find()
            .find_also_related(vendor::Entity)
            .all(&*self.db)
            .await?;

        let mut inward_qty: HashMap<Uuid, i64> = HashMap::new();
        for line in inward_item::Entity::find().all(&*self.db).await? {
            *inward_qty.entry(line.item_id).or_insert(0) += i64::from(line.quantity);
        }
        let mut outward_qty: HashMap<Uuid, i64> = HashMap::new();
        for line in bill_item::Entity::find().all(&*self.db).await? {
            *outward_qty.entry(line.item_id).or_insert(0) += i64::from(line.quantity);
        }

        let mut report: Vec<StockRow> = catalog
            .into_iter()
            .map(|(model, vendor)| {
                let inward = inward_qty.get(&model.id).copied().unwrap_or(0);
                let outward = outward_qty.get(&model.id).copied().unwrap_or(0);
                let stock = inward - outward;
                StockRow {
                    item_id: model.id,
                    design_no: model.design_no,
                    item_name: model.item_name,
                    vendor_name: vendor.map(|v| v.vendor_name).unwrap_or_default(),
                    inward_quantity: inward,
                    outward_quantity: outward,
                    stock_quantity: stock,
                    manufacturing_cost: model.manufacturing_cost,
                    stock_value: Decimal::from(stock) * model.manufacturing_cost,
                }
            })
            .filter(|row| {
                let needle = query.search_filter.trim().to_lowercase();
                needle.is_empty()
                    || row.design_no.to_lowercase().contains(&needle)
                    || row.item_name.to_lowercase().contains(&needle)
            })
            .collect();
        report.sort_by(|a, b| a.design_no.cmp(&b.design_no));

        let total_count = report.len() as u64;
        let page = Self::slice_page(report, query);
        Ok((page, total_count))
    }

    /// Headline figures for the window. An open window means today.
    pub async fn dashboard(&self, range: DateRange) -> Result<DashboardSummary, ServiceError> {
        let range = if range.is_open() {
            DateRange::today()
        } else {
            range
        };

        let bills = apply_range(bill::Entity::find(), bill::Column::BillDate, range)
            .all(&*self.db)
            .await?;
        let inwards = apply_range(inward::Entity::find(), inward::Column::InwardDate, range)
            .all(&*self.db)
            .await?;

        let bill_ids: Vec<Uuid> = bills.iter().map(|b| b.id).collect();
        let inward_ids: Vec<Uuid> = inwards.iter().map(|i| i.id).collect();

        let mut sales_by_bill: HashMap<Uuid, Decimal> = HashMap::new();
        for line in bill_item::Entity::find()
            .filter(bill_item::Column::BillId.is_in(bill_ids))
            .all(&*self.db)
            .await?
        {
            *sales_by_bill.entry(line.bill_id).or_insert(Decimal::ZERO) +=
                Decimal::from(line.quantity) * line.price;
        }
        let mut purchase_by_inward: HashMap<Uuid, Decimal> = HashMap::new();
        for line in inward_item::Entity::find()
            .filter(inward_item::Column::InwardId.is_in(inward_ids))
            .all(&*self.db)
            .await?
        {
            *purchase_by_inward
                .entry(line.inward_id)
                .or_insert(Decimal::ZERO) += Decimal::from(line.quantity) * line.price;
        }
        let total_sales: Decimal = sales_by_bill.values().copied().sum();
        let total_purchase: Decimal = purchase_by_inward.values().copied().sum();

        let received = apply_range(
            bill_payment::Entity::find(),
            bill_payment::Column::ReceivedDate,
            range,
        )
        .all(&*self.db)
        .await?;
        let paid = apply_range(
            vendor_payment::Entity::find(),
            vendor_payment::Column::PaidDate,
            range,
        )
        .all(&*self.db)
        .await?;

        let party_count = party::Entity::find().count(&*self.db).await?;
        let total_stock_value = self.current_stock_value().await?;

        let party_names: HashMap<Uuid, String> = party::Entity::find()
            .filter(party::Column::Id.is_in(bills.iter().map(|b| b.party_id).collect::<Vec<_>>()))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p.party_name))
            .collect();
        let vendor_names: HashMap<Uuid, String> = vendor::Entity::find()
            .filter(
                vendor::Column::Id.is_in(inwards.iter().map(|i| i.vendor_id).collect::<Vec<_>>()),
            )
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|v| (v.id, v.vendor_name))
            .collect();

        let mut recent_bills: Vec<RecentBillRow> = bills
            .iter()
            .map(|bill| RecentBillRow {
                bill_no: bill.bill_no.clone(),
                party_name: party_names.get(&bill.party_id).cloned().unwrap_or_default(),
                bill_date: bill.bill_date,
                amount: sales_by_bill.get(&bill.id).copied().unwrap_or(Decimal::ZERO),
            })
            .collect();
        recent_bills.sort_by(|a, b| b.bill_date.cmp(&a.bill_date));
        recent_bills.truncate(5);

        let mut recent_inwards: Vec<RecentInwardRow> = inwards
            .iter()
            .map(|inward| RecentInwardRow {
                bill_no: inward.bill_no.clone(),
                vendor_name: vendor_names
                    .get(&inward.vendor_id)
                    .cloned()
                    .unwrap_or_default(),
                inward_date: inward.inward_date,
                amount: purchase_by_inward
                    .get(&inward.id)
                    .copied()
                    .unwrap_or(Decimal::ZERO),
            })
            .collect();
        recent_inwards.sort_by(|a, b| b.inward_date.cmp(&a.inward_date));
        recent_inwards.truncate(5);

        Ok(DashboardSummary {
            bill_count: bills.len() as u64,
            inward_count: inwards.len() as u64,
            party_count,
            total_sales,
            total_purchase,
            bill_payment_count: received.len() as u64,
            amount_received: received.iter().map(|row| row.amount_received).sum(),
            vendor_payment_count: paid.len() as u64,
            amount_paid: paid.iter().map(|row| row.amount_paid).sum(),
            total_stock_value,
            recent_bills,
            recent_inwards,
        })
    }

    /// Valuation of everything currently on hand, at manufacturing cost.
    async fn current_stock_value(&self) -> Result<Decimal, ServiceError> {
        let mut net_qty: HashMap<Uuid, i64> = HashMap::new();
        for line in inward_item::Entity::find().all(&*self.db).await? {
            *net_qty.entry(line.item_id).or_insert(0) += i64::from(line.quantity);
        }
        for line in bill_item::Entity::find().all(&*self.db).await? {
            *net_qty.entry(line.item_id).or_insert(0) -= i64::from(line.quantity);
        }

        let mut value = Decimal::ZERO;
        for item in item::Entity::find().all(&*self.db).await? {
            let qty = net_qty.get(&item.id).copied().unwrap_or(0);
            value += Decimal::from(qty) * item.manufacturing_cost;
        }
        Ok(value)
    }

    fn slice_page<T>(rows: Vec<T>, query: &ListQuery) -> Vec<T> {
        rows.into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect()
    }
}
