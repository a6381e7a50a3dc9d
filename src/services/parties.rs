use crate::entities::{bill, bill_item, bill_payment, city, party, state};
use crate::errors::ServiceError;
use crate::handlers::common::ListQuery;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreatePartyInput {
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
}

pub type UpdatePartyInput = CreatePartyInput;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyDto {
    #[serde(rename = "partyID")]
    pub party_id: Uuid,
    pub party_name: String,
    pub mobile_no: String,
    pub gst_number: String,
    pub pan_number: String,
    pub aadhar_number: String,
    #[serde(rename = "stateID")]
    pub state_id: i32,
    pub state_name: String,
    #[serde(rename = "cityID")]
    pub city_id: i32,
    pub city_name: String,
    pub address: String,
    pub document_path: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyOption {
    #[serde(rename = "partyID")]
    pub party_id: Uuid,
    pub party_name: String,
    pub mobile_no: String,
}

/// One bill row in the party statement.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyBillRow {
    #[serde(rename = "billID")]
    pub bill_id: Uuid,
    pub bill_no: String,
    pub bill_date: NaiveDate,
    pub total_amount: Decimal,
    pub total_received: Decimal,
    pub due_amount: Decimal,
    pub is_paid: bool,
}

/// Party master record plus its billing history and running aggregates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyDetailsDto {
    #[serde(flatten)]
    pub party: PartyDto,
    pub bills: Vec<PartyBillRow>,
    pub total_bill_amount: Decimal,
    pub total_received_amount: Decimal,
    pub total_due_amount: Decimal,
}

#[derive(Clone)]
pub struct PartyService {
    db: Arc<DatabaseConnection>,
}

impl PartyService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn location_names(&self) -> Result<(HashMap<i32, String>, HashMap<i32, String>), ServiceError> {
        let states: HashMap<i32, String> = state::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.state_name))
            .collect();
        let cities: HashMap<i32, String> = city::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.city_name))
            .collect();
        Ok((states, cities))
    }

    fn to_dto(
        model: party::Model,
        states: &HashMap<i32, String>,
        cities: &HashMap<i32, String>,
    ) -> PartyDto {
        PartyDto {
            party_id: model.id,
            party_name: model.party_name,
            mobile_no: model.mobile_no,
            gst_number: model.gst_number,
            pan_number: model.pan_number,
            aadhar_number: model.aadhar_number,
            state_name: states.get(&model.state_id).cloned().unwrap_or_default(),
            state_id: model.state_id,
            city_name: cities.get(&model.city_id).cloned().unwrap_or_default(),
            city_id: model.city_id,
            address: model.address,
            document_path: model.document_path,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }

    async fn ensure_location_exists(
        &self,
        state_id: i32,
        city_id: i32,
    ) -> Result<(), ServiceError> {
        if state::Entity::find_by_id(state_id).one(&*self.db).await?.is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "Unknown state {}",
                state_id
            )));
        }
        let city = city::Entity::find_by_id(city_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::InvalidInput(format!("Unknown city {}", city_id)))?;
        if city.state_id != state_id {
            return Err(ServiceError::InvalidInput(format!(
                "City {} does not belong to state {}",
                city_id, state_id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(party_name = %input.party_name))]
    pub async fn create_party(&self, input: CreatePartyInput) -> Result<Uuid, ServiceError> {
        self.ensure_location_exists(input.state_id, input.city_id)
            .await?;

        let id = Uuid::new_v4();
        let model = party::ActiveModel {
            id: Set(id),
            party_name: Set(input.party_name),
            mobile_no: Set(input.mobile_no),
            gst_number: Set(input.gst_number),
            pan_number: Set(input.pan_number),
            aadhar_number: Set(input.aadhar_number),
            state_id: Set(input.state_id),
            city_id: Set(input.city_id),
            address: Set(input.address),
            document_path: Set(input.document_path),
            is_active: Set(input.is_active),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        model.insert(&*self.db).await?;
        info!(party_id = %id, "party created");
        Ok(id)
    }

    #[instrument(skip(self, input))]
    pub async fn update_party(&self, id: Uuid, input: UpdatePartyInput) -> Result<(), ServiceError> {
        self.ensure_location_exists(input.state_id, input.city_id)
            .await?;

        let existing = party::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Party {} not found", id)))?;

        let mut model: party::ActiveModel = existing.into();
        model.party_name = Set(input.party_name);
        model.mobile_no = Set(input.mobile_no);
        model.gst_number = Set(input.gst_number);
        model.pan_number = Set(input.pan_number);
        model.aadhar_number = Set(input.aadhar_number);
        model.state_id = Set(input.state_id);
        model.city_id = Set(input.city_id);
        model.address = Set(input.address);
        model.document_path = Set(input.document_path);
        model.is_active = Set(input.is_active);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&*self.db).await?;
        info!(party_id = %id, "party updated");
        Ok(())
    }

    pub async fn list_parties(
        &self,
        query: &ListQuery,
    ) -> Result<(Vec<PartyDto>, u64), ServiceError> {
        let mut finder = party::Entity::find();
        if !query.search_filter.trim().is_empty() {
            let needle = query.search_filter.trim();
            finder = finder.filter(
                Condition::any()
                    .add(party::Column::PartyName.contains(needle))
                    .add(party::Column::MobileNo.contains(needle))
                    .add(party::Column::GstNumber.contains(needle)),
            );
        }

        let total_count = finder.clone().count(&*self.db).await?;
        let rows = finder
            .order_by_asc(party::Column::PartyName)
            .offset(query.offset())
            .limit(query.limit())
            .all(&*self.db)
            .await?;

        let (states, cities) = self.location_names().await?;
        let dtos = rows
            .into_iter()
            .map(|model| Self::to_dto(model, &states, &cities))
            .collect();
        Ok((dtos, total_count))
    }

    /// Active parties for the billing form selector.
    pub async fn party_options(&self) -> Result<Vec<PartyOption>, ServiceError> {
        let rows = party::Entity::find()
            .filter(party::Column::IsActive.eq(true))
            .order_by_asc(party::Column::PartyName)
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|model| PartyOption {
                party_id: model.id,
                party_name: model.party_name,
                mobile_no: model.mobile_no,
            })
            .collect())
    }

    pub async fn get_party(&self, id: Uuid) -> Result<PartyDto, ServiceError> {
        let model = party::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Party {} not found", id)))?;
        let (states, cities) = self.location_names().await?;
        Ok(Self::to_dto(model, &states, &cities))
    }

    /// Party record with per-bill totals and overall billed/received/due
    /// aggregates, for the party statement view.
    pub async fn party_details(&self, id: Uuid) -> Result<PartyDetailsDto, ServiceError> {
        let party = self.get_party(id).await?;

        let bills = bill::Entity::find()
            .filter(bill::Column::PartyId.eq(id))
            .order_by_desc(bill::Column::BillDate)
            .all(&*self.db)
            .await?;
        let bill_ids: Vec<Uuid> = bills.iter().map(|b| b.id).collect();

        let mut totals: HashMap<Uuid, Decimal> = HashMap::new();
        for line in bill_item::Entity::find()
            .filter(bill_item::Column::BillId.is_in(bill_ids.clone()))
            .all(&*self.db)
            .await?
        {
            *totals.entry(line.bill_id).or_insert(Decimal::ZERO) +=
                Decimal::from(line.quantity) * line.price;
        }
        let mut received: HashMap<Uuid, Decimal> = HashMap::new();
        for payment in bill_payment::Entity::find()
            .filter(bill_payment::Column::BillId.is_in(bill_ids))
            .all(&*self.db)
            .await?
        {
            *received.entry(payment.bill_id).or_insert(Decimal::ZERO) += payment.amount_received;
        }

        let rows: Vec<PartyBillRow> = bills
            .into_iter()
            .map(|model| {
                let total_amount = totals.get(&model.id).copied().unwrap_or(Decimal::ZERO);
                let total_received = received.get(&model.id).copied().unwrap_or(Decimal::ZERO);
                PartyBillRow {
                    bill_id: model.id,
                    bill_no: model.bill_no,
                    bill_date: model.bill_date,
                    total_amount,
                    total_received,
                    due_amount: total_amount - total_received,
                    is_paid: model.is_paid,
                }
            })
            .collect();

        let total_bill_amount: Decimal = rows.iter().map(|r| r.total_amount).sum();
        let total_received_amount: Decimal = rows.iter().map(|r| r.total_received).sum();
        Ok(PartyDetailsDto {
            party,
            bills: rows,
            total_bill_amount,
            total_received_amount,
            total_due_amount: total_bill_amount - total_received_amount,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_party(&self, id: Uuid) -> Result<(), ServiceError> {
        let bill_refs = bill::Entity::find()
            .filter(bill::Column::PartyId.eq(id))
            .count(&*self.db)
            .await?;
        if bill_refs > 0 {
            return Err(ServiceError::Conflict(
                "Party has bills and cannot be deleted".to_string(),
            ));
        }

        let result = party::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Party {} not found", id)));
        }
        info!(party_id = %id, "party deleted");
        Ok(())
    }
}
