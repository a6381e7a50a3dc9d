use crate::entities::{city, state};
use crate::errors::ServiceError;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDto {
    #[serde(rename = "stateID")]
    pub state_id: i32,
    pub state_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    #[serde(rename = "cityID")]
    pub city_id: i32,
    pub city_name: String,
    #[serde(rename = "stateID")]
    pub state_id: i32,
}

/// Filters for the city lookup. All optional; an empty filter lists
/// everything.
#[derive(Debug, Clone, Default)]
pub struct CityFilter {
    pub city_id: Option<i32>,
    pub city_name: Option<String>,
    pub state_id: Option<i32>,
}

#[derive(Clone)]
pub struct LocationService {
    db: Arc<DatabaseConnection>,
}

impl LocationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn states(&self, state_id: Option<i32>) -> Result<Vec<StateDto>, ServiceError> {
        let mut finder = state::Entity::find();
        // Id 0 is the client's "all states" sentinel.
        if let Some(id) = state_id.filter(|id| *id != 0) {
            finder = finder.filter(state::Column::Id.eq(id));
        }
        let rows = finder
            .order_by_asc(state::Column::StateName)
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|model| StateDto {
                state_id: model.id,
                state_name: model.state_name,
            })
            .collect())
    }

    pub async fn cities(&self, filter: CityFilter) -> Result<Vec<CityDto>, ServiceError> {
        let mut finder = city::Entity::find();
        if let Some(id) = filter.city_id.filter(|id| *id != 0) {
            finder = finder.filter(city::Column::Id.eq(id));
        }
        if let Some(name) = filter.city_name.as_deref().filter(|n| !n.trim().is_empty()) {
            finder = finder.filter(city::Column::CityName.contains(name.trim()));
        }
        if let Some(state_id) = filter.state_id.filter(|id| *id != 0) {
            finder = finder.filter(city::Column::StateId.eq(state_id));
        }
        let rows = finder
            .order_by_asc(city::Column::CityName)
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|model| CityDto {
                city_id: model.id,
                city_name: model.city_name,
                state_id: model.state_id,
            })
            .collect())
    }
}
