use crate::config::AppConfig;
use crate::entities;
use crate::errors::ServiceError;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, Schema, Set,
};
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

/// Establishes a connection pool using pool sizes from the app config.
pub async fn establish_connection_from_app_config(
    cfg: &AppConfig,
) -> Result<DbPool, ServiceError> {
    let db_config = DbConfig {
        url: cfg.database_url.clone(),
        max_connections: cfg.db_max_connections,
        min_connections: cfg.db_min_connections,
        ..Default::default()
    };
    establish_connection_with_config(&db_config).await
}

/// Establishes a connection pool to the database.
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, ServiceError> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(false);

    let connection = Database::connect(options).await?;
    info!("Database connection established");
    Ok(connection)
}

/// Creates any missing tables from the entity definitions. Idempotent, so it
/// is safe to run on every startup when `auto_migrate` is enabled.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), ServiceError> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    macro_rules! create_table {
        ($entity:expr) => {{
            let mut statement = schema.create_table_from_entity($entity);
            statement.if_not_exists();
            db.execute(backend.build(&statement)).await?;
        }};
    }

    create_table!(entities::user::Entity);
    create_table!(entities::vendor::Entity);
    create_table!(entities::party::Entity);
    create_table!(entities::item::Entity);
    create_table!(entities::inward::Entity);
    create_table!(entities::inward_item::Entity);
    create_table!(entities::vendor_payment::Entity);
    create_table!(entities::bill::Entity);
    create_table!(entities::bill_item::Entity);
    create_table!(entities::bill_payment::Entity);
    create_table!(entities::state::Entity);
    create_table!(entities::city::Entity);

    info!("Database schema is up to date");
    seed_reference_data(db).await?;
    Ok(())
}

/// Seeds the state/city lookup tables on first run.
async fn seed_reference_data(db: &DatabaseConnection) -> Result<(), ServiceError> {
    if entities::state::Entity::find().count(db).await? > 0 {
        debug!("Reference data already present; skipping seed");
        return Ok(());
    }

    let states = [
        (1, "Gujarat"),
        (2, "Maharashtra"),
        (3, "Rajasthan"),
        (4, "Delhi"),
        (5, "Karnataka"),
    ];
    let cities = [
        (1, "Surat", 1),
        (2, "Ahmedabad", 1),
        (3, "Rajkot", 1),
        (4, "Mumbai", 2),
        (5, "Pune", 2),
        (6, "Jaipur", 3),
        (7, "New Delhi", 4),
        (8, "Bengaluru", 5),
    ];

    entities::state::Entity::insert_many(states.iter().map(|(id, name)| {
        entities::state::ActiveModel {
            id: Set(*id),
            state_name: Set((*name).to_string()),
        }
    }))
    .exec(db)
    .await?;

    entities::city::Entity::insert_many(cities.iter().map(|(id, name, state_id)| {
        entities::city::ActiveModel {
            id: Set(*id),
            city_name: Set((*name).to_string()),
            state_id: Set(*state_id),
        }
    }))
    .exec(db)
    .await?;

    info!("Seeded state and city reference data");
    Ok(())
}
