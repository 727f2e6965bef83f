//! Store wiring: picks the backend from config, bootstraps it, and builds
//! one `ResourceService` per entity kind.

use std::sync::Arc;

use anyhow::Context;

use taproom_catalog::{Beer, Customer, Resource, ResourceService};
use taproom_core::EntityStore;
use taproom_infra::db;
use taproom_infra::{InMemoryEntityStore, PostgresBeerStore, PostgresCustomerStore, seed_sample_data};

use crate::config::{AppConfig, StoreBackend};

pub struct AppServices {
    pub beers: ResourceService<Beer>,
    pub customers: ResourceService<Customer>,
    public_base_url: String,
}

/// Lets generic handlers find the service for their resource kind.
pub trait ServesResource<R: Resource> {
    fn service(&self) -> &ResourceService<R>;
}

impl ServesResource<Beer> for AppServices {
    fn service(&self) -> &ResourceService<Beer> {
        &self.beers
    }
}

impl ServesResource<Customer> for AppServices {
    fn service(&self) -> &ResourceService<Customer> {
        &self.customers
    }
}

impl AppServices {
    pub fn new(
        beers: Arc<dyn EntityStore<Beer>>,
        customers: Arc<dyn EntityStore<Customer>>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            beers: ResourceService::new(beers),
            customers: ResourceService::new(customers),
            public_base_url: public_base_url.into(),
        }
    }

    /// Absolute URL of a single resource, used for `Location` headers.
    pub fn location(&self, path: &str) -> String {
        format!("{}{path}", self.public_base_url)
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let services = match &config.store {
        StoreBackend::InMemory => {
            tracing::info!("using in-memory stores");
            build_in_memory_services(config)
        }
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => build_postgres_services(config, database_url, *max_connections).await?,
    };

    if config.seed_sample_data {
        seed_sample_data(services.beers.store().as_ref(), services.customers.store().as_ref())
            .await
            .context("failed to seed sample data")?;
    }

    Ok(services)
}

fn build_in_memory_services(config: &AppConfig) -> AppServices {
    AppServices::new(
        Arc::new(InMemoryEntityStore::<Beer>::new()),
        Arc::new(InMemoryEntityStore::<Customer>::new()),
        config.public_base_url.clone(),
    )
}

async fn build_postgres_services(
    config: &AppConfig,
    database_url: &str,
    max_connections: u32,
) -> anyhow::Result<AppServices> {
    let pool = db::connect(database_url, max_connections)
        .await
        .context("failed to connect to Postgres")?;
    db::bootstrap_schema(&pool)
        .await
        .context("failed to bootstrap database schema")?;

    tracing::info!(max_connections, "using Postgres stores");
    Ok(AppServices::new(
        Arc::new(PostgresBeerStore::new(pool.clone())),
        Arc::new(PostgresCustomerStore::new(pool)),
        config.public_base_url.clone(),
    ))
}
