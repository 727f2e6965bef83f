//! Sample data loaded once at process start.
//!
//! Each collection is seeded only when its store is empty, so re-running
//! against a populated database is a no-op.

use taproom_catalog::{Beer, Customer, Price};
use taproom_core::{EntityStore, StoreResult};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub beers_inserted: usize,
    pub customers_inserted: usize,
}

fn sample_beers() -> Vec<Beer> {
    [
        ("Galaxy Cat", "Pale Ale", "12346", 454, 1299),
        ("Cranky Pants", "Pale Ale", "129686", 84, 1199),
        ("Sunshine City", "IPA", "129816", 94, 1499),
    ]
    .into_iter()
    .map(|(name, style, upc, qty, cents)| {
        Beer::new(
            name.to_string(),
            Some(style.to_string()),
            Some(upc.to_string()),
            Some(qty),
            Some(Price::from_cents(cents)),
        )
    })
    .collect()
}

fn sample_customers() -> Vec<Customer> {
    ["John Doe", "Jane Smith", "Bob Johnson"]
        .into_iter()
        .map(|name| Customer::new(name.to_string()))
        .collect()
}

/// Insert sample beers/customers into whichever stores are empty.
///
/// Inserts run sequentially so ids come out in a stable order.
pub async fn seed_sample_data(
    beers: &dyn EntityStore<Beer>,
    customers: &dyn EntityStore<Customer>,
) -> StoreResult<SeedReport> {
    let mut report = SeedReport::default();

    if beers.count().await? == 0 {
        for beer in sample_beers() {
            beers.save(beer).await?;
            report.beers_inserted += 1;
        }
    }

    if customers.count().await? == 0 {
        for customer in sample_customers() {
            customers.save(customer).await?;
            report.customers_inserted += 1;
        }
    }

    let beer_count = beers.count().await?;
    let customer_count = customers.count().await?;
    tracing::info!(
        beer_count,
        customer_count,
        beers_inserted = report.beers_inserted,
        customers_inserted = report.customers_inserted,
        "sample data bootstrap complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryEntityStore;

    #[tokio::test]
    async fn seeds_empty_stores_once() {
        let beers = InMemoryEntityStore::<Beer>::new();
        let customers = InMemoryEntityStore::<Customer>::new();

        let first = seed_sample_data(&beers, &customers).await.unwrap();
        assert_eq!(first, SeedReport { beers_inserted: 3, customers_inserted: 3 });

        let second = seed_sample_data(&beers, &customers).await.unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(beers.count().await.unwrap(), 3);
        assert_eq!(customers.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn populated_store_is_left_alone() {
        let beers = InMemoryEntityStore::<Beer>::new();
        let customers = InMemoryEntityStore::<Customer>::new();
        customers.save(Customer::new("Existing".into())).await.unwrap();

        let report = seed_sample_data(&beers, &customers).await.unwrap();
        assert_eq!(report.beers_inserted, 3);
        assert_eq!(report.customers_inserted, 0);
        assert_eq!(customers.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn first_sample_beer_is_galaxy_cat() {
        let beers = InMemoryEntityStore::<Beer>::new();
        let customers = InMemoryEntityStore::<Customer>::new();
        seed_sample_data(&beers, &customers).await.unwrap();

        let all = beers.find_all().await.unwrap();
        assert_eq!(all[0].beer_name(), "Galaxy Cat");
        assert_eq!(all[0].price(), Some(Price::from_cents(1299)));
        assert_eq!(all[2].beer_style(), Some("IPA"));
    }
}
