//! Reconciliation: computing the next persisted state of an entity.
//!
//! Every write rebuilds a whole new entity value from
//! `(existing entity, caller input, operation)`. Nothing here does I/O.
//!
//! | Operation | Domain fields | `id` / audit |
//! |-----------|---------------|--------------|
//! | create    | copied from input | unset (store assigns) |
//! | replace   | copied from input; absent → unset | carried from existing |
//! | patch     | input when present, else existing | carried from existing |
//!
//! A numeric field that fails to parse aborts the whole reconciliation; the
//! caller never sees a half-applied entity.

use serde::Serialize;
use serde::de::DeserializeOwned;

use taproom_core::{DomainResult, Entity, EntityId};

use crate::field::Field;
use crate::numeric::NumericText;

/// Which write is being validated/reconciled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    Create,
    Replace,
    Patch,
}

/// An entity kind exposed as a CRUD resource.
pub trait Resource: Entity {
    /// Transfer representation (request and response body).
    type Dto: Clone + core::fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static;

    /// Reject malformed input for `op` before any reconciliation happens.
    fn validate(input: &Self::Dto, op: Operation) -> DomainResult<()>;

    /// New, unsaved entity from validated input.
    fn reconcile_create(input: &Self::Dto) -> DomainResult<Self>;

    /// Full replace: every domain field comes from `input`.
    fn reconcile_replace(existing: &Self, input: &Self::Dto) -> DomainResult<Self>;

    /// Partial merge: present fields come from `input`, the rest from `existing`.
    fn reconcile_patch(existing: &Self, input: &Self::Dto) -> DomainResult<Self>;

    fn to_dto(&self) -> Self::Dto;

    /// Server-assigned id carried by a representation, if any.
    fn dto_id(dto: &Self::Dto) -> Option<EntityId>;
}

/// Replace semantics for a plain field: absent means unset.
pub(crate) fn replaced<T: Clone>(input: &Field<T>) -> Option<T> {
    input.as_option().cloned()
}

/// Patch semantics for a plain field: absent means keep.
pub(crate) fn patched<T: Clone>(input: &Field<T>, existing: &Option<T>) -> Option<T> {
    input.as_option().cloned().or_else(|| existing.clone())
}

/// Replace semantics for a numeric-text field.
pub(crate) fn replaced_numeric<T>(
    input: &Field<NumericText>,
    parse: impl FnOnce(&NumericText) -> DomainResult<T>,
) -> DomainResult<Option<T>> {
    input.as_option().map(parse).transpose()
}

/// Patch semantics for a numeric-text field.
pub(crate) fn patched_numeric<T: Clone>(
    input: &Field<NumericText>,
    existing: &Option<T>,
    parse: impl FnOnce(&NumericText) -> DomainResult<T>,
) -> DomainResult<Option<T>> {
    match input.as_option() {
        Some(raw) => parse(raw).map(Some),
        None => Ok(existing.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use taproom_core::{Audit, DomainError, EntityId};

    use crate::beer::{Beer, BeerDto};
    use crate::customer::{Customer, CustomerDto};
    use crate::numeric::Price;

    fn stored_beer(
        name: String,
        style: Option<String>,
        upc: Option<String>,
        qty: Option<i32>,
        cents: Option<i64>,
    ) -> Beer {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let audit = Audit {
            created_date: Some(t0),
            last_modified_date: Some(t0 + Duration::minutes(1)),
        };
        Beer::new(
            name,
            style,
            upc,
            qty,
            cents.map(|c| Price::from_minor_units(c).unwrap()),
        )
        .with_identity(EntityId::new(11).unwrap(), audit)
    }

    fn name_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z ]{2,30}"
    }

    prop_compose! {
        fn arb_beer()(
            name in name_strategy(),
            style in proptest::option::of("[A-Za-z ]{1,20}"),
            upc in proptest::option::of("[0-9]{1,25}"),
            qty in proptest::option::of(0i32..100_000),
            cents in proptest::option::of(0i64..1_000_000),
        ) -> Beer {
            stored_beer(name, style, upc, qty, cents)
        }
    }

    proptest! {
        #[test]
        fn replace_with_full_input_takes_every_field(
            existing in arb_beer(),
            name in name_strategy(),
            style in "[A-Za-z ]{1,20}",
            upc in "[0-9]{1,25}",
            qty in 0i32..100_000,
            cents in 0i64..1_000_000,
        ) {
            let price = Price::from_minor_units(cents).unwrap();
            let input = BeerDto {
                beer_name: Field::Value(name.clone()),
                beer_style: Field::Value(style.clone()),
                upc: Field::Value(upc.clone()),
                quantity_on_hand: Field::Value(NumericText::text(qty.to_string())),
                price: Field::Value(NumericText::text(price.to_string())),
                ..BeerDto::default()
            };

            let next = Beer::reconcile_replace(&existing, &input).unwrap();
            prop_assert_eq!(next.beer_name(), name.as_str());
            prop_assert_eq!(next.beer_style(), Some(style.as_str()));
            prop_assert_eq!(next.upc(), Some(upc.as_str()));
            prop_assert_eq!(next.quantity_on_hand(), Some(qty));
            prop_assert_eq!(next.price(), Some(price));
            prop_assert_eq!(next.id(), existing.id());
            prop_assert_eq!(next.audit(), existing.audit());
        }

        #[test]
        fn patch_with_empty_input_is_identity(existing in arb_beer()) {
            let next = Beer::reconcile_patch(&existing, &BeerDto::default()).unwrap();
            prop_assert_eq!(next, existing);
        }

        #[test]
        fn patch_with_explicit_nulls_is_identity(existing in arb_beer()) {
            let input = BeerDto {
                beer_name: Field::Null,
                beer_style: Field::Null,
                upc: Field::Null,
                quantity_on_hand: Field::Null,
                price: Field::Null,
                ..BeerDto::default()
            };
            let next = Beer::reconcile_patch(&existing, &input).unwrap();
            prop_assert_eq!(next, existing);
        }

        #[test]
        fn patch_single_field_changes_only_that_field(
            existing in arb_beer(),
            upc in "[0-9]{1,25}",
        ) {
            let input = BeerDto { upc: Field::Value(upc.clone()), ..BeerDto::default() };
            let next = Beer::reconcile_patch(&existing, &input).unwrap();

            let expected = Beer::new(
                existing.beer_name().to_string(),
                existing.beer_style().map(str::to_string),
                Some(upc),
                existing.quantity_on_hand(),
                existing.price(),
            )
            .with_identity(existing.id().unwrap(), existing.audit());
            prop_assert_eq!(next, expected);
        }

        #[test]
        fn customer_patch_with_empty_input_is_identity(name in name_strategy()) {
            let existing = Customer::new(name)
                .with_identity(EntityId::new(3).unwrap(), Audit::inserted_at(Utc::now()));
            let next = Customer::reconcile_patch(&existing, &CustomerDto::default()).unwrap();
            prop_assert_eq!(next, existing);
        }
    }

    #[test]
    fn replace_resets_absent_fields() {
        let existing = stored_beer(
            "Galaxy Cat".into(),
            Some("Pale Ale".into()),
            Some("12346".into()),
            Some(454),
            Some(1299),
        );
        let input = BeerDto {
            beer_name: Field::Value("Galaxy Dog".into()),
            ..BeerDto::default()
        };

        let next = Beer::reconcile_replace(&existing, &input).unwrap();
        assert_eq!(next.beer_name(), "Galaxy Dog");
        assert_eq!(next.beer_style(), None);
        assert_eq!(next.upc(), None);
        assert_eq!(next.quantity_on_hand(), None);
        assert_eq!(next.price(), None);
        assert_eq!(next.id(), existing.id());
    }

    #[test]
    fn patch_price_keeps_name() {
        let existing = stored_beer(
            "Cranky Pants".into(),
            Some("Pale Ale".into()),
            Some("129686".into()),
            Some(84),
            Some(1199),
        );
        let input: BeerDto = serde_json::from_str(r#"{"price": 9.99}"#).unwrap();

        let next = Beer::reconcile_patch(&existing, &input).unwrap();
        assert_eq!(next.price(), Some(Price::from_minor_units(999).unwrap()));
        assert_eq!(next.beer_name(), "Cranky Pants");
        assert_eq!(next.quantity_on_hand(), Some(84));
    }

    #[test]
    fn unparsable_quantity_aborts_replace_and_patch() {
        let existing = stored_beer("Galaxy Cat".into(), None, None, Some(454), None);
        let input = BeerDto {
            beer_name: Field::Value("Galaxy Cat".into()),
            quantity_on_hand: Field::Value(NumericText::text("plenty")),
            ..BeerDto::default()
        };

        assert!(matches!(
            Beer::reconcile_replace(&existing, &input),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Beer::reconcile_patch(&existing, &input),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn create_leaves_identity_unset() {
        let input = BeerDto {
            beer_name: Field::Value("Sunshine City".into()),
            beer_style: Field::Value("IPA".into()),
            upc: Field::Value("129816".into()),
            quantity_on_hand: Field::Value(NumericText::text("94")),
            price: Field::Value(NumericText::text("14.99")),
            ..BeerDto::default()
        };

        let beer = Beer::reconcile_create(&input).unwrap();
        assert_eq!(beer.id(), None);
        assert_eq!(beer.audit(), Audit::default());
        assert_eq!(beer.quantity_on_hand(), Some(94));
    }

    #[test]
    fn customer_replace_and_patch_carry_identity() {
        let audit = Audit::inserted_at(Utc::now());
        let existing = Customer::new("John Doe".into()).with_identity(EntityId::new(1).unwrap(), audit);

        let input = CustomerDto {
            customer_name: Field::Value("Jane Smith".into()),
            ..CustomerDto::default()
        };
        let replaced = Customer::reconcile_replace(&existing, &input).unwrap();
        assert_eq!(replaced.customer_name(), "Jane Smith");
        assert_eq!(replaced.id(), existing.id());
        assert_eq!(replaced.audit(), audit);

        let patched = Customer::reconcile_patch(&existing, &input).unwrap();
        assert_eq!(patched, replaced);
    }
}
