use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taproom_core::{Audit, DomainResult, Entity, EntityId};

use crate::field::Field;
use crate::numeric::{NumericText, Price};
use crate::reconcile::{self, Operation, Resource};
use crate::validation::Violations;

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 255;
const STYLE_MAX: usize = 255;
const UPC_MAX: usize = 25;

/// Persisted beer record.
///
/// Immutable: every change goes through reconciliation and yields a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beer {
    id: Option<EntityId>,
    beer_name: String,
    beer_style: Option<String>,
    upc: Option<String>,
    quantity_on_hand: Option<i32>,
    price: Option<Price>,
    audit: Audit,
}

impl Beer {
    /// Unsaved beer (no id, no audit stamps).
    pub fn new(
        beer_name: String,
        beer_style: Option<String>,
        upc: Option<String>,
        quantity_on_hand: Option<i32>,
        price: Option<Price>,
    ) -> Self {
        Self {
            id: None,
            beer_name,
            beer_style,
            upc,
            quantity_on_hand,
            price,
            audit: Audit::default(),
        }
    }

    pub fn beer_name(&self) -> &str {
        &self.beer_name
    }

    pub fn beer_style(&self) -> Option<&str> {
        self.beer_style.as_deref()
    }

    pub fn upc(&self) -> Option<&str> {
        self.upc.as_deref()
    }

    pub fn quantity_on_hand(&self) -> Option<i32> {
        self.quantity_on_hand
    }

    pub fn price(&self) -> Option<Price> {
        self.price
    }

    /// Rebuild with new domain fields, keeping identity and audit.
    fn rebuilt(&self, next: Beer) -> Beer {
        Beer {
            id: self.id,
            audit: self.audit,
            ..next
        }
    }
}

impl Entity for Beer {
    const KIND: &'static str = "beer";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn audit(&self) -> Audit {
        self.audit
    }

    fn with_identity(self, id: EntityId, audit: Audit) -> Self {
        Self {
            id: Some(id),
            audit,
            ..self
        }
    }
}

/// Beer transfer representation.
///
/// Every domain field is optional so the same shape serves create, replace
/// and sparse patch bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub beer_name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub beer_style: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub upc: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub quantity_on_hand: Field<NumericText>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub price: Field<NumericText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl BeerDto {
    /// Body carrying only a name (handy for validation checks).
    pub fn named(beer_name: impl Into<String>) -> Self {
        Self {
            beer_name: Field::Value(beer_name.into()),
            ..Self::default()
        }
    }
}

impl Resource for Beer {
    type Dto = BeerDto;

    fn validate(input: &BeerDto, op: Operation) -> DomainResult<()> {
        let mut v = Violations::new();

        match op {
            Operation::Create | Operation::Replace => {
                v.required_text("beerName", &input.beer_name, NAME_MIN, NAME_MAX)
            }
            Operation::Patch => {
                v.optional_non_blank_text("beerName", &input.beer_name, NAME_MIN, NAME_MAX)
            }
        }
        v.optional_text("beerStyle", &input.beer_style, 1, STYLE_MAX);
        v.optional_text("upc", &input.upc, 0, UPC_MAX);

        if op == Operation::Create {
            v.required_present("upc", &input.upc);
            v.required_present("quantityOnHand", &input.quantity_on_hand);
            v.required_present("price", &input.price);
        }

        if let Some(raw) = input.quantity_on_hand.as_option() {
            v.check(raw.to_quantity("quantityOnHand"));
        }
        if let Some(raw) = input.price.as_option() {
            v.check(raw.to_price("price"));
        }

        v.into_result()
    }

    fn reconcile_create(input: &BeerDto) -> DomainResult<Beer> {
        Ok(Beer::new(
            reconcile::replaced(&input.beer_name).unwrap_or_default(),
            reconcile::replaced(&input.beer_style),
            reconcile::replaced(&input.upc),
            reconcile::replaced_numeric(&input.quantity_on_hand, |q| q.to_quantity("quantityOnHand"))?,
            reconcile::replaced_numeric(&input.price, |p| p.to_price("price"))?,
        ))
    }

    fn reconcile_replace(existing: &Beer, input: &BeerDto) -> DomainResult<Beer> {
        let next = Beer::reconcile_create(input)?;
        Ok(existing.rebuilt(next))
    }

    fn reconcile_patch(existing: &Beer, input: &BeerDto) -> DomainResult<Beer> {
        let quantity_on_hand = reconcile::patched_numeric(
            &input.quantity_on_hand,
            &existing.quantity_on_hand,
            |q| q.to_quantity("quantityOnHand"),
        )?;
        let price = reconcile::patched_numeric(&input.price, &existing.price, |p| p.to_price("price"))?;

        let next = Beer::new(
            input
                .beer_name
                .as_option()
                .cloned()
                .unwrap_or_else(|| existing.beer_name.clone()),
            reconcile::patched(&input.beer_style, &existing.beer_style),
            reconcile::patched(&input.upc, &existing.upc),
            quantity_on_hand,
            price,
        );
        Ok(existing.rebuilt(next))
    }

    fn dto_id(dto: &BeerDto) -> Option<EntityId> {
        dto.id
    }

    fn to_dto(&self) -> BeerDto {
        BeerDto {
            id: self.id,
            beer_name: Field::Value(self.beer_name.clone()),
            beer_style: self.beer_style.clone().into(),
            upc: self.upc.clone().into(),
            quantity_on_hand: self.quantity_on_hand.map(|q| NumericText::text(q.to_string())).into(),
            price: self
                .price
                .and_then(|p| p.to_json_number())
                .map(NumericText::Number)
                .into(),
            created_date: self.audit.created_date,
            last_modified_date: self.audit.last_modified_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taproom_core::DomainError;

    fn full_body() -> BeerDto {
        serde_json::from_value(serde_json::json!({
            "beerName": "Galaxy Cat",
            "beerStyle": "Pale Ale",
            "upc": "12346",
            "quantityOnHand": 454,
            "price": 12.99
        }))
        .unwrap()
    }

    #[test]
    fn full_create_body_is_valid() {
        assert!(Beer::validate(&full_body(), Operation::Create).is_ok());
    }

    #[test]
    fn create_requires_name_upc_quantity_and_price() {
        let err = Beer::validate(&BeerDto::named(""), Operation::Create).unwrap_err();
        let DomainError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains("beerName"));
        assert!(msg.contains("upc: is required"));
        assert!(msg.contains("quantityOnHand: is required"));
        assert!(msg.contains("price: is required"));
    }

    #[test]
    fn replace_requires_only_the_name() {
        assert!(Beer::validate(&BeerDto::named("Galaxy Dog"), Operation::Replace).is_ok());
        assert!(Beer::validate(&BeerDto::named(""), Operation::Replace).is_err());
        assert!(Beer::validate(&BeerDto::named("ab"), Operation::Replace).is_err());
    }

    #[test]
    fn patch_checks_only_present_fields() {
        assert!(Beer::validate(&BeerDto::default(), Operation::Patch).is_ok());

        let too_long_upc = BeerDto {
            upc: Field::Value("1".repeat(26)),
            ..BeerDto::default()
        };
        assert!(Beer::validate(&too_long_upc, Operation::Patch).is_err());

        let bad_quantity: BeerDto = serde_json::from_str(r#"{"quantityOnHand": "many"}"#).unwrap();
        assert!(Beer::validate(&bad_quantity, Operation::Patch).is_err());
    }

    #[test]
    fn whitespace_style_is_allowed_but_blank_patch_name_is_not() {
        let spaced_style = BeerDto {
            beer_style: Field::Value(" ".into()),
            ..BeerDto::named("Galaxy Cat")
        };
        assert!(Beer::validate(&spaced_style, Operation::Replace).is_ok());
        assert!(Beer::validate(&spaced_style, Operation::Patch).is_ok());

        let blank_name = BeerDto::named("    ");
        let err = Beer::validate(&blank_name, Operation::Patch).unwrap_err();
        assert_eq!(err, DomainError::validation("beerName: must not be blank"));
    }

    #[test]
    fn dto_uses_camel_case_and_string_quantity() {
        let beer = Beer::reconcile_create(&full_body())
            .unwrap()
            .with_identity(EntityId::new(1).unwrap(), Audit::default());

        let json = serde_json::to_value(beer.to_dto()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["beerName"], "Galaxy Cat");
        assert_eq!(json["beerStyle"], "Pale Ale");
        assert_eq!(json["upc"], "12346");
        assert_eq!(json["quantityOnHand"], "454");
        assert_eq!(json["price"], 12.99);
        assert!(json.get("createdDate").is_none());
    }

    #[test]
    fn unset_fields_render_as_null() {
        let beer = Beer::new("Galaxy Cat".into(), None, None, None, None);
        let json = serde_json::to_value(beer.to_dto()).unwrap();
        assert!(json["beerStyle"].is_null());
        assert!(json["price"].is_null());
        assert!(json.get("id").is_none());
    }
}
