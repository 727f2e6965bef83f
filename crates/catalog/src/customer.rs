use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taproom_core::{Audit, DomainResult, Entity, EntityId};

use crate::field::Field;
use crate::reconcile::{Operation, Resource};
use crate::validation::Violations;

const NAME_MAX: usize = 255;

/// Persisted customer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: Option<EntityId>,
    customer_name: String,
    audit: Audit,
}

impl Customer {
    pub fn new(customer_name: String) -> Self {
        Self {
            id: None,
            customer_name,
            audit: Audit::default(),
        }
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }
}

impl Entity for Customer {
    const KIND: &'static str = "customer";

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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub customer_name: Field<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl CustomerDto {
    pub fn named(customer_name: impl Into<String>) -> Self {
        Self {
            customer_name: Field::Value(customer_name.into()),
            ..Self::default()
        }
    }
}

impl Resource for Customer {
    type Dto = CustomerDto;

    fn validate(input: &CustomerDto, op: Operation) -> DomainResult<()> {
        let mut v = Violations::new();
        match op {
            Operation::Create | Operation::Replace => {
                v.required_text("customerName", &input.customer_name, 1, NAME_MAX)
            }
            Operation::Patch => {
                v.optional_non_blank_text("customerName", &input.customer_name, 1, NAME_MAX)
            }
        }
        v.into_result()
    }

    fn reconcile_create(input: &CustomerDto) -> DomainResult<Customer> {
        Ok(Customer::new(
            input.customer_name.as_option().cloned().unwrap_or_default(),
        ))
    }

    fn reconcile_replace(existing: &Customer, input: &CustomerDto) -> DomainResult<Customer> {
        Ok(Customer {
            id: existing.id,
            audit: existing.audit,
            ..Customer::reconcile_create(input)?
        })
    }

    fn reconcile_patch(existing: &Customer, input: &CustomerDto) -> DomainResult<Customer> {
        let customer_name = input
            .customer_name
            .as_option()
            .cloned()
            .unwrap_or_else(|| existing.customer_name.clone());

        Ok(Customer {
            id: existing.id,
            customer_name,
            audit: existing.audit,
        })
    }

    fn dto_id(dto: &CustomerDto) -> Option<EntityId> {
        dto.id
    }

    fn to_dto(&self) -> CustomerDto {
        CustomerDto {
            id: self.id,
            customer_name: Field::Value(self.customer_name.clone()),
            created_date: self.audit.created_date,
            last_modified_date: self.audit.last_modified_date,
        }
    }
}
