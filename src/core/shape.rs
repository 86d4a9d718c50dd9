use crate::config::RecordLayout;
use crate::domain::model::Record;
use crate::utils::error::{EtlError, Result};
use serde_json::{Map, Value};
use std::fmt;

/// Follows `path` from `value`, failing with the dotted path of the first
/// missing key. `null` counts as present.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let mut current = value;
    for (depth, key) in path.iter().enumerate() {
        current = current
            .get(*key)
            .ok_or_else(|| EtlError::MissingFieldError {
                path: path[..=depth].join("."),
            })?;
    }
    Ok(current)
}

/// How one edge node is reshaped into an output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// type, occurredAt, app, shop
    Relationship(RecordLayout),
    /// Relationship fields plus flattened `app_credit_*`, read from `charge`.
    Credit,
    /// Relationship fields plus the charge, flattened as `charge_*` or nested.
    SubscriptionWithCost(RecordLayout),
    /// createdAt, id
    Transaction,
}

impl fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseShape::Relationship(RecordLayout::Flat) => "relationship",
            ResponseShape::Relationship(RecordLayout::Nested) => "relationship (nested)",
            ResponseShape::Credit => "credit",
            ResponseShape::SubscriptionWithCost(RecordLayout::Flat) => "subscription",
            ResponseShape::SubscriptionWithCost(RecordLayout::Nested) => "subscription (nested)",
            ResponseShape::Transaction => "transaction",
        };
        f.write_str(name)
    }
}

struct RecordBuilder<'a> {
    node: &'a Value,
    data: Map<String, Value>,
}

impl<'a> RecordBuilder<'a> {
    fn new(node: &'a Value) -> Self {
        Self {
            node,
            data: Map::new(),
        }
    }

    fn copy(mut self, field: &str, path: &[&str]) -> Result<Self> {
        let value = lookup(self.node, path)?.clone();
        self.data.insert(field.to_string(), value);
        Ok(self)
    }

    /// `{ key: { sub: node[path..sub] } }`
    fn nest(mut self, field: &str, path: &[&str], keys: &[&str]) -> Result<Self> {
        let parent = lookup(self.node, path)?;
        let mut object = Map::new();
        for key in keys {
            let value = lookup(parent, &[*key]).map_err(|_| EtlError::MissingFieldError {
                path: format!("{}.{}", path.join("."), key),
            })?;
            object.insert(key.to_string(), value.clone());
        }
        self.data.insert(field.to_string(), Value::Object(object));
        Ok(self)
    }

    fn finish(self) -> Record {
        Record { data: self.data }
    }
}

impl ResponseShape {
    pub fn map(&self, node: &Value) -> Result<Record> {
        match self {
            ResponseShape::Relationship(RecordLayout::Flat) => {
                Ok(flat_event(node, "event_type")?.finish())
            }
            ResponseShape::Relationship(RecordLayout::Nested) => Ok(nested_event(node)?.finish()),
            ResponseShape::Credit => Ok(flat_event(node, "type")?
                // Partner API 只在 AppSubscriptionEvent 上回傳 charge；
                // credit 事件的 appCredit 不會被讀取
                .copy("app_credit_id", &["charge", "id"])?
                .copy("app_credit_test", &["charge", "test"])?
                .copy("app_credit_name", &["charge", "name"])?
                .copy("app_credit_amount", &["charge", "amount", "amount"])?
                .copy("app_credit_currency_code", &["charge", "amount", "currencyCode"])?
                .finish()),
            ResponseShape::SubscriptionWithCost(RecordLayout::Flat) => Ok(flat_event(node, "type")?
                .copy("charge_id", &["charge", "id"])?
                .copy("charge_test", &["charge", "test"])?
                .copy("charge_name", &["charge", "name"])?
                .copy("charge_billingOn", &["charge", "billingOn"])?
                .copy("charge_amount", &["charge", "amount"])?
                .finish()),
            ResponseShape::SubscriptionWithCost(RecordLayout::Nested) => Ok(nested_event(node)?
                .nest(
                    "charge",
                    &["charge"],
                    &["id", "test", "name", "billingOn", "amount"],
                )?
                .finish()),
            ResponseShape::Transaction => Ok(RecordBuilder::new(node)
                .copy("createdAt", &["createdAt"])?
                .copy("id", &["id"])?
                .finish()),
        }
    }
}

fn flat_event<'a>(node: &'a Value, type_field: &str) -> Result<RecordBuilder<'a>> {
    RecordBuilder::new(node)
        .copy(type_field, &["type"])?
        .copy("occurredAt", &["occurredAt"])?
        .copy("app_id", &["app", "id"])?
        .copy("app_name", &["app", "name"])?
        .copy("shop_id", &["shop", "id"])?
        .copy("shop_name", &["shop", "name"])
}

fn nested_event(node: &Value) -> Result<RecordBuilder<'_>> {
    RecordBuilder::new(node)
        .copy("type", &["type"])?
        .copy("occurredAt", &["occurredAt"])?
        .nest("app", &["app"], &["id", "name"])?
        .nest("shop", &["shop"], &["id", "name"])
}
