use crate::config::{PartnersConfig, RecordLayout};
use crate::core::query::QueryTarget;
use crate::core::shape::ResponseShape;
use crate::domain::event_type::EventType;

/// Declarative description of one output stream. Built once per sync, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDefinition {
    pub name: &'static str,
    pub target: QueryTarget,
    pub shape: ResponseShape,
    pub primary_key: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Relationship,
    Subscription,
    Credit,
}

/// (stream name, event type, response family), in sync order
const EVENT_STREAMS: [(&str, EventType, Family); 21] = [
    ("relationship_installs", EventType::RelationshipInstalled, Family::Relationship),
    ("relationship_uninstalls", EventType::RelationshipUninstalled, Family::Relationship),
    ("relationship_reactivated", EventType::RelationshipReactivated, Family::Relationship),
    ("relationship_deactivated", EventType::RelationshipDeactivated, Family::Relationship),
    ("subscription_capped_amount_updated", EventType::SubscriptionCappedAmountUpdated, Family::Subscription),
    ("subscription_approaching_capped_amount", EventType::SubscriptionApproachingCappedAmount, Family::Subscription),
    ("subscription_charge_accepted", EventType::SubscriptionChargeAccepted, Family::Subscription),
    ("subscription_charge_activated", EventType::SubscriptionChargeActivated, Family::Subscription),
    ("subscription_charge_canceled", EventType::SubscriptionChargeCanceled, Family::Subscription),
    ("subscription_charge_declined", EventType::SubscriptionChargeDeclined, Family::Subscription),
    ("subscription_charge_expired", EventType::SubscriptionChargeExpired, Family::Subscription),
    ("subscription_charge_frozen", EventType::SubscriptionChargeFrozen, Family::Subscription),
    ("subscription_charge_unfrozen", EventType::SubscriptionChargeUnfrozen, Family::Subscription),
    ("usage_charge_applied", EventType::UsageChargeApplied, Family::Subscription),
    ("credit_applied", EventType::CreditApplied, Family::Credit),
    ("credit_pending", EventType::CreditPending, Family::Credit),
    ("credit_failed", EventType::CreditFailed, Family::Credit),
    ("one_time_charge_accepted", EventType::OneTimeChargeAccepted, Family::Subscription),
    ("one_time_charge_activated", EventType::OneTimeChargeActivated, Family::Subscription),
    ("one_time_charge_declined", EventType::OneTimeChargeDeclined, Family::Subscription),
    ("one_time_charge_expired", EventType::OneTimeChargeExpired, Family::Subscription),
];

const TRANSACTIONS_STREAM: &str = "all_transactions";

/// The fixed set of streams this connector exposes.
pub struct StreamCatalog;

impl StreamCatalog {
    pub const STREAM_COUNT: usize = EVENT_STREAMS.len() + 1;

    /// All stream definitions in sync order. The record layout decides between
    /// flat records without a primary key and nested records keyed on `occurredAt`.
    pub fn list_streams(config: &PartnersConfig) -> Vec<StreamDefinition> {
        let layout = config.record_layout;
        let nested_key = match layout {
            RecordLayout::Flat => None,
            RecordLayout::Nested => Some("occurredAt"),
        };

        let mut streams: Vec<StreamDefinition> = EVENT_STREAMS
            .iter()
            .map(|&(name, event_type, family)| {
                let (shape, primary_key) = match family {
                    Family::Relationship => (ResponseShape::Relationship(layout), nested_key),
                    Family::Subscription => {
                        (ResponseShape::SubscriptionWithCost(layout), nested_key)
                    }
                    Family::Credit => (ResponseShape::Credit, None),
                };
                StreamDefinition {
                    name,
                    target: QueryTarget::event(event_type),
                    shape,
                    primary_key,
                }
            })
            .collect();

        streams.push(StreamDefinition {
            name: TRANSACTIONS_STREAM,
            target: QueryTarget::Transactions,
            shape: ResponseShape::Transaction,
            primary_key: None,
        });

        streams
    }

    /// Streams filtered to `names`, keeping catalog order. `None` selects everything.
    pub fn select(config: &PartnersConfig, names: Option<&[String]>) -> Vec<StreamDefinition> {
        let streams = Self::list_streams(config);
        match names {
            Some(names) if !names.is_empty() => streams
                .into_iter()
                .filter(|stream| names.iter().any(|name| name == stream.name))
                .collect(),
            _ => streams,
        }
    }

    pub fn names() -> Vec<&'static str> {
        EVENT_STREAMS
            .iter()
            .map(|(name, _, _)| *name)
            .chain(std::iter::once(TRANSACTIONS_STREAM))
            .collect()
    }
}
