use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Partner API 的 `AppEventTypes` 列舉，只收錄本工具會查詢的類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    RelationshipInstalled,
    RelationshipUninstalled,
    RelationshipReactivated,
    RelationshipDeactivated,
    SubscriptionCappedAmountUpdated,
    SubscriptionApproachingCappedAmount,
    SubscriptionChargeAccepted,
    SubscriptionChargeActivated,
    SubscriptionChargeCanceled,
    SubscriptionChargeDeclined,
    SubscriptionChargeExpired,
    SubscriptionChargeFrozen,
    SubscriptionChargeUnfrozen,
    UsageChargeApplied,
    CreditApplied,
    CreditPending,
    CreditFailed,
    OneTimeChargeAccepted,
    OneTimeChargeActivated,
    OneTimeChargeDeclined,
    OneTimeChargeExpired,
}

impl EventType {
    pub const ALL: [EventType; 21] = [
        EventType::RelationshipInstalled,
        EventType::RelationshipUninstalled,
        EventType::RelationshipReactivated,
        EventType::RelationshipDeactivated,
        EventType::SubscriptionCappedAmountUpdated,
        EventType::SubscriptionApproachingCappedAmount,
        EventType::SubscriptionChargeAccepted,
        EventType::SubscriptionChargeActivated,
        EventType::SubscriptionChargeCanceled,
        EventType::SubscriptionChargeDeclined,
        EventType::SubscriptionChargeExpired,
        EventType::SubscriptionChargeFrozen,
        EventType::SubscriptionChargeUnfrozen,
        EventType::UsageChargeApplied,
        EventType::CreditApplied,
        EventType::CreditPending,
        EventType::CreditFailed,
        EventType::OneTimeChargeAccepted,
        EventType::OneTimeChargeActivated,
        EventType::OneTimeChargeDeclined,
        EventType::OneTimeChargeExpired,
    ];

    /// The enum literal as it appears in a GraphQL `types: [...]` argument.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::RelationshipInstalled => "RELATIONSHIP_INSTALLED",
            EventType::RelationshipUninstalled => "RELATIONSHIP_UNINSTALLED",
            EventType::RelationshipReactivated => "RELATIONSHIP_REACTIVATED",
            EventType::RelationshipDeactivated => "RELATIONSHIP_DEACTIVATED",
            EventType::SubscriptionCappedAmountUpdated => "SUBSCRIPTION_CAPPED_AMOUNT_UPDATED",
            EventType::SubscriptionApproachingCappedAmount => {
                "SUBSCRIPTION_APPROACHING_CAPPED_AMOUNT"
            }
            EventType::SubscriptionChargeAccepted => "SUBSCRIPTION_CHARGE_ACCEPTED",
            EventType::SubscriptionChargeActivated => "SUBSCRIPTION_CHARGE_ACTIVATED",
            EventType::SubscriptionChargeCanceled => "SUBSCRIPTION_CHARGE_CANCELED",
            EventType::SubscriptionChargeDeclined => "SUBSCRIPTION_CHARGE_DECLINED",
            EventType::SubscriptionChargeExpired => "SUBSCRIPTION_CHARGE_EXPIRED",
            EventType::SubscriptionChargeFrozen => "SUBSCRIPTION_CHARGE_FROZEN",
            EventType::SubscriptionChargeUnfrozen => "SUBSCRIPTION_CHARGE_UNFROZEN",
            EventType::UsageChargeApplied => "USAGE_CHARGE_APPLIED",
            EventType::CreditApplied => "CREDIT_APPLIED",
            EventType::CreditPending => "CREDIT_PENDING",
            EventType::CreditFailed => "CREDIT_FAILED",
            EventType::OneTimeChargeAccepted => "ONE_TIME_CHARGE_ACCEPTED",
            EventType::OneTimeChargeActivated => "ONE_TIME_CHARGE_ACTIVATED",
            EventType::OneTimeChargeDeclined => "ONE_TIME_CHARGE_DECLINED",
            EventType::OneTimeChargeExpired => "ONE_TIME_CHARGE_EXPIRED",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|event_type| event_type.as_str() == s)
            .ok_or_else(|| format!("unknown event type: {}", s))
    }
}
