use crate::domain::event_type::EventType;
use crate::domain::model::{QueryRequest, QueryVariables};
use std::fmt;

/// Which Partner API connection a stream pages through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    /// `app(id:) { events(types: [...]) }`
    Events(Vec<EventType>),
    /// `transactions(appId:)`
    Transactions,
}

impl QueryTarget {
    pub fn event(event_type: EventType) -> Self {
        QueryTarget::Events(vec![event_type])
    }

    /// Path from the response root to the `{ pageInfo, edges }` object.
    pub fn connection_path(&self) -> &'static [&'static str] {
        match self {
            QueryTarget::Events(_) => &["data", "app", "events"],
            QueryTarget::Transactions => &["data", "transactions"],
        }
    }
}

impl fmt::Display for QueryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryTarget::Events(types) => {
                let names: Vec<&str> = types.iter().map(EventType::as_str).collect();
                write!(f, "events[{}]", names.join(", "))
            }
            QueryTarget::Transactions => f.write_str("transactions"),
        }
    }
}

const TRANSACTIONS_QUERY: &str = r#"
query GetTransactions($appId: ID!, $first: Int!, $after: String) {
  transactions(appId: $appId, first: $first, after: $after) {
    pageInfo {
      hasNextPage
      hasPreviousPage
    }
    edges {
      cursor
      node {
        createdAt
        id
      }
    }
  }
}
"#;

const EVENT_FRAGMENTS: &str = r#"
fragment EventDetails on AppEvent {
  type
  occurredAt
  app {
    ...AppInfo
  }
  shop {
    ...ShopInfo
  }
  ... on AppSubscriptionEvent {
    charge {
      ...ChargeInfo
    }
  }
  ... on AppCreditEvent {
    appCredit {
      ...AppCredit
    }
  }
}

fragment AppInfo on App {
  id
  name
}

fragment ShopInfo on Shop {
  id
  name
}

fragment AppCredit on AppCredit {
  id
  name
  test
}

fragment ChargeInfo on AppSubscription {
  id
  test
  name
  billingOn
  amount {
    amount
    currencyCode
  }
}
"#;

/// Builds GraphQL request bodies for one application.
///
/// Pure: the same target and pagination arguments always produce the same
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    app_gid: String,
}

impl QueryBuilder {
    pub fn new(app_gid: impl Into<String>) -> Self {
        Self {
            app_gid: app_gid.into(),
        }
    }

    pub fn app_gid(&self) -> &str {
        &self.app_gid
    }

    pub fn build(&self, target: &QueryTarget, first: u32, after: Option<&str>) -> QueryRequest {
        let query = match target {
            QueryTarget::Events(types) => Self::event_query(types),
            QueryTarget::Transactions => TRANSACTIONS_QUERY.to_string(),
        };

        QueryRequest {
            query,
            variables: QueryVariables {
                app_id: self.app_gid.clone(),
                first,
                after: after.map(str::to_string),
            },
        }
    }

    // 類型直接嵌入查詢字串；只接受 EventType，外部字串無法進入這裡
    fn event_query(types: &[EventType]) -> String {
        let types_fragment = types
            .iter()
            .map(EventType::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"
query GetAppEvents($appId: ID!, $first: Int!, $after: String) {{
  app(id: $appId) {{
    events(first: $first, after: $after, types: [{types_fragment}]) {{
      pageInfo {{
        hasNextPage
        hasPreviousPage
      }}
      edges {{
        cursor
        node {{
          ...EventDetails
        }}
      }}
    }}
  }}
}}
{EVENT_FRAGMENTS}"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> QueryBuilder {
        QueryBuilder::new("gid://partners/App/42")
    }

    #[test]
    fn test_event_query_embeds_type_filter() {
        let request = builder().build(
            &QueryTarget::event(EventType::SubscriptionChargeFrozen),
            25,
            None,
        );

        assert!(request
            .query
            .contains("types: [SUBSCRIPTION_CHARGE_FROZEN]"));
        assert!(request.query.contains("... on AppSubscriptionEvent"));
        assert!(request.query.contains("... on AppCreditEvent"));
        assert!(request.query.contains("fragment ChargeInfo on AppSubscription"));
        assert_eq!(request.variables.app_id, "gid://partners/App/42");
        assert_eq!(request.variables.first, 25);
        assert_eq!(request.variables.after, None);
    }

    #[test]
    fn test_event_query_accepts_multiple_types() {
        let target = QueryTarget::Events(vec![
            EventType::CreditApplied,
            EventType::CreditFailed,
        ]);
        let request = builder().build(&target, 10, None);

        assert!(request.query.contains("types: [CREDIT_APPLIED, CREDIT_FAILED]"));
    }

    #[test]
    fn test_transactions_query_is_distinct() {
        let request = builder().build(&QueryTarget::Transactions, 10, Some("abc"));

        assert!(request.query.contains("transactions(appId: $appId"));
        assert!(request.query.contains("createdAt"));
        assert!(!request.query.contains("EventDetails"));
        assert_eq!(request.variables.after.as_deref(), Some("abc"));
    }

    #[test]
    fn test_build_is_pure() {
        let target = QueryTarget::event(EventType::RelationshipInstalled);
        let b = builder();

        assert_eq!(b.build(&target, 5, Some("c1")), b.build(&target, 5, Some("c1")));
    }

    #[test]
    fn test_connection_paths() {
        assert_eq!(
            QueryTarget::event(EventType::CreditApplied).connection_path(),
            ["data", "app", "events"]
        );
        assert_eq!(
            QueryTarget::Transactions.connection_path(),
            ["data", "transactions"]
        );
    }
}
