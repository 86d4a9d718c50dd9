use serde::{Deserialize, Serialize};

/// One reshaped, pipeline-facing record. Keys are kept sorted so JSON Lines
/// output is stable between runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }
}

/// GraphQL request body: `{"query": ..., "variables": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub variables: QueryVariables,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryVariables {
    #[serde(rename = "appId")]
    pub app_id: String,
    pub first: u32,
    // `after` 第一頁必須送出 null，不可省略
    pub after: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Edge {
    // 只有最後一個 edge 的 cursor 會被用到
    #[serde(default)]
    pub cursor: Option<String>,
    pub node: serde_json::Value,
}

/// A decoded connection: `{ pageInfo, edges }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_info: PageInfo,
    pub edges: Vec<Edge>,
}

impl Page {
    /// Cursor for the following request, taken from the last edge of this page.
    /// `None` when the page is terminal, empty, or its last edge has no cursor.
    pub fn next_cursor(&self) -> Option<&str> {
        if !self.page_info.has_next_page {
            return None;
        }
        self.edges.last().and_then(|edge| edge.cursor.as_deref())
    }
}

/// Records extracted for one stream, plus the error that stopped it, if any.
#[derive(Debug, Clone)]
pub struct StreamBatch {
    pub stream: String,
    pub primary_key: Option<String>,
    pub records: Vec<Record>,
    pub error: Option<String>,
}

impl StreamBatch {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub batches: Vec<StreamBatch>,
    /// (file name, JSON Lines content) per stream
    pub jsonl_outputs: Vec<(String, String)>,
    pub manifest: serde_json::Value,
}

impl TransformResult {
    pub fn failed_streams(&self) -> Vec<String> {
        self.batches
            .iter()
            .filter(|batch| batch.is_failed())
            .map(|batch| batch.stream.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_serializes_null_after() {
        let request = QueryRequest {
            query: "query {}".to_string(),
            variables: QueryVariables {
                app_id: "gid://partners/App/1".to_string(),
                first: 10,
                after: None,
            },
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "query": "query {}",
                "variables": {"appId": "gid://partners/App/1", "first": 10, "after": null}
            })
        );
    }

    #[test]
    fn test_next_cursor_uses_last_edge() {
        let page: Page = serde_json::from_value(json!({
            "pageInfo": {"hasNextPage": true, "hasPreviousPage": false},
            "edges": [
                {"cursor": "c0", "node": {}},
                {"cursor": "c1", "node": {}}
            ]
        }))
        .unwrap();

        assert_eq!(page.next_cursor(), Some("c1"));
    }

    #[test]
    fn test_next_cursor_none_on_terminal_or_empty_page() {
        let terminal: Page = serde_json::from_value(json!({
            "pageInfo": {"hasNextPage": false, "hasPreviousPage": true},
            "edges": [{"cursor": "c9", "node": {}}]
        }))
        .unwrap();
        let empty: Page = serde_json::from_value(json!({
            "pageInfo": {"hasNextPage": true, "hasPreviousPage": false},
            "edges": []
        }))
        .unwrap();

        assert_eq!(terminal.next_cursor(), None);
        assert_eq!(empty.next_cursor(), None);
    }

    #[test]
    fn test_page_decodes_without_inner_cursors_or_previous_flag() {
        let page: Page = serde_json::from_value(json!({
            "pageInfo": {"hasNextPage": true},
            "edges": [
                {"node": {"id": 1}},
                {"cursor": "c1", "node": {"id": 2}}
            ]
        }))
        .unwrap();

        assert!(!page.page_info.has_previous_page);
        assert_eq!(page.edges[0].cursor, None);
        assert_eq!(page.next_cursor(), Some("c1"));
    }
}
