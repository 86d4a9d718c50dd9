use crate::config::PartnersConfig;
use crate::core::catalog::StreamDefinition;
use crate::core::query::QueryBuilder;
use crate::core::shape::lookup;
use crate::domain::model::{Page, Record};
use crate::domain::ports::GraphqlTransport;
use crate::utils::error::{EtlError, Result};
use futures::Stream;
use serde::Deserialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Fetching { after: Option<String> },
    Done,
}

/// Pulls one stream's records page by page.
///
/// Pages are fetched strictly in order and only when the buffered edges of
/// the previous page have been consumed, so dropping the driver between
/// records never leaves a request in flight. Each node is mapped when it is
/// pulled. Errors are returned as-is: there are no retries at this layer and
/// the driver is finished after one.
pub struct PaginationDriver<'a, T: GraphqlTransport> {
    definition: &'a StreamDefinition,
    transport: &'a T,
    builder: QueryBuilder,
    page_size: u32,
    state: State,
    buffer: VecDeque<serde_json::Value>,
    pages_fetched: usize,
}

impl<'a, T: GraphqlTransport> PaginationDriver<'a, T> {
    pub fn new(definition: &'a StreamDefinition, config: &PartnersConfig, transport: &'a T) -> Self {
        Self {
            definition,
            transport,
            builder: QueryBuilder::new(config.app_gid()),
            page_size: config.num_results_per_call,
            state: State::Fetching { after: None },
            buffer: VecDeque::new(),
            pages_fetched: 0,
        }
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Next record, fetching another page when the buffer runs dry.
    /// `Ok(None)` once the server reports no further page.
    pub async fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            if let Some(node) = self.buffer.pop_front() {
                return match self.definition.shape.map(&node) {
                    Ok(record) => Ok(Some(record)),
                    Err(e) => {
                        self.buffer.clear();
                        self.state = State::Done;
                        Err(e)
                    }
                };
            }

            let after = match &self.state {
                State::Fetching { after } => after.clone(),
                State::Done => return Ok(None),
            };

            // 失敗後不再發出請求
            self.state = State::Done;
            let page = self.fetch_page(after.as_deref()).await?;
            self.state = self.next_state(&page)?;
            self.buffer.extend(page.edges.into_iter().map(|edge| edge.node));
        }
    }

    async fn fetch_page(&mut self, after: Option<&str>) -> Result<Page> {
        let request = self
            .builder
            .build(&self.definition.target, self.page_size, after);
        let body = self.transport.post(&request).await?;
        self.pages_fetched += 1;

        let page = decode_page(&body, self.definition.target.connection_path())?;
        tracing::debug!(
            "📄 {}: page {} has {} edges (hasNextPage: {})",
            self.definition.name,
            self.pages_fetched,
            page.edges.len(),
            page.page_info.has_next_page
        );
        Ok(page)
    }

    fn next_state(&self, page: &Page) -> Result<State> {
        if !page.page_info.has_next_page {
            return Ok(State::Done);
        }

        match page.edges.last() {
            Some(edge) => match &edge.cursor {
                Some(cursor) => {
                    tracing::debug!("➡️ {}: next cursor {}", self.definition.name, cursor);
                    Ok(State::Fetching {
                        after: Some(cursor.clone()),
                    })
                }
                None => Err(EtlError::MissingFieldError {
                    path: format!(
                        "{}.edges.cursor",
                        self.definition.target.connection_path().join(".")
                    ),
                }),
            },
            None => {
                tracing::warn!(
                    "⚠️ {}: page {} reports hasNextPage but has no edges; stopping",
                    self.definition.name,
                    self.pages_fetched
                );
                Ok(State::Done)
            }
        }
    }

    /// Drains the remaining records into a vector.
    pub async fn collect(mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// The same lazy sequence as a `Stream`; it ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Record>> + 'a {
        futures::stream::try_unfold(self, |mut driver| async move {
            let next = driver.next_record().await?;
            Ok(next.map(|record| (record, driver)))
        })
    }
}

/// Decodes the `{ pageInfo, edges }` connection at `path`, surfacing GraphQL
/// `errors` before any path lookup.
pub fn decode_page(body: &serde_json::Value, path: &[&str]) -> Result<Page> {
    if let Some(errors) = body.get("errors").and_then(|e| e.as_array()) {
        if !errors.is_empty() {
            let messages = errors
                .iter()
                .map(|error| {
                    error
                        .get("message")
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                        .unwrap_or_else(|| error.to_string())
                })
                .collect();
            return Err(EtlError::GraphqlError { messages });
        }
    }

    let connection = lookup(body, path)?;
    lookup(connection, &["pageInfo", "hasNextPage"]).map_err(|_| EtlError::MissingFieldError {
        path: format!("{}.pageInfo.hasNextPage", path.join(".")),
    })?;
    lookup(connection, &["edges"]).map_err(|_| EtlError::MissingFieldError {
        path: format!("{}.edges", path.join(".")),
    })?;

    Ok(Page::deserialize(connection)?)
}
