pub mod catalog;
pub mod etl;
pub mod paginator;
pub mod pipeline;
pub mod probe;
pub mod query;
pub mod shape;

pub use crate::domain::model::{Record, StreamBatch, TransformResult};
pub use crate::domain::ports::{GraphqlTransport, Pipeline, Storage};
pub use crate::utils::error::Result;
