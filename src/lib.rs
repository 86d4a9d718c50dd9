pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{LocalStorage, PartnersClient};
pub use config::{toml_config::TomlConfig, PartnersConfig, RecordLayout};
pub use core::{
    catalog::{StreamCatalog, StreamDefinition},
    etl::EtlEngine,
    paginator::PaginationDriver,
    pipeline::PartnersPipeline,
    probe::{CheckStatus, ConnectionProbe},
    query::{QueryBuilder, QueryTarget},
    shape::ResponseShape,
};
pub use domain::event_type::EventType;
pub use domain::model::Record;
pub use utils::error::{EtlError, Result};
