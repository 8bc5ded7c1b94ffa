//! jmx-collector - concurrent JMX metric collection through a Nailgun helper
//!
//! This library collects management-bean metrics from a fleet of application
//! server domains. Bean queries run inside a long-lived helper JVM reached
//! over the Nailgun protocol, and a worker pool drives many domains at once.
//! Raw bean samples are reduced to metrics according to a per-domain-type
//! catalog of definitions.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`collection`): Domain model, policies, catalog and aggregation
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Filesystem readers, Nailgun helper, console output
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use jmx_collector::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run(settings: CollectorSettings) -> Result<()> {
//! let collector = MetricsCollector::start(
//!     settings.collector_options(),
//!     FileSystemReader::new(),
//!     FileSystemReader::new(),
//!     NailgunHelper::new(settings.launch_config()?),
//!     Arc::new(settings.client()),
//!     Arc::new(StderrProgressReporter::new()),
//! )
//! .await?;
//!
//! let response = collector.collect().await?;
//! println!("{}", serde_json::to_string_pretty(&response.results)?);
//!
//! collector.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod collection;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::nailgun::{HelperAddress, NailgunClient, NailgunHelper};
    pub use crate::application::dto::{CollectionResponse, CollectorOptions, PlannedJob};
    pub use crate::application::use_cases::{
        plan_cycle, CollectMetricsUseCase, MetricsCollector, WorkerPool,
    };
    pub use crate::collection::domain::{
        AggregationKind, CollectionResult, CollectionStatus, Domain, DomainType, MetricDefinition,
        MetricValue,
    };
    pub use crate::collection::policies::PolicySet;
    pub use crate::collection::services::{MetricAggregator, MetricCatalog};
    pub use crate::config::CollectorSettings;
    pub use crate::ports::inbound::MetricCollectionPort;
    pub use crate::ports::outbound::{
        BeanQuery, BeanQueryExecutor, HelperLifecycle, HelperState, InventoryReader,
        MetricDefinitionReader, OutputPresenter, ProgressReporter,
    };
    pub use crate::shared::error::CollectorError;
    pub use crate::shared::Result;
}
