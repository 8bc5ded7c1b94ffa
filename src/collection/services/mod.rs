mod aggregation_engine;
mod bean_pattern;
mod connector_url;
mod metric_catalog;
mod reply_decoder;

pub use aggregation_engine::{DerivedLoadMetric, MetricAggregator};
pub use bean_pattern::BeanPattern;
pub use connector_url::connector_url;
pub use metric_catalog::{CatalogSources, CatalogStore, MetricCatalog};
pub use reply_decoder::decode_reply;
