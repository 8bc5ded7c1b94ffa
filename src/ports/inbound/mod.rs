/// Inbound ports (Driving ports) - Use case interfaces
///
/// These ports define the interfaces that external adapters (e.g., CLI)
/// use to interact with the application core.
pub mod metric_collection_port;

pub use metric_collection_port::MetricCollectionPort;
