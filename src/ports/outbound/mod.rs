/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the collection core uses
/// to interact with external systems (file system, helper process, console).
pub mod bean_query_executor;
pub mod definition_reader;
pub mod helper_lifecycle;
pub mod inventory_reader;
pub mod output_presenter;
pub mod progress_reporter;

pub use bean_query_executor::{BeanQuery, BeanQueryExecutor};
pub use definition_reader::MetricDefinitionReader;
pub use helper_lifecycle::{HelperLifecycle, HelperState};
pub use inventory_reader::InventoryReader;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
