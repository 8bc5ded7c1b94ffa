/// Mock implementations for testing
mod mock_bean_query_executor;
mod mock_definition_reader;
mod mock_helper_lifecycle;
mod mock_inventory_reader;
mod mock_progress_reporter;

pub use mock_bean_query_executor::MockBeanQueryExecutor;
pub use mock_definition_reader::MockDefinitionReader;
pub use mock_helper_lifecycle::MockHelperLifecycle;
pub use mock_inventory_reader::{domain, MockInventoryReader};
pub use mock_progress_reporter::MockProgressReporter;
