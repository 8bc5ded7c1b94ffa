/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the collection core isolated.
mod collection_response;
mod collector_options;
mod planned_job;
mod query_job;

pub use collection_response::CollectionResponse;
pub use collector_options::CollectorOptions;
pub use planned_job::PlannedJob;
pub use query_job::QueryJob;
