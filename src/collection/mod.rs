/// Collection core: domain model, target policies and the services that
/// turn helper replies into metric maps. Nothing in here performs I/O.
pub mod domain;
pub mod policies;
pub mod services;
