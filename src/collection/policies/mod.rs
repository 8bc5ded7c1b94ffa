pub mod target_policy;

pub use target_policy::{PolicyDecision, PolicySet};
