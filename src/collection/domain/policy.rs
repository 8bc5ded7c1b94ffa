use super::target::Domain;
use chrono::NaiveDateTime;

/// Marker after which a blackout identifier carries an app+env key
pub const APP_ENV_MARKER: &str = "ENV";

const END_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// A planned-outage entry suppressing live queries
///
/// The end time is informational only: an entry stays in force for as long
/// as it is listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackoutEntry {
    pub identifier: String,
    pub end_time_raw: String,
    pub end_time: Option<NaiveDateTime>,
    pub reason: String,
}

impl BlackoutEntry {
    pub fn new(
        identifier: impl Into<String>,
        end_time_raw: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let end_time_raw = end_time_raw.into();
        let end_time = END_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(end_time_raw.trim(), fmt).ok());
        Self {
            identifier: identifier.into(),
            end_time_raw,
            end_time,
            reason: reason.into(),
        }
    }

    /// The identifier from the last marker onward, if it has one
    pub fn app_env_key(&self) -> Option<&str> {
        self.identifier
            .rfind(APP_ENV_MARKER)
            .map(|idx| &self.identifier[idx..])
    }

    pub fn covers(&self, domain: &Domain) -> bool {
        if self.identifier == domain.domain_name {
            return true;
        }
        self.app_env_key()
            .is_some_and(|key| key == domain.app_env())
    }
}

/// A domain permanently skipped by the collector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionEntry {
    pub domain_name: String,
}

impl ExclusionEntry {
    pub fn new(domain_name: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
        }
    }

    pub fn covers(&self, domain: &Domain) -> bool {
        self.domain_name == domain.domain_name
    }
}
