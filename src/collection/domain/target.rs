use serde::Serialize;
use std::fmt;

/// Kind of application server domain being monitored
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainType {
    /// Web (PIA) domain, reached over the t3 connector
    Web,
    /// Application server domain
    App,
    /// Process scheduler (batch) domain
    Prc,
    /// Any type the catalog has no definitions for
    Unknown(String),
}

impl DomainType {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "web" => DomainType::Web,
            "app" => DomainType::App,
            "prc" => DomainType::Prc,
            _ => DomainType::Unknown(value.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DomainType::Web => "web",
            DomainType::App => "app",
            DomainType::Prc => "prc",
            DomainType::Unknown(other) => other,
        }
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Management-port login for one domain
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// One monitored domain, as listed in the inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub domain_name: String,
    pub domain_type: DomainType,
    pub app: String,
    pub env: String,
    pub purpose: String,
    pub server_name: String,
    pub host_name: String,
    pub tools_version: String,
    pub weblogic_version: String,
    pub jmx_port: String,
    pub credentials: Credentials,
}

impl Domain {
    /// Application and environment concatenated, the key blackouts use
    pub fn app_env(&self) -> String {
        format!("{}{}", self.app, self.env)
    }

    pub fn identity(&self) -> DomainIdentity {
        DomainIdentity {
            domain_name: self.domain_name.clone(),
            domain_type: self.domain_type.as_str().to_string(),
            purpose: self.purpose.clone(),
            app: self.app.clone(),
            env: self.env.clone(),
            appenv: self.app_env(),
            server_name: self.server_name.clone(),
            host: self.host_name.clone(),
            tools_version: self.tools_version.clone(),
            weblogic_version: self.weblogic_version.clone(),
        }
    }
}

/// Identity tags attached to every collection result so it can be joined
/// back to the inventory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DomainIdentity {
    pub domain_name: String,
    pub domain_type: String,
    pub purpose: String,
    pub app: String,
    pub env: String,
    pub appenv: String,
    #[serde(rename = "serverName")]
    pub server_name: String,
    pub host: String,
    pub tools_version: String,
    pub weblogic_version: String,
}

#[cfg(test)]
pub(crate) fn sample_domain(name: &str, domain_type: DomainType) -> Domain {
    Domain {
        domain_name: name.to_string(),
        domain_type,
        app: "HR".to_string(),
        env: "DEV".to_string(),
        purpose: "online".to_string(),
        server_name: "PIA".to_string(),
        host_name: "hrdev01.example.edu".to_string(),
        tools_version: "8.58".to_string(),
        weblogic_version: "12.2.1".to_string(),
        jmx_port: "10100".to_string(),
        credentials: Credentials::new("monitor", "secret"),
    }
}
