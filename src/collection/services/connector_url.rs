use crate::collection::domain::{Domain, DomainType};

/// Builds the management connector URL for a domain.
///
/// Web domains are reached through the t3 domain-runtime server; every other
/// type goes through the RMI default connector registered under the domain
/// name.
pub fn connector_url(domain: &Domain) -> String {
    let host = &domain.host_name;
    let port = &domain.jmx_port;
    match domain.domain_type {
        DomainType::Web => format!(
            "service:jmx:t3://{host}:{port}/jndi/weblogic.management.mbeanservers.domainruntime"
        ),
        _ => format!(
            "service:jmx:rmi://{host}/jndi/rmi://{host}:{port}/{}/DomainRuntime/DefaultConnector",
            domain.domain_name
        ),
    }
}
