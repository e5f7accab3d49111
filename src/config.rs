use chrono::{DateTime, FixedOffset};

use crate::types::TimeField;

/// Connection parameters for the share gateway
///
/// Threaded explicitly into the components that need it; there is no
/// ambient global configuration.
#[derive(Debug, Clone)]
pub struct ShareConfig {
    /// Base URL of the gateway fronting the share
    pub gateway_url: String,
    /// Share name
    pub share: String,
    pub username: String,
    pub password: String,
    /// Optional authentication domain
    pub domain: Option<String>,
}

impl ShareConfig {
    /// Username in `DOMAIN\user` form when a domain is configured
    pub fn qualified_username(&self) -> String {
        match &self.domain {
            Some(domain) if !domain.is_empty() => format!("{}\\{}", domain, self.username),
            _ => self.username.clone(),
        }
    }
}

/// Parameters for one sweep invocation
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Folder to sweep, relative to the share root
    pub folder_path: String,
    /// Only records at or after this instant pass the filter
    pub threshold: Option<DateTime<FixedOffset>>,
    /// Which timestamp the threshold compares against
    pub time_field: TimeField,
    /// Destination API endpoint for dispatch
    pub endpoint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share_config(domain: Option<&str>) -> ShareConfig {
        ShareConfig {
            gateway_url: "http://gw.local".to_string(),
            share: "certificates".to_string(),
            username: "svc-sweep".to_string(),
            password: "secret".to_string(),
            domain: domain.map(String::from),
        }
    }

    #[test]
    fn test_qualified_username_with_domain() {
        assert_eq!(
            share_config(Some("CORP")).qualified_username(),
            "CORP\\svc-sweep"
        );
    }

    #[test]
    fn test_qualified_username_without_domain() {
        assert_eq!(share_config(None).qualified_username(), "svc-sweep");
        assert_eq!(share_config(Some("")).qualified_username(), "svc-sweep");
    }
}
