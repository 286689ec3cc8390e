//! Target host identifiers.

use crate::core::error::DispatchError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum length of a host identifier (DNS name limit).
pub const MAX_HOST_LEN: usize = 253;

/// A validated target-host identifier, optionally prefixed with `user@`.
///
/// Accepted forms: `web01`, `db.example.com`, `10.0.0.5`, `deploy@web01`.
/// The host part must start with an ASCII letter or digit, so an identifier
/// can never be mistaken for a command-line option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostId(String);

impl HostId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DispatchError> {
        let raw = raw.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(DispatchError::invalid_input("target host cannot be empty"));
        }
        if trimmed.len() > MAX_HOST_LEN {
            return Err(DispatchError::invalid_input(format!(
                "target host exceeds {} characters",
                MAX_HOST_LEN
            )));
        }

        let (user, host) = match trimmed.split_once('@') {
            Some((user, host)) => (Some(user), host),
            None => (None, trimmed),
        };

        if let Some(user) = user
            && !is_valid_user(user)
        {
            return Err(DispatchError::invalid_input(format!(
                "invalid user in target host '{}'",
                trimmed
            )));
        }

        if !is_valid_host(host) {
            return Err(DispatchError::invalid_input(format!(
                "invalid target host '{}'",
                trimmed
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The host part without any `user@` prefix.
    pub fn host(&self) -> &str {
        self.0
            .split_once('@')
            .map(|(_, host)| host)
            .unwrap_or(&self.0)
    }

    /// The `user@` prefix, if present.
    pub fn user(&self) -> Option<&str> {
        self.0.split_once('@').map(|(user, _)| user)
    }
}

fn is_valid_user(user: &str) -> bool {
    let mut chars = user.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

fn is_valid_host(host: &str) -> bool {
    let mut chars = host.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
}

impl std::fmt::Display for HostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for HostId {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HostId {
    type Error = DispatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<HostId> for String {
    fn from(value: HostId) -> Self {
        value.0
    }
}

/// Set of hosts the inventory source knows about.
///
/// An empty policy admits every syntactically valid host. A non-empty policy
/// admits only listed hosts; the `user@` prefix is ignored for the lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostPolicy {
    allowed: BTreeSet<String>,
}

impl HostPolicy {
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn from_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: hosts
                .into_iter()
                .map(|h| h.into().trim().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn check(&self, host: &HostId) -> Result<(), DispatchError> {
        if self.is_open() || self.allowed.contains(&host.host().to_lowercase()) {
            Ok(())
        } else {
            Err(DispatchError::not_allowed(format!(
                "host '{}' is not in the inventory",
                host.host()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hosts() {
        for raw in ["web01", "db.example.com", "10.0.0.5", "deploy@web01", "_svc@host-1"] {
            assert!(HostId::parse(raw).is_ok(), "{raw}");
        }
    }

    #[test]
    fn test_invalid_hosts() {
        for raw in [
            "",
            "   ",
            "-oProxyCommand=evil",
            "web01;rm -rf /",
            "web 01",
            "Root@web01",
            "@web01",
            "user@",
            "host$(id)",
        ] {
            let err = HostId::parse(raw).unwrap_err();
            assert_eq!(err.code(), "INVALID_INPUT", "{raw}");
        }
    }

    #[test]
    fn test_host_too_long() {
        let raw = "a".repeat(MAX_HOST_LEN + 1);
        assert!(HostId::parse(raw).is_err());
    }

    #[test]
    fn test_user_and_host_parts() {
        let host = HostId::parse(" deploy@web01 ").unwrap();
        assert_eq!(host.as_str(), "deploy@web01");
        assert_eq!(host.user(), Some("deploy"));
        assert_eq!(host.host(), "web01");
    }

    #[test]
    fn test_policy() {
        let policy = HostPolicy::from_hosts(["web01", "DB01"]);
        assert!(policy.check(&HostId::parse("web01").unwrap()).is_ok());
        assert!(policy.check(&HostId::parse("admin@db01").unwrap()).is_ok());
        let err = policy
            .check(&HostId::parse("cache01").unwrap())
            .unwrap_err();
        assert_eq!(err.code(), "NOT_ALLOWED");

        assert!(
            HostPolicy::allow_all()
                .check(&HostId::parse("anything").unwrap())
                .is_ok()
        );
    }
}
